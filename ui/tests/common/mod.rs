use std::time::Duration;

use egui_kittest::Harness;
use roster_business::users::{Role, User};
use roster_ui::RosterApp;
use roster_ui::state::State;
use serde_json::json;
use ustr::Ustr;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const TEST_TOKEN: &str = "test-token";

/// Frames are driven by hand; this caps how long a test waits for the mock
/// server.
const WAIT_LIMIT: Duration = Duration::from_secs(5);

pub struct TestCtx<'a> {
    pub mock_server: MockServer,
    harness: Option<Harness<'a, RosterApp>>,
}

impl<'a> TestCtx<'a> {
    /// Mock server only; mount mocks, then call [`Self::start`].
    pub async fn new() -> Self {
        let _ = env_logger::builder().is_test(true).try_init();
        Self {
            mock_server: MockServer::start().await,
            harness: None,
        }
    }

    /// Build the app against the mock server and render the first frame.
    pub fn start(&mut self, token: Option<&str>) {
        let state = State::test(self.mock_server.uri(), token);
        let app = RosterApp::new(state);
        self.harness = Some(Harness::new_eframe(|_| app));
    }

    pub fn harness_mut(&mut self) -> &mut Harness<'a, RosterApp> {
        self.harness.as_mut().expect("call start() first")
    }

    pub fn harness(&self) -> &Harness<'a, RosterApp> {
        self.harness.as_ref().expect("call start() first")
    }

    /// Step frames until `done` holds, yielding to the runtime in between.
    pub async fn wait_until(&mut self, mut done: impl FnMut(&Harness<'a, RosterApp>) -> bool) {
        let started = std::time::Instant::now();
        loop {
            self.harness_mut().step();
            if done(self.harness()) {
                // one more frame so the UI reflects the final state
                self.harness_mut().step();
                return;
            }
            assert!(
                started.elapsed() < WAIT_LIMIT,
                "condition not reached within {WAIT_LIMIT:?}"
            );
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
    }

    /// Let in-flight requests land and step a few frames.
    pub async fn settle(&mut self) {
        for _ in 0..5 {
            tokio::time::sleep(Duration::from_millis(30)).await;
            self.harness_mut().step();
        }
    }

    pub async fn mock_users(&self, users: &[User]) {
        Mock::given(method("GET"))
            .and(path("/user"))
            .and(header("Authorization", format!("Bearer {TEST_TOKEN}").as_str()))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "success": true, "data": users })),
            )
            .mount(&self.mock_server)
            .await;
    }

    pub async fn mock_roles(&self, roles: &[Role]) {
        Mock::given(method("GET"))
            .and(path("/role"))
            .and(header("Authorization", format!("Bearer {TEST_TOKEN}").as_str()))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "success": true, "data": roles })),
            )
            .mount(&self.mock_server)
            .await;
    }
}

pub fn role(id: &str, name: &str) -> Role {
    Role {
        id: Ustr::from(id),
        name: name.to_owned(),
        description: format!("{name} role"),
    }
}

pub fn user(id: &str, username: &str, is_active: bool) -> User {
    User {
        id: Ustr::from(id),
        username: username.to_owned(),
        email: format!("{username}@example.com"),
        first_name: username.to_uppercase(),
        last_name: "Tester".to_owned(),
        is_active,
        roles: vec![role("r1", "Admin")],
    }
}

pub fn sample_roles() -> Vec<Role> {
    vec![role("r1", "Admin"), role("r2", "Viewer")]
}
