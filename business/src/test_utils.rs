//! Helpers for driving the business commands against a mock backend.
//!
//! ```ignore
//! let mut test_ctx = TestContext::new().await;
//! test_ctx.mock_users(vec![sample_user("u1", "bob", true)]).await;
//!
//! test_ctx.ctx.enqueue_command::<RefreshUsersCommand>();
//! test_ctx.flush_and_wait().await;
//!
//! let directory = test_ctx.ctx.compute::<UsersDirectoryCompute>();
//! ```

use std::time::Duration;

use chrono::{DateTime, Utc};
use roster_states::StateCtx;
use serde_json::{Value, json};
use ustr::Ustr;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::users::model::{Role, User};
use crate::{AuthSession, BusinessConfig, register};

pub const TEST_TOKEN: &str = "test_token";

/// A mock server plus a `StateCtx` with everything the users screen needs.
pub struct TestContext {
    pub mock_server: MockServer,
    pub ctx: StateCtx,
}

impl TestContext {
    /// Signed in with [`TEST_TOKEN`].
    pub async fn new() -> Self {
        Self::with_session(AuthSession::authenticated(TEST_TOKEN)).await
    }

    pub async fn with_session(session: AuthSession) -> Self {
        let mock_server = MockServer::start().await;
        let mut ctx = StateCtx::new();
        register(&mut ctx, BusinessConfig::new(mock_server.uri()), session);
        Self { mock_server, ctx }
    }

    /// Sync, spawn queued commands, then await every task, syncing after each.
    pub async fn flush_and_wait(&mut self) {
        self.ctx.sync_computes();
        self.ctx.flush_commands();

        let timeout = Duration::from_secs(5);
        let start = std::time::Instant::now();

        while self.ctx.task_count() > 0 {
            assert!(
                start.elapsed() <= timeout,
                "Timed out waiting for pending tasks ({} still in JoinSet)",
                self.ctx.task_count()
            );
            if self.ctx.task_set_mut().join_next().await.is_some() {
                self.ctx.sync_computes();
            }
        }

        self.ctx.run_computed();
    }

    pub async fn shutdown(&mut self) {
        self.ctx.shutdown().await;
    }

    pub async fn mock_users(&self, users: Vec<User>) {
        Mock::given(method("GET"))
            .and(path("/user"))
            .and(header("Authorization", format!("Bearer {TEST_TOKEN}").as_str()))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "success": true, "data": users })),
            )
            .mount(&self.mock_server)
            .await;
    }

    pub async fn mock_roles(&self, roles: Vec<Role>) {
        Mock::given(method("GET"))
            .and(path("/role"))
            .and(header("Authorization", format!("Bearer {TEST_TOKEN}").as_str()))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "success": true, "data": roles })),
            )
            .mount(&self.mock_server)
            .await;
    }

    /// `PUT /user/{id}` expecting exactly `body`, answering `status` + `reply`.
    pub async fn mock_update_user(&self, id: &str, body: Value, status: u16, reply: Value) {
        Mock::given(method("PUT"))
            .and(path(format!("/user/{id}")))
            .and(header("Authorization", format!("Bearer {TEST_TOKEN}").as_str()))
            .and(body_json(body))
            .respond_with(ResponseTemplate::new(status).set_body_json(reply))
            .expect(1)
            .mount(&self.mock_server)
            .await;
    }

    pub async fn mock_update_password(&self, id: &str, body: Value, status: u16, reply: Value) {
        Mock::given(method("PUT"))
            .and(path(format!("/user/{id}/password")))
            .and(header("Authorization", format!("Bearer {TEST_TOKEN}").as_str()))
            .and(body_json(body))
            .respond_with(ResponseTemplate::new(status).set_body_json(reply))
            .expect(1)
            .mount(&self.mock_server)
            .await;
    }

    /// Fail if any request reaches the server.
    pub async fn expect_no_requests(&self) {
        Mock::given(wiremock::matchers::any())
            .respond_with(ResponseTemplate::new(500))
            .expect(0)
            .mount(&self.mock_server)
            .await;
    }
}

pub fn sample_role(id: &str, name: &str) -> Role {
    Role {
        id: Ustr::from(id),
        name: name.to_owned(),
        description: String::new(),
    }
}

pub fn sample_user(id: &str, username: &str, is_active: bool) -> User {
    User {
        id: Ustr::from(id),
        username: username.to_owned(),
        email: format!("{username}@example.com"),
        first_name: username.to_uppercase(),
        last_name: "Tester".to_owned(),
        is_active,
        roles: vec![sample_role("r1", "Admin")],
    }
}

pub fn epoch() -> DateTime<Utc> {
    DateTime::<Utc>::UNIX_EPOCH
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::users::workflow::{
        confirm_toggle, refresh, submit_password, submit_profile, sync_panel,
    };
    use crate::users::{
        RefreshUsersCommand, RolesCompute, UserActionCompute, UserActionKind, UserActionState,
        UsersDirectoryCompute, UsersListingCompute, UsersPanelState, ViewState,
    };

    fn panel(test_ctx: &TestContext) -> &UsersPanelState {
        test_ctx.ctx.state::<UsersPanelState>()
    }

    #[tokio::test]
    async fn test_refresh_loads_users_and_roles() {
        let mut test_ctx = TestContext::new().await;
        test_ctx
            .mock_users(vec![sample_user("u1", "bob", true), sample_user("u2", "amy", false)])
            .await;
        test_ctx
            .mock_roles(vec![sample_role("r1", "Admin"), sample_role("r2", "Viewer")])
            .await;

        refresh(&mut test_ctx.ctx);
        test_ctx.flush_and_wait().await;

        let directory = test_ctx.ctx.compute::<UsersDirectoryCompute>();
        assert_eq!(directory.users().len(), 2);
        assert!(!directory.is_loading());
        assert_eq!(
            test_ctx.ctx.compute::<RolesCompute>().name_of(Ustr::from("r2")),
            Some("Viewer")
        );
        let listing = test_ctx.ctx.compute::<UsersListingCompute>();
        assert_eq!(listing.summary(), "Showing 1 to 2 of 2 users");

        test_ctx.shutdown().await;
    }

    #[tokio::test]
    async fn test_missing_token_fails_locally() {
        let mut test_ctx = TestContext::with_session(AuthSession::default()).await;
        test_ctx.expect_no_requests().await;

        refresh(&mut test_ctx.ctx);
        test_ctx.flush_and_wait().await;
        sync_panel(&mut test_ctx.ctx, epoch());

        let directory = test_ctx.ctx.compute::<UsersDirectoryCompute>();
        assert_eq!(directory.error(), Some("Unauthorized: please sign in again"));
        assert_eq!(
            panel(&test_ctx)
                .notices()
                .error_banner()
                .map(|b| b.message.as_str()),
            Some("Unauthorized: please sign in again")
        );

        test_ctx.shutdown().await;
    }

    #[tokio::test]
    async fn test_toggle_active_refetches_and_closes_dialog() {
        let mut test_ctx = TestContext::new().await;
        let bob = sample_user("u1", "bob", true);
        test_ctx
            .mock_update_user(
                "u1",
                json!({ "isActive": false }),
                200,
                json!({ "success": true }),
            )
            .await;
        test_ctx.mock_users(vec![sample_user("u1", "bob", false)]).await;

        test_ctx
            .ctx
            .update::<UsersPanelState>(|panel| panel.open_toggle(bob));
        assert!(confirm_toggle(&mut test_ctx.ctx));
        assert!(panel(&test_ctx).is_loading());

        test_ctx.flush_and_wait().await;
        sync_panel(&mut test_ctx.ctx, epoch());

        assert_eq!(
            test_ctx.ctx.compute::<UserActionCompute>().state(),
            &UserActionState::Success {
                kind: UserActionKind::ToggleActive,
                user: Ustr::from("u1"),
                message: "User deactivated successfully".to_owned(),
            }
        );
        assert!(test_ctx.ctx.has_pending_commands(), "success queues a refetch");
        test_ctx.flush_and_wait().await;
        sync_panel(&mut test_ctx.ctx, epoch());

        let directory = test_ctx.ctx.compute::<UsersDirectoryCompute>();
        assert_eq!(directory.find(Ustr::from("u1")).map(|u| u.is_active), Some(false));

        let panel = panel(&test_ctx);
        assert!(panel.view().is_idle());
        assert!(!panel.is_loading());
        assert_eq!(
            panel.notices().success_banner().map(|b| b.message.as_str()),
            Some("User deactivated successfully")
        );

        test_ctx.shutdown().await;
    }

    #[tokio::test]
    async fn test_slow_refresh_cannot_overwrite_refetch_after_toggle() {
        let mut test_ctx = TestContext::new().await;
        let bob = sample_user("u1", "bob", true);
        // the first list request answers late with the old flag
        Mock::given(method("GET"))
            .and(path("/user"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "success": true, "data": [bob.clone()] }))
                    .set_delay(Duration::from_millis(800)),
            )
            .up_to_n_times(1)
            .mount(&test_ctx.mock_server)
            .await;
        test_ctx.mock_users(vec![sample_user("u1", "bob", false)]).await;
        test_ctx
            .mock_update_user(
                "u1",
                json!({ "isActive": false }),
                200,
                json!({ "success": true }),
            )
            .await;

        test_ctx.ctx.enqueue_command::<RefreshUsersCommand>();
        test_ctx.ctx.flush_commands();

        test_ctx
            .ctx
            .update::<UsersPanelState>(|panel| panel.open_toggle(bob));
        assert!(confirm_toggle(&mut test_ctx.ctx));
        test_ctx.ctx.flush_commands();

        while !test_ctx.ctx.compute::<UserActionCompute>().state().is_finished() {
            assert!(test_ctx.ctx.task_count() > 0, "toggle task vanished");
            test_ctx.ctx.task_set_mut().join_next().await;
            test_ctx.ctx.sync_computes();
        }
        sync_panel(&mut test_ctx.ctx, epoch());
        test_ctx.flush_and_wait().await;
        sync_panel(&mut test_ctx.ctx, epoch());

        let directory = test_ctx.ctx.compute::<UsersDirectoryCompute>();
        assert!(!directory.is_loading());
        assert_eq!(directory.find(Ustr::from("u1")).map(|u| u.is_active), Some(false));

        test_ctx.shutdown().await;
    }

    #[tokio::test]
    async fn test_profile_field_errors_from_server() {
        let mut test_ctx = TestContext::new().await;
        let bob = sample_user("u1", "bob", true);
        test_ctx
            .mock_update_user(
                "u1",
                json!({
                    "firstName": "BOB",
                    "lastName": "Tester",
                    "email": "amy@example.com",
                    "username": "bob",
                    "roles": ["r1"]
                }),
                422,
                json!({
                    "success": false,
                    "message": "Validation failed",
                    "errors": { "email": "Email already in use" }
                }),
            )
            .await;

        test_ctx.ctx.update::<UsersPanelState>(|panel| {
            panel.open_edit(bob);
            panel.profile_form.email = "amy@example.com".to_owned();
        });
        assert!(submit_profile(&mut test_ctx.ctx));
        test_ctx.flush_and_wait().await;
        sync_panel(&mut test_ctx.ctx, epoch());

        let panel = panel(&test_ctx);
        assert!(matches!(panel.view(), ViewState::Editing(_)));
        assert_eq!(panel.form_errors().get("email"), Some("Email already in use"));
        assert_eq!(
            panel.notices().error_banner().map(|b| b.message.as_str()),
            Some("Validation failed")
        );
        assert!(!panel.is_loading());

        test_ctx.shutdown().await;
    }

    #[tokio::test]
    async fn test_invalid_password_form_sends_nothing() {
        let mut test_ctx = TestContext::new().await;
        test_ctx.expect_no_requests().await;

        test_ctx.ctx.update::<UsersPanelState>(|panel| {
            panel.open_change_password(sample_user("u1", "bob", true));
            panel.password_form.current_password = "current".to_owned();
            panel.password_form.new_password = "longenough1".to_owned();
            panel.password_form.confirm_password = "different".to_owned();
        });
        assert!(!submit_password(&mut test_ctx.ctx));
        assert!(!test_ctx.ctx.has_pending_commands());

        let errors = panel(&test_ctx).form_errors();
        assert_eq!(errors.get("confirmPassword"), Some("Passwords do not match"));
        assert_eq!(errors.len(), 1);

        test_ctx.shutdown().await;
    }

    #[tokio::test]
    async fn test_change_password_success() {
        let mut test_ctx = TestContext::new().await;
        test_ctx
            .mock_update_password(
                "u1",
                json!({ "currentPassword": "current1", "newPassword": "longenough1" }),
                200,
                json!({ "success": true, "message": "Password updated" }),
            )
            .await;
        test_ctx.mock_users(vec![sample_user("u1", "bob", true)]).await;

        test_ctx.ctx.update::<UsersPanelState>(|panel| {
            panel.open_change_password(sample_user("u1", "bob", true));
            panel.password_form.current_password = "current1".to_owned();
            panel.password_form.new_password = "longenough1".to_owned();
            panel.password_form.confirm_password = "longenough1".to_owned();
        });
        assert!(submit_password(&mut test_ctx.ctx));
        test_ctx.flush_and_wait().await;
        sync_panel(&mut test_ctx.ctx, epoch());

        let panel = panel(&test_ctx);
        assert!(panel.view().is_idle());
        assert_eq!(panel.password_form.new_password, "");
        assert_eq!(
            panel.notices().toasts().first().map(|t| t.message.as_str()),
            Some("Password updated")
        );

        test_ctx.shutdown().await;
    }

    #[tokio::test]
    async fn test_outcome_after_dialog_switched_users() {
        let mut test_ctx = TestContext::new().await;
        test_ctx
            .mock_update_user(
                "u1",
                json!({ "isActive": false }),
                409,
                json!({ "success": false, "errors": { "isActive": "Cannot deactivate yourself" } }),
            )
            .await;

        test_ctx
            .ctx
            .update::<UsersPanelState>(|panel| panel.open_toggle(sample_user("u1", "bob", true)));
        assert!(confirm_toggle(&mut test_ctx.ctx));
        test_ctx.ctx.update::<UsersPanelState>(|panel| {
            panel.close_view();
            panel.open_edit(sample_user("u2", "amy", false));
        });

        test_ctx.flush_and_wait().await;
        sync_panel(&mut test_ctx.ctx, epoch());

        let panel = panel(&test_ctx);
        assert_eq!(panel.view().target_id(), Some(Ustr::from("u2")));
        assert!(panel.form_errors().is_empty());
        assert_eq!(
            panel.notices().error_banner().map(|b| b.message.as_str()),
            Some("Failed to update user status")
        );

        test_ctx.shutdown().await;
    }

    #[tokio::test]
    async fn test_server_error_without_json_uses_fallback() {
        let mut test_ctx = TestContext::new().await;
        Mock::given(method("GET"))
            .and(path("/user"))
            .respond_with(ResponseTemplate::new(503).set_body_string("down"))
            .mount(&test_ctx.mock_server)
            .await;

        test_ctx.ctx.enqueue_command::<RefreshUsersCommand>();
        test_ctx.flush_and_wait().await;

        let directory = test_ctx.ctx.compute::<UsersDirectoryCompute>();
        assert_eq!(directory.error(), Some("Failed to load users"));
        assert!(directory.users().is_empty());

        test_ctx.shutdown().await;
    }

    #[tokio::test]
    async fn test_new_list_resets_page() {
        let mut test_ctx = TestContext::new().await;
        let users = (1..=25)
            .map(|i| sample_user(&format!("u{i}"), &format!("user{i:02}"), true))
            .collect();
        test_ctx.mock_users(users).await;

        test_ctx.ctx.enqueue_command::<RefreshUsersCommand>();
        test_ctx.flush_and_wait().await;
        sync_panel(&mut test_ctx.ctx, epoch());

        test_ctx
            .ctx
            .update::<UsersPanelState>(|panel| panel.go_to_page(3, 3));
        test_ctx.ctx.run_computed();
        assert_eq!(
            test_ctx.ctx.compute::<UsersListingCompute>().page().users.len(),
            5
        );

        test_ctx.ctx.enqueue_command::<RefreshUsersCommand>();
        test_ctx.flush_and_wait().await;
        sync_panel(&mut test_ctx.ctx, epoch());
        assert_eq!(panel(&test_ctx).page(), 1);

        test_ctx.shutdown().await;
    }
}
