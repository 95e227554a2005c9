use chrono::Utc;
use roster_business::{AuthSession, BusinessConfig};
use roster_states::{StateCtx, Time};

/// The main application state.
pub struct State {
    /// The state context for business logic.
    pub ctx: StateCtx,
}

impl Default for State {
    fn default() -> Self {
        Self::new(BusinessConfig::default(), AuthSession::default())
    }
}

impl State {
    pub fn new(config: BusinessConfig, session: AuthSession) -> Self {
        let mut ctx = StateCtx::new();

        ctx.add_state(Time::new(Utc::now()));
        roster_business::register(&mut ctx, config, session);
        ctx.run_computed();

        Self { ctx }
    }

    /// State pointing at a mock server, signed in with `token` when given.
    pub fn test(base_url: impl Into<String>, token: Option<&str>) -> Self {
        let session = AuthSession::new(token.map(str::to_owned));
        Self::new(BusinessConfig::new(base_url), session)
    }
}
