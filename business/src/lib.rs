//! Business layer of the roster console.
//!
//! Owns the domain model, the HTTP client for the admin API and every
//! state, compute and command of the users screen. The UI crate registers
//! them with [`register`] and drives them from its frame loop.

mod config;
pub mod http;
pub mod session;
pub mod users;

#[cfg(test)]
mod test_utils;

use roster_states::StateCtx;

pub use config::{BusinessConfig, DEFAULT_API_URL, DEFAULT_PAGE_SIZE};
pub use session::{AuthSession, FileTokenStore, MemoryTokenStore, TokenStore, TokenStoreError};
pub use users::ApiError;

/// Add the states, computes and commands of the users screen to `ctx`.
pub fn register(ctx: &mut StateCtx, config: BusinessConfig, session: AuthSession) {
    ctx.add_state(users::UsersPanelState::new(config.page_size));
    ctx.add_state(users::UserActionInput::default());
    ctx.add_state(config);
    ctx.add_state(session);

    ctx.record_compute(users::UsersDirectoryCompute::default());
    ctx.record_compute(users::RolesCompute::default());
    ctx.record_compute(users::UserActionCompute::default());
    ctx.record_compute(users::UsersListingCompute::default());

    ctx.record_command(users::RefreshUsersCommand);
    ctx.record_command(users::RefreshRolesCommand);
    ctx.record_command(users::ToggleUserActiveCommand);
    ctx.record_command(users::UpdateUserProfileCommand);
    ctx.record_command(users::ChangeUserPasswordCommand);
}
