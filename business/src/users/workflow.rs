//! Glue the widgets call: pull results into the panel, turn submits into
//! queued commands.

use chrono::{DateTime, Utc};
use roster_states::StateCtx;

use crate::users::actions::{
    ChangeUserPasswordCommand, ToggleUserActiveCommand, UpdateUserProfileCommand,
    UserActionCompute, UserActionInput, UserActionState,
};
use crate::users::directory::{
    RefreshRolesCommand, RefreshUsersCommand, RolesCompute, UsersDirectoryCompute,
};
use crate::users::panel_state::UsersPanelState;

/// Fetch users and roles. Used on mount and by the refresh button.
pub fn refresh(ctx: &mut StateCtx) {
    ctx.enqueue_command::<RefreshUsersCommand>();
    ctx.enqueue_command::<RefreshRolesCommand>();
}

/// Per-frame bookkeeping of the panel: fire due timers and adopt finished
/// command results. Only touches the panel state when something changed.
///
/// A freshly adopted successful action queues a [`RefreshUsersCommand`], which
/// supersedes any user fetch still in flight.
pub fn sync_panel(ctx: &mut StateCtx, now: DateTime<Utc>) {
    let panel = ctx.state::<UsersPanelState>();
    let directory = ctx.compute::<UsersDirectoryCompute>();
    let roles = ctx.compute::<RolesCompute>();
    let action = ctx.compute::<UserActionCompute>();

    let needs_sync = panel.needs_tick(now)
        || panel.seen_revisions() != (directory.revision(), roles.revision())
        || (action.state().is_finished() && panel.seen_action() != action.revision());
    if !needs_sync {
        return;
    }

    let directory = directory.clone();
    let roles = roles.clone();
    let action = action.clone();
    let mut refetch = false;
    ctx.update::<UsersPanelState>(|panel| {
        panel.tick(now);
        panel.sync_directory(&directory, now);
        panel.sync_roles(&roles, now);
        refetch = panel.sync_action(&action, now)
            && matches!(action.state(), UserActionState::Success { .. });
    });
    if refetch {
        ctx.enqueue_command::<RefreshUsersCommand>();
    }
}

fn submit<C: roster_states::Command>(ctx: &mut StateCtx, input: Option<UserActionInput>) -> bool {
    let Some(input) = input else {
        return false;
    };
    ctx.update::<UserActionInput>(|slot| *slot = input);
    ctx.enqueue_command::<C>();
    true
}

/// Validate and enqueue the profile update. `false` when the form has errors.
pub fn submit_profile(ctx: &mut StateCtx) -> bool {
    let mut input = None;
    ctx.update::<UsersPanelState>(|panel| input = panel.submit_profile());
    submit::<UpdateUserProfileCommand>(ctx, input)
}

pub fn submit_password(ctx: &mut StateCtx) -> bool {
    let mut input = None;
    ctx.update::<UsersPanelState>(|panel| input = panel.submit_password());
    submit::<ChangeUserPasswordCommand>(ctx, input)
}

pub fn confirm_toggle(ctx: &mut StateCtx) -> bool {
    let mut input = None;
    ctx.update::<UsersPanelState>(|panel| input = panel.confirm_toggle());
    submit::<ToggleUserActiveCommand>(ctx, input)
}
