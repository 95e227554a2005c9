//! Mutating user actions: toggle active, update profile, change password.
//!
//! - UI validates the form and fills [`UserActionInput`]
//! - UI enqueues one of the commands below
//! - the command calls the API and publishes the outcome into
//!   [`UserActionCompute`]
//! - the panel applies each finished outcome once (see `UsersPanelState::sync_action`)
//!   and `workflow::sync_panel` queues a
//!   [`RefreshUsersCommand`](crate::users::RefreshUsersCommand) after a success

use std::any::Any;
use std::collections::BTreeMap;

use roster_states::{
    Command, CommandFuture, CommandSnapshot, Compute, ComputeDeps, Dep, LatestOnlyUpdater,
    SnapshotClone, State, Updater, assign_impl,
};
use tokio_util::sync::CancellationToken;
use ustr::Ustr;

use crate::BusinessConfig;
use crate::session::AuthSession;
use crate::users::api::{self, Acknowledged, ApiResult};
use crate::users::directory::next_revision;
use crate::users::model::{UpdatePasswordRequest, UpdateUserRequest};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserActionKind {
    ToggleActive,
    UpdateProfile,
    ChangePassword,
}

impl UserActionKind {
    /// Shown when the server gave no usable message.
    pub fn fallback_error(self) -> &'static str {
        match self {
            Self::ToggleActive => "Failed to update user status",
            Self::UpdateProfile => "Failed to update user",
            Self::ChangePassword => "Failed to change password",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum UserActionState {
    #[default]
    Idle,
    InFlight {
        kind: UserActionKind,
        user: Ustr,
    },
    Success {
        kind: UserActionKind,
        user: Ustr,
        message: String,
    },
    Error {
        kind: UserActionKind,
        user: Ustr,
        message: String,
        field_errors: BTreeMap<String, String>,
    },
}

impl UserActionState {
    pub fn is_finished(&self) -> bool {
        matches!(self, Self::Success { .. } | Self::Error { .. })
    }
}

/// Compute-shaped cache of the latest action outcome.
#[derive(Debug, Clone, Default)]
pub struct UserActionCompute {
    state: UserActionState,
    /// New for every published state.
    revision: u64,
}

impl UserActionCompute {
    pub fn new(state: UserActionState) -> Self {
        Self {
            state,
            revision: next_revision(),
        }
    }

    pub fn state(&self) -> &UserActionState {
        &self.state
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn is_in_flight(&self) -> bool {
        matches!(self.state, UserActionState::InFlight { .. })
    }
}

impl SnapshotClone for UserActionCompute {
    fn clone_boxed(&self) -> Option<Box<dyn Any + Send>> {
        Some(Box::new(self.clone()))
    }
}

impl State for UserActionCompute {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn assign_box(&mut self, new_self: Box<dyn Any + Send>) {
        assign_impl(self, new_self);
    }
}

impl Compute for UserActionCompute {
    fn deps(&self) -> ComputeDeps {
        ComputeDeps::none()
    }

    fn compute(&self, _deps: Dep<'_>, _updater: Updater) {
        // written by the action commands
    }
}

/// What the next action command works on. Set it right before enqueueing.
#[derive(Clone, Default)]
pub struct UserActionInput {
    pub user: Option<Ustr>,
    /// Target value of the active flag, for [`ToggleUserActiveCommand`].
    pub set_active: Option<bool>,
    pub profile: Option<UpdateUserRequest>,
    pub password: Option<UpdatePasswordRequest>,
}

impl std::fmt::Debug for UserActionInput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserActionInput")
            .field("user", &self.user)
            .field("set_active", &self.set_active)
            .field("profile", &self.profile)
            .field("password", &self.password.is_some())
            .finish()
    }
}

impl SnapshotClone for UserActionInput {
    fn clone_boxed(&self) -> Option<Box<dyn Any + Send>> {
        Some(Box::new(self.clone()))
    }
}

impl State for UserActionInput {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn assign_box(&mut self, new_self: Box<dyn Any + Send>) {
        assign_impl(self, new_self);
    }
}

/// Everything an action command copies out of the snapshot.
struct ActionContext {
    config: BusinessConfig,
    session: AuthSession,
    input: UserActionInput,
}

impl ActionContext {
    fn from_snapshot(snap: &CommandSnapshot) -> Self {
        Self {
            config: snap.state::<BusinessConfig>().clone(),
            session: snap.state::<AuthSession>().clone(),
            input: snap.state::<UserActionInput>().clone(),
        }
    }

    fn missing(&self, kind: UserActionKind, field: &str, updater: &LatestOnlyUpdater) {
        log::error!("{kind:?}: missing `{field}` in UserActionInput");
        updater.set(UserActionCompute::new(UserActionState::Error {
            kind,
            user: self.input.user.unwrap_or_else(|| Ustr::from("")),
            message: kind.fallback_error().to_owned(),
            field_errors: BTreeMap::new(),
        }));
    }

    /// Publish the outcome.
    fn finish(
        &self,
        kind: UserActionKind,
        user: Ustr,
        result: ApiResult<Acknowledged>,
        success_fallback: &str,
        updater: &LatestOnlyUpdater,
    ) {
        match result {
            Ok(ack) => {
                let message = ack
                    .message
                    .filter(|m| !m.trim().is_empty())
                    .unwrap_or_else(|| success_fallback.to_owned());
                log::info!("{kind:?} for {user}: {message}");
                updater.set(UserActionCompute::new(UserActionState::Success {
                    kind,
                    user,
                    message,
                }));
            }
            Err(err) => {
                log::warn!("{kind:?} for {user} failed: {err}");
                updater.set(UserActionCompute::new(UserActionState::Error {
                    kind,
                    user,
                    message: err.user_message(kind.fallback_error()),
                    field_errors: err.field_errors().cloned().unwrap_or_default(),
                }));
            }
        }
    }
}

/// `PUT /user/{id}` with `{ isActive }`.
#[derive(Debug, Default)]
pub struct ToggleUserActiveCommand;

impl Command for ToggleUserActiveCommand {
    fn run(
        &self,
        snap: CommandSnapshot,
        updater: LatestOnlyUpdater,
        _cancel: CancellationToken,
    ) -> CommandFuture {
        let kind = UserActionKind::ToggleActive;
        let cx = ActionContext::from_snapshot(&snap);

        Box::pin(async move {
            let Some(user) = cx.input.user else {
                return cx.missing(kind, "user", &updater);
            };
            let Some(is_active) = cx.input.set_active else {
                return cx.missing(kind, "set_active", &updater);
            };

            updater.set(UserActionCompute::new(UserActionState::InFlight {
                kind,
                user,
            }));
            log::debug!("Setting active={is_active} for {user}");
            let result = api::update_user(
                &cx.config,
                cx.session.token(),
                user,
                &UpdateUserRequest::active(is_active),
            )
            .await;

            let success = if is_active {
                "User activated successfully"
            } else {
                "User deactivated successfully"
            };
            cx.finish(kind, user, result, success, &updater);
        })
    }
}

/// `PUT /user/{id}` with the profile fields.
#[derive(Debug, Default)]
pub struct UpdateUserProfileCommand;

impl Command for UpdateUserProfileCommand {
    fn run(
        &self,
        snap: CommandSnapshot,
        updater: LatestOnlyUpdater,
        _cancel: CancellationToken,
    ) -> CommandFuture {
        let kind = UserActionKind::UpdateProfile;
        let cx = ActionContext::from_snapshot(&snap);

        Box::pin(async move {
            let Some(user) = cx.input.user else {
                return cx.missing(kind, "user", &updater);
            };
            let Some(body) = cx.input.profile.clone() else {
                return cx.missing(kind, "profile", &updater);
            };

            updater.set(UserActionCompute::new(UserActionState::InFlight {
                kind,
                user,
            }));
            log::debug!("Updating profile of {user}");
            let result = api::update_user(&cx.config, cx.session.token(), user, &body).await;
            cx.finish(kind, user, result, "User updated successfully", &updater);
        })
    }
}

/// `PUT /user/{id}/password`.
#[derive(Debug, Default)]
pub struct ChangeUserPasswordCommand;

impl Command for ChangeUserPasswordCommand {
    fn run(
        &self,
        snap: CommandSnapshot,
        updater: LatestOnlyUpdater,
        _cancel: CancellationToken,
    ) -> CommandFuture {
        let kind = UserActionKind::ChangePassword;
        let cx = ActionContext::from_snapshot(&snap);

        Box::pin(async move {
            let Some(user) = cx.input.user else {
                return cx.missing(kind, "user", &updater);
            };
            let Some(body) = cx.input.password.clone() else {
                return cx.missing(kind, "password", &updater);
            };

            updater.set(UserActionCompute::new(UserActionState::InFlight {
                kind,
                user,
            }));
            log::debug!("Changing password of {user}");
            let result = api::update_password(&cx.config, cx.session.token(), user, &body).await;
            cx.finish(kind, user, result, "Password changed successfully", &updater);
        })
    }
}
