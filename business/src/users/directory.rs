//! The full user and role collections, as last fetched from the backend.
//!
//! Both are compute-shaped caches with no derived inputs. Only the refresh
//! commands write them, so a newer user fetch always supersedes an older one.

use std::any::Any;
use std::sync::atomic::{AtomicU64, Ordering};

use roster_states::{
    Command, CommandFuture, CommandSnapshot, Compute, ComputeDeps, Dep, LatestOnlyUpdater,
    SnapshotClone, State, Updater, assign_impl,
};
use tokio_util::sync::CancellationToken;

use crate::BusinessConfig;
use crate::session::AuthSession;
use crate::users::api;
use crate::users::model::{Role, User};

pub const USERS_FALLBACK: &str = "Failed to load users";
pub const ROLES_FALLBACK: &str = "Failed to load roles";

static REVISION: AtomicU64 = AtomicU64::new(0);

/// Revisions are process-wide so two writers never publish the same one.
pub(crate) fn next_revision() -> u64 {
    REVISION.fetch_add(1, Ordering::Relaxed) + 1
}

#[derive(Debug, Clone, Default)]
pub struct UsersDirectoryCompute {
    users: Vec<User>,
    is_loading: bool,
    error: Option<String>,
    /// Changes whenever a fetch finished, successfully or not. `0` means never.
    revision: u64,
}

impl UsersDirectoryCompute {
    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn find(&self, id: ustr::Ustr) -> Option<&User> {
        self.users.iter().find(|user| user.id == id)
    }

    fn clone_loading(&self) -> Self {
        Self {
            is_loading: true,
            ..self.clone()
        }
    }

    pub fn loaded(users: Vec<User>) -> Self {
        Self {
            users,
            is_loading: false,
            error: None,
            revision: next_revision(),
        }
    }

    /// Keeps the users that were already shown.
    fn failed(&self, message: String) -> Self {
        Self {
            users: self.users.clone(),
            is_loading: false,
            error: Some(message),
            revision: next_revision(),
        }
    }
}

impl SnapshotClone for UsersDirectoryCompute {
    fn clone_boxed(&self) -> Option<Box<dyn Any + Send>> {
        Some(Box::new(self.clone()))
    }
}

impl State for UsersDirectoryCompute {
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

impl Compute for UsersDirectoryCompute {
    fn deps(&self) -> ComputeDeps {
        ComputeDeps::none()
    }

    fn compute(&self, _deps: Dep<'_>, _updater: Updater) {
        // written by commands only
    }
}

#[derive(Debug, Clone, Default)]
pub struct RolesCompute {
    roles: Vec<Role>,
    is_loading: bool,
    error: Option<String>,
    revision: u64,
}

impl RolesCompute {
    pub fn roles(&self) -> &[Role] {
        &self.roles
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn name_of(&self, id: ustr::Ustr) -> Option<&str> {
        self.roles
            .iter()
            .find(|role| role.id == id)
            .map(|role| role.name.as_str())
    }

    pub fn loaded(roles: Vec<Role>) -> Self {
        Self {
            roles,
            is_loading: false,
            error: None,
            revision: next_revision(),
        }
    }
}

impl SnapshotClone for RolesCompute {
    fn clone_boxed(&self) -> Option<Box<dyn Any + Send>> {
        Some(Box::new(self.clone()))
    }
}

impl State for RolesCompute {
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

impl Compute for RolesCompute {
    fn deps(&self) -> ComputeDeps {
        ComputeDeps::none()
    }

    fn compute(&self, _deps: Dep<'_>, _updater: Updater) {
        // written by commands only
    }
}

/// Fetch `/user` and build the next directory value from `previous`.
async fn fetch_directory(
    config: &BusinessConfig,
    session: &AuthSession,
    previous: &UsersDirectoryCompute,
) -> UsersDirectoryCompute {
    log::debug!("Fetching users from {}", config.api_url());
    match api::list_users(config, session.token()).await {
        Ok(users) => {
            log::info!("Loaded {} users", users.len());
            UsersDirectoryCompute::loaded(users)
        }
        Err(err) => {
            log::warn!("Failed to load users: {err}");
            previous.failed(err.user_message(USERS_FALLBACK))
        }
    }
}

/// Re-fetch the user list. Dispatch on mount, from the refresh button and
/// after every successful mutation.
#[derive(Debug, Default)]
pub struct RefreshUsersCommand;

impl Command for RefreshUsersCommand {
    fn run(
        &self,
        snap: CommandSnapshot,
        updater: LatestOnlyUpdater,
        cancel: CancellationToken,
    ) -> CommandFuture {
        let config = snap.state::<BusinessConfig>().clone();
        let session = snap.state::<AuthSession>().clone();
        let previous = snap.compute::<UsersDirectoryCompute>().clone();

        Box::pin(async move {
            updater.set(previous.clone_loading());
            tokio::select! {
                () = cancel.cancelled() => {
                    log::debug!("User refresh superseded");
                }
                next = fetch_directory(&config, &session, &previous) => {
                    updater.set(next);
                }
            }
        })
    }
}

#[derive(Debug, Default)]
pub struct RefreshRolesCommand;

impl Command for RefreshRolesCommand {
    fn run(
        &self,
        snap: CommandSnapshot,
        updater: LatestOnlyUpdater,
        cancel: CancellationToken,
    ) -> CommandFuture {
        let config = snap.state::<BusinessConfig>().clone();
        let session = snap.state::<AuthSession>().clone();
        let previous = snap.compute::<RolesCompute>().clone();

        Box::pin(async move {
            updater.set(RolesCompute {
                is_loading: true,
                ..previous.clone()
            });
            log::debug!("Fetching roles from {}", config.api_url());
            let result = tokio::select! {
                () = cancel.cancelled() => {
                    log::debug!("Role refresh superseded");
                    return;
                }
                result = api::list_roles(&config, session.token()) => result,
            };
            match result {
                Ok(roles) => {
                    log::info!("Loaded {} roles", roles.len());
                    updater.set(RolesCompute::loaded(roles));
                }
                Err(err) => {
                    log::warn!("Failed to load roles: {err}");
                    updater.set(RolesCompute {
                        roles: previous.roles,
                        is_loading: false,
                        error: Some(err.user_message(ROLES_FALLBACK)),
                        revision: next_revision(),
                    });
                }
            }
        })
    }
}
