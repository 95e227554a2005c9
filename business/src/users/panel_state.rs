//! UI state of the users panel.
//!
//! Lives in `StateCtx` so widgets stay dumb: they read this state plus the
//! computes, call the methods here, and enqueue commands.

use std::any::Any;

use chrono::{DateTime, Utc};
use roster_states::{SnapshotClone, State, assign_impl};

use crate::users::actions::{UserActionCompute, UserActionInput, UserActionKind, UserActionState};
use crate::users::directory::{RolesCompute, UsersDirectoryCompute};
use crate::users::listing::{FilterState, RoleFilter, SortKey, SortState, StatusFilter};
use crate::users::model::User;
use crate::users::notice::{NoticeKind, Notices};
use crate::users::timers::Debouncer;
use crate::users::validation::{FieldErrors, PasswordForm, ProfileForm};
use crate::users::view::ViewState;

#[derive(Debug, Clone)]
pub struct UsersPanelState {
    /// Bound to the search box. Applied to `filters.search` after the debounce.
    pub search_input: String,
    search_debounce: Debouncer<String>,
    filters: FilterState,
    sort: Option<SortState>,
    page: usize,
    page_size: usize,

    view: ViewState,
    pub profile_form: ProfileForm,
    pub password_form: PasswordForm,
    form_errors: FieldErrors,
    loading: bool,
    notices: Notices,

    seen_users_revision: u64,
    seen_roles_revision: u64,
    seen_action_revision: u64,
}

impl Default for UsersPanelState {
    fn default() -> Self {
        Self::new(crate::DEFAULT_PAGE_SIZE)
    }
}

impl UsersPanelState {
    pub fn new(page_size: usize) -> Self {
        Self {
            search_input: String::new(),
            search_debounce: Debouncer::default(),
            filters: FilterState::default(),
            sort: None,
            page: 1,
            page_size: page_size.max(1),
            view: ViewState::Idle,
            profile_form: ProfileForm::default(),
            password_form: PasswordForm::default(),
            form_errors: FieldErrors::default(),
            loading: false,
            notices: Notices::default(),
            seen_users_revision: 0,
            seen_roles_revision: 0,
            seen_action_revision: 0,
        }
    }

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    pub fn sort(&self) -> Option<SortState> {
        self.sort
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn form_errors(&self) -> &FieldErrors {
        &self.form_errors
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn notices(&self) -> &Notices {
        &self.notices
    }

    pub fn notices_mut(&mut self) -> &mut Notices {
        &mut self.notices
    }

    /// Revisions of the user and role lists adopted so far.
    pub fn seen_revisions(&self) -> (u64, u64) {
        (self.seen_users_revision, self.seen_roles_revision)
    }

    pub fn seen_action(&self) -> u64 {
        self.seen_action_revision
    }

    // search, filters, sort, pages

    /// Call after `search_input` changed.
    pub fn on_search_changed(&mut self, now: DateTime<Utc>) {
        self.search_debounce.schedule(self.search_input.clone(), now);
    }

    pub fn is_search_pending(&self) -> bool {
        self.search_debounce.is_pending()
    }

    /// Whether [`Self::tick`] has anything to do at `now`.
    pub fn needs_tick(&self, now: DateTime<Utc>) -> bool {
        self.next_deadline().is_some_and(|deadline| deadline <= now)
    }

    /// Earliest moment some timer of the panel fires.
    pub fn next_deadline(&self) -> Option<DateTime<Utc>> {
        match (self.search_debounce.deadline(), self.notices.next_deadline()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// Fire due timers: commit debounced search text and expire notices.
    pub fn tick(&mut self, now: DateTime<Utc>) -> bool {
        let mut changed = self.notices.expire(now);
        if let Some(search) = self.search_debounce.poll(now)
            && search != self.filters.search
        {
            self.filters.search = search;
            self.page = 1;
            changed = true;
        }
        changed
    }

    pub fn set_status_filter(&mut self, status: StatusFilter) {
        if self.filters.status != status {
            self.filters.status = status;
            self.page = 1;
        }
    }

    pub fn set_role_filter(&mut self, role: RoleFilter) {
        if self.filters.role != role {
            self.filters.role = role;
            self.page = 1;
        }
    }

    pub fn clear_filters(&mut self) {
        self.search_input.clear();
        self.search_debounce.cancel();
        self.filters = FilterState::default();
        self.page = 1;
    }

    /// Header click: another key sorts ascending, the same key flips.
    pub fn toggle_sort(&mut self, key: SortKey) {
        self.sort = Some(SortState::toggled(self.sort, key));
    }

    pub fn next_page(&mut self, total_pages: usize) {
        if self.page < total_pages {
            self.page += 1;
        }
    }

    pub fn previous_page(&mut self) {
        if self.page > 1 {
            self.page -= 1;
        }
    }

    pub fn go_to_page(&mut self, page: usize, total_pages: usize) {
        if (1..=total_pages).contains(&page) {
            self.page = page;
        }
    }

    // results coming back from commands

    /// Adopt a finished user fetch. A new list resets the page, a failure
    /// raises the error banner.
    pub fn sync_directory(&mut self, directory: &UsersDirectoryCompute, now: DateTime<Utc>) -> bool {
        if directory.revision() == self.seen_users_revision {
            return false;
        }
        self.seen_users_revision = directory.revision();
        match directory.error() {
            Some(message) => self.notices.error(message, now),
            None => self.page = 1,
        }
        true
    }

    pub fn sync_roles(&mut self, roles: &RolesCompute, now: DateTime<Utc>) -> bool {
        if roles.revision() == self.seen_roles_revision {
            return false;
        }
        self.seen_roles_revision = roles.revision();
        if let Some(message) = roles.error() {
            self.notices.error(message, now);
        }
        true
    }

    /// Apply a finished action outcome once.
    ///
    /// Notifications always happen. Closing the dialog and merging field
    /// errors only happen while the dialog still shows the same user.
    pub fn sync_action(&mut self, action: &UserActionCompute, now: DateTime<Utc>) -> bool {
        if action.revision() == self.seen_action_revision || !action.state().is_finished() {
            return false;
        }
        self.seen_action_revision = action.revision();
        self.loading = false;

        match action.state() {
            UserActionState::Success { kind, user, message } => {
                self.notices.toast(NoticeKind::Success, message.clone(), now);
                self.notices.success(message.clone(), now);
                if self.view.target_id() == Some(*user) && self.dialog_kind() == Some(*kind) {
                    self.close_view();
                }
            }
            UserActionState::Error {
                kind,
                user,
                message,
                field_errors,
            } => {
                self.notices.toast(NoticeKind::Error, message.clone(), now);
                self.notices.error(message.clone(), now);
                if self.view.target_id() == Some(*user) && self.dialog_kind() == Some(*kind) {
                    self.form_errors.merge(field_errors);
                }
            }
            UserActionState::Idle | UserActionState::InFlight { .. } => {}
        }
        true
    }

    fn dialog_kind(&self) -> Option<UserActionKind> {
        match self.view {
            ViewState::Editing(_) => Some(UserActionKind::UpdateProfile),
            ViewState::ChangingPassword(_) => Some(UserActionKind::ChangePassword),
            ViewState::ConfirmingToggle(_) => Some(UserActionKind::ToggleActive),
            ViewState::Idle | ViewState::ShowingDetails(_) => None,
        }
    }

    // dialogs

    pub fn open_details(&mut self, user: User) {
        self.form_errors.clear();
        self.view = ViewState::ShowingDetails(user);
    }

    /// Pre-fills the profile form from `user`.
    pub fn open_edit(&mut self, user: User) {
        self.form_errors.clear();
        self.profile_form = ProfileForm::from_user(&user);
        self.view = ViewState::Editing(user);
    }

    /// Starts from an empty password form.
    pub fn open_change_password(&mut self, user: User) {
        self.form_errors.clear();
        self.password_form = PasswordForm::default();
        self.view = ViewState::ChangingPassword(user);
    }

    pub fn open_toggle(&mut self, user: User) {
        self.form_errors.clear();
        self.view = ViewState::ConfirmingToggle(user);
    }

    pub fn close_view(&mut self) {
        self.view = ViewState::Idle;
        self.form_errors.clear();
        self.password_form = PasswordForm::default();
    }

    /// Validate the profile form. `None` leaves the errors on the form.
    pub fn submit_profile(&mut self) -> Option<UserActionInput> {
        if self.loading {
            return None;
        }
        let ViewState::Editing(user) = &self.view else {
            return None;
        };
        let errors = self.profile_form.validate();
        if !errors.is_empty() {
            self.form_errors = errors;
            return None;
        }
        self.form_errors.clear();
        self.loading = true;
        Some(UserActionInput {
            user: Some(user.id),
            profile: Some(self.profile_form.to_request()),
            ..UserActionInput::default()
        })
    }

    pub fn submit_password(&mut self) -> Option<UserActionInput> {
        if self.loading {
            return None;
        }
        let ViewState::ChangingPassword(user) = &self.view else {
            return None;
        };
        let errors = self.password_form.validate();
        if !errors.is_empty() {
            self.form_errors = errors;
            return None;
        }
        self.form_errors.clear();
        self.loading = true;
        Some(UserActionInput {
            user: Some(user.id),
            password: Some(self.password_form.to_request()),
            ..UserActionInput::default()
        })
    }

    /// Flip the active flag of the user in the confirmation dialog.
    pub fn confirm_toggle(&mut self) -> Option<UserActionInput> {
        if self.loading {
            return None;
        }
        let ViewState::ConfirmingToggle(user) = &self.view else {
            return None;
        };
        let set_active = !user.is_active;
        self.loading = true;
        Some(UserActionInput {
            user: Some(user.id),
            set_active: Some(set_active),
            ..UserActionInput::default()
        })
    }

    /// Drop every pending timer and dialog.
    pub fn teardown(&mut self) {
        self.search_debounce.cancel();
        self.notices.clear();
        self.close_view();
        self.loading = false;
    }
}

impl SnapshotClone for UsersPanelState {}

impl State for UsersPanelState {
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
