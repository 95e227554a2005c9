//! The users administration screen: listing, dialogs, mutations.
//!
//! Widgets under `roster-ui` only render. State, computes and commands live
//! here and are registered with [`crate::register`].

pub mod actions;
pub mod api;
pub mod directory;
pub mod listing;
pub mod listing_compute;
pub mod model;
pub mod notice;
pub mod panel_state;
pub mod timers;
pub mod validation;
pub mod view;
pub mod workflow;

pub use actions::{
    ChangeUserPasswordCommand, ToggleUserActiveCommand, UpdateUserProfileCommand,
    UserActionCompute, UserActionInput, UserActionKind, UserActionState,
};
pub use api::{Acknowledged, ApiError, ApiResult};
pub use directory::{
    RefreshRolesCommand, RefreshUsersCommand, RolesCompute, UsersDirectoryCompute,
};
pub use listing::{
    FilterState, ListingPage, RoleFilter, SortDirection, SortKey, SortState, StatusFilter,
    run_listing,
};
pub use listing_compute::UsersListingCompute;
pub use model::{Role, User};
pub use notice::{Notice, NoticeKind, Notices};
pub use panel_state::UsersPanelState;
pub use timers::Debouncer;
pub use validation::{FieldErrors, PasswordForm, ProfileForm};
pub use view::ViewState;
