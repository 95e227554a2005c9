//! The users administration panel and its parts:
//! - `toolbar`: search box, filters, refresh
//! - `table`: the current page of users
//! - `pagination`: summary and page buttons
//! - `modals`: details, edit, password and toggle dialogs
//! - `notices`: banners and toasts

pub mod modals;
pub mod notices;
pub mod pagination;
mod panel;
pub mod table;
pub mod toolbar;

pub use panel::users_panel;
