mod session_status;
pub mod users;

pub use session_status::session_status;
pub use users::users_panel;
