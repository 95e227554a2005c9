use ustr::Ustr;

use crate::users::model::User;

/// Which dialog of the users panel is open.
///
/// One variant at a time; the user each dialog works on travels with it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ViewState {
    #[default]
    Idle,
    Editing(User),
    ChangingPassword(User),
    ShowingDetails(User),
    ConfirmingToggle(User),
}

impl ViewState {
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    pub fn target(&self) -> Option<&User> {
        match self {
            Self::Idle => None,
            Self::Editing(user)
            | Self::ChangingPassword(user)
            | Self::ShowingDetails(user)
            | Self::ConfirmingToggle(user) => Some(user),
        }
    }

    pub fn target_id(&self) -> Option<Ustr> {
        self.target().map(|user| user.id)
    }

    /// Dialog title.
    pub fn title(&self) -> &'static str {
        match self {
            Self::Idle => "",
            Self::Editing(_) => "Edit User",
            Self::ChangingPassword(_) => "Change Password",
            Self::ShowingDetails(_) => "User Details",
            Self::ConfirmingToggle(user) if user.is_active => "Deactivate User",
            Self::ConfirmingToggle(_) => "Activate User",
        }
    }
}
