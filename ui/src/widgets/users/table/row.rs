//! Row rendering for the users table.

use egui_extras::TableRow;
use roster_business::users::{User, UsersPanelState};

use super::cells::{
    render_action_buttons, render_id_cell, render_roles_cell, render_status_cell,
    render_text_cell,
};

/// Buttons in the actions column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowAction {
    Details,
    Edit,
    ChangePassword,
    ToggleActive,
}

impl RowAction {
    /// Open the dialog this action belongs to.
    pub fn open(self, panel: &mut UsersPanelState, user: User) {
        match self {
            Self::Details => panel.open_details(user),
            Self::Edit => panel.open_edit(user),
            Self::ChangePassword => panel.open_change_password(user),
            Self::ToggleActive => panel.open_toggle(user),
        }
    }
}

#[inline]
pub fn render_user_row(row: &mut TableRow<'_, '_>, user: &User) -> Option<RowAction> {
    let mut action = None;

    row.col(|ui| render_id_cell(ui, &user.id));
    row.col(|ui| render_text_cell(ui, &user.username));
    row.col(|ui| render_text_cell(ui, user.full_name().trim()));
    row.col(|ui| render_text_cell(ui, &user.email));
    row.col(|ui| render_roles_cell(ui, &user.roles));
    row.col(|ui| render_status_cell(ui, user.is_active));
    row.col(|ui| action = render_action_buttons(ui, user.is_active));

    action
}
