//! Cell renderers for the users table.

use egui::{CornerRadius, Frame, Margin, Response, RichText, Ui};
use roster_business::users::Role;

use super::row::RowAction;
use crate::utils::colors::{COLOR_BADGE, COLOR_BADGE_TEXT, COLOR_GREEN, COLOR_RED};

#[inline]
pub fn render_id_cell(ui: &mut Ui, id: &str) {
    ui.label(RichText::new(id).monospace());
}

#[inline]
pub fn render_text_cell(ui: &mut Ui, text: &str) {
    ui.label(text);
}

/// One badge per role, or a weak placeholder when the user has none.
#[inline]
pub fn render_roles_cell(ui: &mut Ui, roles: &[Role]) {
    if roles.is_empty() {
        ui.weak("No roles");
        return;
    }
    ui.horizontal_wrapped(|ui| {
        for role in roles {
            role_badge(ui, &role.name).on_hover_text(role.description.as_str());
        }
    });
}

pub fn role_badge(ui: &mut Ui, name: &str) -> Response {
    Frame::NONE
        .fill(COLOR_BADGE)
        .corner_radius(CornerRadius::same(6))
        .inner_margin(Margin::symmetric(6, 2))
        .show(ui, |ui| {
            ui.label(RichText::new(name).small().color(COLOR_BADGE_TEXT));
        })
        .response
}

pub fn status_text(is_active: bool) -> RichText {
    if is_active {
        RichText::new("Active").color(COLOR_GREEN)
    } else {
        RichText::new("Inactive").color(COLOR_RED)
    }
}

#[inline]
pub fn render_status_cell(ui: &mut Ui, is_active: bool) {
    ui.label(status_text(is_active));
}

/// Returns the action whose button was clicked.
#[inline]
pub fn render_action_buttons(ui: &mut Ui, is_active: bool) -> Option<RowAction> {
    let mut action = None;

    ui.horizontal(|ui| {
        if ui.button("View").on_hover_text("User details").clicked() {
            action = Some(RowAction::Details);
        }
        if ui.button("Edit").on_hover_text("Edit profile").clicked() {
            action = Some(RowAction::Edit);
        }
        if ui.button("Password").on_hover_text("Change password").clicked() {
            action = Some(RowAction::ChangePassword);
        }
        let toggle = if is_active { "Deactivate" } else { "Activate" };
        if ui.button(toggle).clicked() {
            action = Some(RowAction::ToggleActive);
        }
    });

    action
}
