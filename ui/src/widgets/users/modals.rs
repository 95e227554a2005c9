//! Dialogs of the users panel: details, edit profile, change password and
//! the activate/deactivate confirmation.
//!
//! Dialogs only read [`UsersPanelState`]. Edits and clicks come back as
//! [`ModalAction`]s the panel applies after rendering.

use egui::{Align2, Button, Grid, Id, RichText, TextEdit, Ui, Window};
use roster_business::users::validation::fields;
use roster_business::users::{
    FieldErrors, PasswordForm, ProfileForm, RolesCompute, User, UsersPanelState, ViewState,
};
use roster_states::StateCtx;

use super::table::cells::{role_badge, status_text};
use super::table::row::RowAction;
use crate::utils::colors::COLOR_RED;

const FIELD_WIDTH: f32 = 280.0;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModalAction {
    Close,
    EditProfile(ProfileForm),
    EditPassword(PasswordForm),
    SubmitProfile,
    SubmitPassword,
    ConfirmToggle,
    /// Switch from the details dialog to another dialog of the same user.
    Open(RowAction, User),
}

fn field_error(ui: &mut Ui, errors: &FieldErrors, field: &str) {
    if let Some(message) = errors.get(field) {
        ui.colored_label(COLOR_RED, message);
    }
}

fn text_field(
    ui: &mut Ui,
    label: &str,
    value: &mut String,
    errors: &FieldErrors,
    field: &str,
    password: bool,
) {
    ui.label(label);
    ui.add(
        TextEdit::singleline(value)
            .password(password)
            .desired_width(FIELD_WIDTH),
    );
    field_error(ui, errors, field);
    ui.add_space(4.0);
}

/// Server errors for keys no field of the dialog shows.
fn other_errors(ui: &mut Ui, errors: &FieldErrors, shown: &[&str]) {
    for field in errors.fields().filter(|field| !shown.contains(field)) {
        if let Some(message) = errors.get(field) {
            ui.colored_label(COLOR_RED, format!("{field}: {message}"));
        }
    }
}

fn saving_indicator(ui: &mut Ui, loading: bool) {
    if loading {
        ui.spinner();
        ui.label("Saving...");
    }
}

fn details_body(ui: &mut Ui, user: &User, actions: &mut Vec<ModalAction>) {
    Grid::new("user_details_grid")
        .num_columns(2)
        .spacing([16.0, 6.0])
        .show(ui, |ui| {
            ui.strong("ID");
            ui.label(RichText::new(user.id.as_str()).monospace());
            ui.end_row();

            ui.strong("Username");
            ui.label(user.username.as_str());
            ui.end_row();

            ui.strong("Name");
            ui.label(user.full_name().trim());
            ui.end_row();

            ui.strong("Email");
            ui.label(user.email.as_str());
            ui.end_row();

            ui.strong("Status");
            ui.label(status_text(user.is_active));
            ui.end_row();

            ui.strong("Roles");
            ui.horizontal_wrapped(|ui| {
                if user.roles.is_empty() {
                    ui.weak("No roles");
                }
                for role in &user.roles {
                    role_badge(ui, &role.name).on_hover_text(role.description.as_str());
                }
            });
            ui.end_row();
        });

    ui.add_space(12.0);
    ui.horizontal(|ui| {
        if ui.button("Edit profile").clicked() {
            actions.push(ModalAction::Open(RowAction::Edit, user.clone()));
        }
        if ui.button("Change password").clicked() {
            actions.push(ModalAction::Open(RowAction::ChangePassword, user.clone()));
        }
        if ui.button("Done").clicked() {
            actions.push(ModalAction::Close);
        }
    });
}

fn edit_body(
    ui: &mut Ui,
    panel: &UsersPanelState,
    roles: &RolesCompute,
    actions: &mut Vec<ModalAction>,
) {
    let errors = panel.form_errors();
    let loading = panel.is_loading();
    let mut form = panel.profile_form.clone();

    ui.add_enabled_ui(!loading, |ui| {
        text_field(ui, "First name", &mut form.first_name, errors, fields::FIRST_NAME, false);
        text_field(ui, "Last name", &mut form.last_name, errors, fields::LAST_NAME, false);
        text_field(ui, "Email", &mut form.email, errors, fields::EMAIL, false);
        text_field(ui, "Username", &mut form.username, errors, fields::USERNAME, false);

        ui.label("Roles");
        if roles.roles().is_empty() {
            ui.weak("No roles available");
        }
        for role in roles.roles() {
            let mut selected = form.has_role(role.id);
            if ui
                .checkbox(&mut selected, role.name.as_str())
                .on_hover_text(role.description.as_str())
                .changed()
            {
                form.set_role(role.id, selected);
            }
        }
        field_error(ui, errors, fields::ROLES);
    });
    other_errors(
        ui,
        errors,
        &[
            fields::FIRST_NAME,
            fields::LAST_NAME,
            fields::EMAIL,
            fields::USERNAME,
            fields::ROLES,
        ],
    );

    if form != panel.profile_form {
        actions.push(ModalAction::EditProfile(form));
    }

    ui.add_space(12.0);
    ui.horizontal(|ui| {
        if ui.add_enabled(!loading, Button::new("Save changes")).clicked() {
            actions.push(ModalAction::SubmitProfile);
        }
        if ui.button("Cancel").clicked() {
            actions.push(ModalAction::Close);
        }
        saving_indicator(ui, loading);
    });
}

fn password_body(ui: &mut Ui, panel: &UsersPanelState, actions: &mut Vec<ModalAction>) {
    let errors = panel.form_errors();
    let loading = panel.is_loading();
    let mut form = panel.password_form.clone();

    ui.add_enabled_ui(!loading, |ui| {
        text_field(
            ui,
            "Current password",
            &mut form.current_password,
            errors,
            fields::CURRENT_PASSWORD,
            true,
        );
        text_field(
            ui,
            "New password",
            &mut form.new_password,
            errors,
            fields::NEW_PASSWORD,
            true,
        );
        text_field(
            ui,
            "Confirm new password",
            &mut form.confirm_password,
            errors,
            fields::CONFIRM_PASSWORD,
            true,
        );
    });
    other_errors(
        ui,
        errors,
        &[
            fields::CURRENT_PASSWORD,
            fields::NEW_PASSWORD,
            fields::CONFIRM_PASSWORD,
        ],
    );

    if form != panel.password_form {
        actions.push(ModalAction::EditPassword(form));
    }

    ui.add_space(12.0);
    ui.horizontal(|ui| {
        if ui.add_enabled(!loading, Button::new("Update password")).clicked() {
            actions.push(ModalAction::SubmitPassword);
        }
        if ui.button("Cancel").clicked() {
            actions.push(ModalAction::Close);
        }
        saving_indicator(ui, loading);
    });
}

fn toggle_body(ui: &mut Ui, user: &User, loading: bool, actions: &mut Vec<ModalAction>) {
    let (question, consequence, confirm) = if user.is_active {
        (
            format!("Deactivate {}?", user.username),
            "They will no longer be able to sign in.",
            "Deactivate",
        )
    } else {
        (
            format!("Activate {}?", user.username),
            "They will be able to sign in again.",
            "Activate",
        )
    };

    ui.label(RichText::new(question).strong());
    ui.label(consequence);

    ui.add_space(12.0);
    ui.horizontal(|ui| {
        if ui.add_enabled(!loading, Button::new(confirm)).clicked() {
            actions.push(ModalAction::ConfirmToggle);
        }
        if ui.button("Cancel").clicked() {
            actions.push(ModalAction::Close);
        }
        saving_indicator(ui, loading);
    });
}

/// Shows the dialog of the current [`ViewState`], if any.
pub fn show_user_modal(state_ctx: &StateCtx, ui: &mut Ui) -> Vec<ModalAction> {
    let panel = state_ctx.state::<UsersPanelState>();
    let view = panel.view();
    let mut actions = Vec::new();
    if view.is_idle() {
        return actions;
    }

    let roles = state_ctx.compute::<RolesCompute>();
    let mut open = true;

    Window::new(view.title())
        .id(Id::new("users_dialog"))
        .open(&mut open)
        .collapsible(false)
        .resizable(false)
        .anchor(Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ui.ctx(), |ui| match view {
            ViewState::Idle => {}
            ViewState::ShowingDetails(user) => details_body(ui, user, &mut actions),
            ViewState::Editing(_) => edit_body(ui, panel, roles, &mut actions),
            ViewState::ChangingPassword(_) => password_body(ui, panel, &mut actions),
            ViewState::ConfirmingToggle(user) => {
                toggle_body(ui, user, panel.is_loading(), &mut actions);
            }
        });

    if !open {
        actions.push(ModalAction::Close);
    }
    actions
}
