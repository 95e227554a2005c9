//! Search box, filters and the refresh button above the table.

use chrono::{DateTime, Utc};
use egui::{Button, ComboBox, TextEdit, Ui};
use roster_business::users::{
    FilterState, RoleFilter, RolesCompute, StatusFilter, UsersDirectoryCompute, UsersPanelState,
    workflow,
};
use roster_states::StateCtx;

use crate::utils::colors::COLOR_AMBER;

pub const SEARCH_HINT: &str = "Search by name, username or email";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolbarAction {
    Search(String),
    Status(StatusFilter),
    Role(RoleFilter),
    ClearFilters,
    Refresh,
}

impl ToolbarAction {
    pub fn apply(self, state_ctx: &mut StateCtx, now: DateTime<Utc>) {
        match self {
            Self::Search(text) => state_ctx.update::<UsersPanelState>(|panel| {
                panel.search_input = text;
                panel.on_search_changed(now);
            }),
            Self::Status(status) => {
                state_ctx.update::<UsersPanelState>(|panel| panel.set_status_filter(status));
            }
            Self::Role(role) => {
                state_ctx.update::<UsersPanelState>(|panel| panel.set_role_filter(role));
            }
            Self::ClearFilters => {
                state_ctx.update::<UsersPanelState>(UsersPanelState::clear_filters);
            }
            Self::Refresh => {
                log::debug!("Refresh requested");
                workflow::refresh(state_ctx);
            }
        }
    }
}

fn role_label(roles: &RolesCompute, filter: RoleFilter) -> String {
    match filter {
        RoleFilter::All => "All roles".to_owned(),
        RoleFilter::Role(id) => roles.name_of(id).unwrap_or(id.as_str()).to_owned(),
    }
}

/// Renders the toolbar. At most one action per frame.
pub fn render_toolbar(state_ctx: &StateCtx, ui: &mut Ui) -> Option<ToolbarAction> {
    let panel = state_ctx.state::<UsersPanelState>();
    let roles = state_ctx.compute::<RolesCompute>();
    let filters: &FilterState = panel.filters();
    let mut action = None;

    ui.horizontal(|ui| {
        let mut search = panel.search_input.clone();
        let response = ui.add(
            TextEdit::singleline(&mut search)
                .hint_text(SEARCH_HINT)
                .desired_width(240.0),
        );
        if response.changed() {
            action = Some(ToolbarAction::Search(search));
        }
        if panel.is_search_pending() {
            ui.colored_label(COLOR_AMBER, "…");
        }

        let mut status = filters.status;
        ComboBox::from_id_salt("users_status_filter")
            .selected_text(status.label())
            .show_ui(ui, |ui| {
                for option in StatusFilter::ALL {
                    ui.selectable_value(&mut status, option, option.label());
                }
            });
        if status != filters.status {
            action = Some(ToolbarAction::Status(status));
        }

        let mut role = filters.role;
        ComboBox::from_id_salt("users_role_filter")
            .selected_text(role_label(roles, role))
            .show_ui(ui, |ui| {
                ui.selectable_value(&mut role, RoleFilter::All, "All roles");
                for option in roles.roles() {
                    ui.selectable_value(&mut role, RoleFilter::Role(option.id), option.name.as_str());
                }
            });
        if role != filters.role {
            action = Some(ToolbarAction::Role(role));
        }

        let has_filters = !filters.is_default() || !panel.search_input.is_empty();
        if ui
            .add_enabled(has_filters, Button::new("Clear filters"))
            .clicked()
        {
            action = Some(ToolbarAction::ClearFilters);
        }

        let busy = state_ctx.compute::<UsersDirectoryCompute>().is_loading();
        if ui.add_enabled(!busy, Button::new("⟳ Refresh")).clicked() {
            action = Some(ToolbarAction::Refresh);
        }
        if busy {
            ui.spinner();
        }
    });

    action
}
