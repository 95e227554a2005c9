//! Main users panel.

use egui::{Response, Ui};
use roster_business::users::{UsersDirectoryCompute, UsersListingCompute, UsersPanelState, workflow};
use roster_states::{StateCtx, Time};

use super::modals::{ModalAction, show_user_modal};
use super::notices::{render_banners, render_toasts};
use super::pagination::render_pagination;
use super::table::users_table;
use super::toolbar::render_toolbar;

fn apply_modal_action(state_ctx: &mut StateCtx, action: ModalAction) {
    match action {
        ModalAction::Close => {
            state_ctx.update::<UsersPanelState>(UsersPanelState::close_view);
        }
        ModalAction::EditProfile(form) => {
            state_ctx.update::<UsersPanelState>(|panel| panel.profile_form = form);
        }
        ModalAction::EditPassword(form) => {
            state_ctx.update::<UsersPanelState>(|panel| panel.password_form = form);
        }
        ModalAction::SubmitProfile => {
            if !workflow::submit_profile(state_ctx) {
                log::debug!("Profile form rejected");
            }
        }
        ModalAction::SubmitPassword => {
            if !workflow::submit_password(state_ctx) {
                log::debug!("Password form rejected");
            }
        }
        ModalAction::ConfirmToggle => {
            workflow::confirm_toggle(state_ctx);
        }
        ModalAction::Open(row_action, user) => {
            state_ctx.update::<UsersPanelState>(|panel| row_action.open(panel, user));
        }
    }
}

/// Displays the users panel: banners, toolbar, table, pagination, the open
/// dialog and toasts.
pub fn users_panel(state_ctx: &mut StateCtx, ui: &mut Ui) -> Response {
    let now = state_ctx.state::<Time>().now();

    let response = ui.vertical(|ui| {
        let notices = state_ctx.state::<UsersPanelState>().notices();
        if let Some(dismissed) = render_banners(ui, notices) {
            state_ctx.update::<UsersPanelState>(|panel| dismissed.apply(panel.notices_mut()));
        }

        if let Some(action) = render_toolbar(state_ctx, ui) {
            action.apply(state_ctx, now);
        }
        ui.add_space(8.0);

        let listing = state_ctx.compute::<UsersListingCompute>();
        let sort = state_ctx.state::<UsersPanelState>().sort();
        let is_loading = state_ctx.compute::<UsersDirectoryCompute>().is_loading();

        let table = users_table(ui, listing.page(), sort, is_loading);
        ui.add_space(8.0);
        let page_action = render_pagination(ui, listing);
        let total_pages = listing.page().total_pages;

        // Apply after rendering (avoids borrowing the state while drawing)
        if let Some(key) = table.sort_clicked {
            state_ctx.update::<UsersPanelState>(|panel| panel.toggle_sort(key));
        }
        if let Some((row_action, user)) = table.row_action {
            state_ctx.update::<UsersPanelState>(|panel| row_action.open(panel, user));
        }
        if let Some(page_action) = page_action {
            state_ctx.update::<UsersPanelState>(|panel| page_action.apply(panel, total_pages));
        }
    });

    for action in show_user_modal(state_ctx, ui) {
        apply_modal_action(state_ctx, action);
    }

    render_toasts(ui.ctx(), state_ctx.state::<UsersPanelState>().notices());

    response.response
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use egui_kittest::Harness;
    use kittest::Queryable;
    use roster_business::users::{
        NoticeKind, Role, RolesCompute, SortKey, StatusFilter, User, UserActionInput,
        UsersDirectoryCompute, UsersPanelState, ViewState, workflow,
    };
    use roster_states::Time;
    use ustr::Ustr;

    use super::users_panel;
    use crate::state::State;

    fn role(id: &str, name: &str) -> Role {
        Role {
            id: Ustr::from(id),
            name: name.to_owned(),
            description: format!("{name} role"),
        }
    }

    fn user(id: &str, username: &str, is_active: bool) -> User {
        User {
            id: Ustr::from(id),
            username: username.to_owned(),
            email: format!("{username}@example.com"),
            first_name: username.to_uppercase(),
            last_name: "Tester".to_owned(),
            is_active,
            roles: vec![role("r1", "Admin")],
        }
    }

    fn many_users(count: usize) -> Vec<User> {
        (1..=count)
            .map(|i| user(&format!("u{i}"), &format!("user{i:02}"), true))
            .collect()
    }

    fn create_test_state(users: Vec<User>) -> State {
        let mut state = State::test("http://test", Some("token"));
        state.ctx.updater().set(UsersDirectoryCompute::loaded(users));
        state
            .ctx
            .updater()
            .set(RolesCompute::loaded(vec![role("r1", "Admin"), role("r2", "Viewer")]));
        state.ctx.run_computed();
        let now = Utc::now();
        state.ctx.update::<Time>(|time| *time = Time::new(now));
        workflow::sync_panel(&mut state.ctx, now);
        state.ctx.run_computed();
        state
    }

    fn render(ui: &mut egui::Ui, state: &mut State) {
        users_panel(&mut state.ctx, ui);
        state.ctx.run_computed();
    }

    fn panel_harness(state: State) -> Harness<'static, State> {
        Harness::builder()
            .with_size(egui::vec2(1280.0, 800.0))
            .build_ui_state(render, state)
    }

    fn settle(harness: &mut Harness<'_, State>) {
        for _ in 0..3 {
            harness.step();
        }
    }

    #[test]
    fn test_table_header_elements_exist() {
        let harness = panel_harness(create_test_state(Vec::new()));

        for header in ["ID", "Username", "Name", "Email", "Roles", "Status", "Actions"] {
            assert!(
                harness.query_by_label(header).is_some(),
                "{header} header should exist"
            );
        }
    }

    #[test]
    fn test_toolbar_elements_exist() {
        let harness = panel_harness(create_test_state(Vec::new()));

        assert!(harness.query_by_label_contains("Refresh").is_some());
        assert!(harness.query_by_label("Clear filters").is_some());
    }

    #[test]
    fn test_user_rows_display_with_data() {
        let harness = panel_harness(create_test_state(vec![
            user("u1", "alice", true),
            user("u2", "bob", false),
        ]));

        assert!(harness.query_by_label("alice").is_some());
        assert!(harness.query_by_label("bob").is_some());
        assert!(harness.query_by_label("alice@example.com").is_some());
        assert_eq!(harness.query_all_by_label("Admin").count(), 2);
        assert!(harness.query_by_label("Inactive").is_some());
    }

    #[test]
    fn test_empty_list_shows_placeholders() {
        let harness = panel_harness(create_test_state(Vec::new()));

        assert!(harness.query_by_label("No users to show").is_some());
        assert!(harness.query_by_label("No users found").is_some());
    }

    #[test]
    fn test_next_page_moves_summary() {
        let mut harness = panel_harness(create_test_state(many_users(25)));

        assert!(harness.query_by_label("Showing 1 to 10 of 25 users").is_some());
        assert!(harness.query_by_label("user01").is_some());

        harness.get_by_label("Next ▶").click();
        settle(&mut harness);

        assert_eq!(harness.state().ctx.state::<UsersPanelState>().page(), 2);
        assert!(harness.query_by_label("Showing 11 to 20 of 25 users").is_some());
        assert!(harness.query_by_label("user11").is_some());
        assert!(harness.query_by_label("user01").is_none());
    }

    #[test]
    fn test_next_is_inert_on_last_page() {
        let mut state = create_test_state(many_users(25));
        state
            .ctx
            .update::<UsersPanelState>(|panel| panel.go_to_page(3, 3));
        state.ctx.run_computed();
        let mut harness = panel_harness(state);

        assert!(harness.query_by_label("Showing 21 to 25 of 25 users").is_some());
        harness.get_by_label("Next ▶").click();
        settle(&mut harness);

        assert_eq!(harness.state().ctx.state::<UsersPanelState>().page(), 3);
    }

    #[test]
    fn test_page_number_buttons_jump() {
        let mut harness = panel_harness(create_test_state(many_users(25)));

        harness.get_by_label("3").click();
        settle(&mut harness);

        assert!(harness.query_by_label("Showing 21 to 25 of 25 users").is_some());
    }

    #[test]
    fn test_sorted_header_shows_arrow() {
        let mut state = create_test_state(vec![user("u1", "bob", true), user("u2", "amy", true)]);
        state
            .ctx
            .update::<UsersPanelState>(|panel| panel.toggle_sort(SortKey::Username));
        state.ctx.run_computed();
        let mut harness = panel_harness(state);

        assert!(harness.query_by_label("Username ▲").is_some());

        harness
            .state_mut()
            .ctx
            .update::<UsersPanelState>(|panel| panel.toggle_sort(SortKey::Username));
        settle(&mut harness);
        assert!(harness.query_by_label("Username ▼").is_some());
    }

    #[test]
    fn test_status_filter_hides_other_users() {
        let mut state = create_test_state(vec![user("u1", "bob", true), user("u2", "amy", false)]);
        state
            .ctx
            .update::<UsersPanelState>(|panel| panel.set_status_filter(StatusFilter::Inactive));
        state.ctx.run_computed();
        let harness = panel_harness(state);

        assert!(harness.query_by_label("amy").is_some());
        assert!(harness.query_by_label("bob").is_none());
        assert!(harness.query_by_label("Showing 1 to 1 of 1 users").is_some());
    }

    #[test]
    fn test_clear_filters_button_resets_filters() {
        let mut state = create_test_state(vec![user("u1", "bob", true), user("u2", "amy", false)]);
        state
            .ctx
            .update::<UsersPanelState>(|panel| panel.set_status_filter(StatusFilter::Inactive));
        state.ctx.run_computed();
        let mut harness = panel_harness(state);

        harness.get_by_label("Clear filters").click();
        settle(&mut harness);

        assert!(
            harness
                .state()
                .ctx
                .state::<UsersPanelState>()
                .filters()
                .is_default()
        );
        assert!(harness.query_by_label("bob").is_some());
    }

    #[test]
    fn test_details_dialog_shows_user() {
        let alice = user("u1", "alice", true);
        let mut state = create_test_state(vec![alice.clone()]);
        state
            .ctx
            .update::<UsersPanelState>(|panel| panel.open_details(alice));
        let mut harness = panel_harness(state);

        assert!(harness.query_by_label("User Details").is_some());
        assert!(harness.query_by_label("Viewer").is_none());

        harness.get_by_label("Done").click();
        settle(&mut harness);

        assert!(harness.state().ctx.state::<UsersPanelState>().view().is_idle());
    }

    #[test]
    fn test_details_dialog_switches_to_edit() {
        let alice = user("u1", "alice", true);
        let mut state = create_test_state(vec![alice.clone()]);
        state
            .ctx
            .update::<UsersPanelState>(|panel| panel.open_details(alice));
        let mut harness = panel_harness(state);

        harness.get_by_label("Edit profile").click();
        settle(&mut harness);

        let panel = harness.state().ctx.state::<UsersPanelState>();
        assert!(matches!(panel.view(), ViewState::Editing(user) if user.username == "alice"));
        assert_eq!(panel.profile_form.email, "alice@example.com");
    }

    #[test]
    fn test_invalid_profile_shows_field_errors() {
        let alice = user("u1", "alice", true);
        let mut state = create_test_state(vec![alice.clone()]);
        state.ctx.update::<UsersPanelState>(|panel| {
            panel.open_edit(alice);
            panel.profile_form.first_name.clear();
            panel.profile_form.email = "not-an-email".to_owned();
        });
        let mut harness = panel_harness(state);

        harness.get_by_label("Save changes").click();
        settle(&mut harness);

        assert!(harness.query_by_label("First name is required").is_some());
        assert!(
            harness
                .query_by_label("Please enter a valid email address")
                .is_some()
        );
        let state = harness.state();
        assert!(!state.ctx.state::<UsersPanelState>().is_loading());
        assert!(!state.ctx.has_pending_commands());
    }

    #[test]
    fn test_valid_profile_queues_update() {
        let alice = user("u1", "alice", true);
        let mut state = create_test_state(vec![alice.clone()]);
        state.ctx.update::<UsersPanelState>(|panel| {
            panel.open_edit(alice);
            panel.profile_form.last_name = "Liddell".to_owned();
        });
        let mut harness = panel_harness(state);

        harness.get_by_label("Save changes").click();
        settle(&mut harness);

        let state = harness.state();
        assert!(state.ctx.state::<UsersPanelState>().is_loading());
        assert!(state.ctx.has_pending_commands());
        let input = state.ctx.state::<UserActionInput>();
        assert_eq!(input.user, Some(Ustr::from("u1")));
        assert_eq!(
            input.profile.as_ref().and_then(|p| p.last_name.as_deref()),
            Some("Liddell")
        );
    }

    #[test]
    fn test_password_mismatch_shows_error() {
        let alice = user("u1", "alice", true);
        let mut state = create_test_state(vec![alice.clone()]);
        state.ctx.update::<UsersPanelState>(|panel| {
            panel.open_change_password(alice);
            panel.password_form.current_password = "old-secret".to_owned();
            panel.password_form.new_password = "longenough1".to_owned();
            panel.password_form.confirm_password = "different".to_owned();
        });
        let mut harness = panel_harness(state);

        harness.get_by_label("Update password").click();
        settle(&mut harness);

        assert!(harness.query_by_label("Passwords do not match").is_some());
        let errors = harness.state().ctx.state::<UsersPanelState>().form_errors();
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn test_toggle_dialog_cancel_closes() {
        let alice = user("u1", "alice", true);
        let mut state = create_test_state(vec![alice.clone()]);
        state
            .ctx
            .update::<UsersPanelState>(|panel| panel.open_toggle(alice));
        let mut harness = panel_harness(state);

        assert!(harness.query_by_label("Deactivate User").is_some());
        assert!(harness.query_by_label("Deactivate alice?").is_some());

        harness.get_by_label("Cancel").click();
        settle(&mut harness);

        assert!(harness.state().ctx.state::<UsersPanelState>().view().is_idle());
        assert!(!harness.state().ctx.has_pending_commands());
    }

    #[test]
    fn test_error_banner_can_be_dismissed() {
        let mut state = create_test_state(Vec::new());
        let now = state.ctx.state::<Time>().now();
        state.ctx.update::<UsersPanelState>(|panel| {
            let notices = panel.notices_mut();
            notices.toast(NoticeKind::Error, "Failed to load users", now);
            notices.error("Failed to load users", now);
        });
        let mut harness = panel_harness(state);

        // banner and toast
        assert_eq!(harness.query_all_by_label("Failed to load users").count(), 2);

        harness.get_by_label("✖").click();
        settle(&mut harness);

        let notices = harness.state().ctx.state::<UsersPanelState>().notices();
        assert!(notices.error_banner().is_none());
        assert_eq!(notices.toasts().len(), 1);
    }
}
