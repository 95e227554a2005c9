use std::time::Duration;

use chrono::Utc;
use roster_business::users::{
    RolesCompute, UserActionCompute, UsersDirectoryCompute, UsersPanelState, workflow,
};
use roster_states::Time;

use crate::{state::State, widgets};

/// Repaint cadence while a request is in flight.
const IN_FLIGHT_REPAINT: Duration = Duration::from_millis(100);

pub struct RosterApp {
    pub state: State,
    mounted: bool,
}

impl RosterApp {
    /// Called once before the first frame.
    pub fn new(state: State) -> Self {
        Self {
            state,
            mounted: false,
        }
    }

    /// Runs once, on the first frame.
    fn mount(&mut self) {
        if self.mounted {
            return;
        }
        self.mounted = true;
        log::info!("Loading users and roles");
        workflow::refresh(&mut self.state.ctx);
    }

    /// Ask for the next frame when a timer is due or a request is pending.
    fn schedule_repaint(&self, ctx: &egui::Context) {
        let state_ctx = &self.state.ctx;
        let busy = state_ctx.compute::<UsersDirectoryCompute>().is_loading()
            || state_ctx.compute::<RolesCompute>().is_loading()
            || state_ctx.compute::<UserActionCompute>().is_in_flight();
        if busy {
            ctx.request_repaint_after(IN_FLIGHT_REPAINT);
        }

        let now = state_ctx.state::<Time>().now();
        if let Some(deadline) = state_ctx.state::<UsersPanelState>().next_deadline() {
            let wait = (deadline - now).to_std().unwrap_or_default();
            ctx.request_repaint_after(wait);
        }
    }
}

impl eframe::App for RosterApp {
    /// Called each time the UI needs repainting, which may be many times per second.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = Utc::now();
        self.state.ctx.update::<Time>(|time| *time = Time::new(now));

        // Sync Compute for render
        self.state.ctx.sync_computes();
        self.mount();
        workflow::sync_panel(&mut self.state.ctx, now);
        self.state.ctx.run_computed();

        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            egui::MenuBar::new().ui(ui, |ui| {
                widgets::session_status(&self.state.ctx, ui);
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("User Management");
            ui.separator();
            widgets::users_panel(&mut self.state.ctx, ui);
        });

        // Start queued commands and recompute what the widgets changed
        self.state.ctx.flush_commands();
        self.state.ctx.run_computed();

        self.schedule_repaint(ctx);
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        log::debug!("Tearing down users panel");
        self.state.ctx.update::<UsersPanelState>(UsersPanelState::teardown);
    }
}
