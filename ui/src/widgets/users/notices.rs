//! Banners above the table and toasts in the corner.

use egui::{Align2, Area, Color32, Frame, Margin, Order, RichText, Ui};
use roster_business::users::{Notice, NoticeKind, Notices};

use crate::utils::colors::{COLOR_GREEN, COLOR_RED};

const TOAST_WIDTH: f32 = 320.0;

fn color_of(kind: NoticeKind) -> Color32 {
    match kind {
        NoticeKind::Success => COLOR_GREEN,
        NoticeKind::Error => COLOR_RED,
    }
}

/// Which banner the user closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BannerDismissed {
    Success,
    Error,
}

impl BannerDismissed {
    pub fn apply(self, notices: &mut Notices) {
        match self {
            Self::Success => notices.dismiss_success(),
            Self::Error => notices.dismiss_error(),
        }
    }
}

fn banner(ui: &mut Ui, notice: &Notice) -> bool {
    let color = color_of(notice.kind);
    Frame::NONE
        .stroke(egui::Stroke::new(1.0, color))
        .inner_margin(Margin::symmetric(8, 6))
        .show(ui, |ui| {
            ui.horizontal(|ui| {
                ui.colored_label(color, notice.message.as_str());
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.small_button("✖").on_hover_text("Dismiss").clicked()
                })
                .inner
            })
            .inner
        })
        .inner
}

/// Success and error banners, success first.
pub fn render_banners(ui: &mut Ui, notices: &Notices) -> Option<BannerDismissed> {
    let mut dismissed = None;
    if let Some(notice) = notices.success_banner()
        && banner(ui, notice)
    {
        dismissed = Some(BannerDismissed::Success);
    }
    if let Some(notice) = notices.error_banner()
        && banner(ui, notice)
    {
        dismissed = Some(BannerDismissed::Error);
    }
    dismissed
}

/// Stack of toasts in the bottom right corner, newest at the bottom.
pub fn render_toasts(ctx: &egui::Context, notices: &Notices) {
    if notices.toasts().is_empty() {
        return;
    }
    Area::new(egui::Id::new("users_toasts"))
        .order(Order::Foreground)
        .anchor(Align2::RIGHT_BOTTOM, [-12.0, -12.0])
        .show(ctx, |ui| {
            ui.set_max_width(TOAST_WIDTH);
            for toast in notices.toasts() {
                Frame::popup(ui.style())
                    .stroke(egui::Stroke::new(1.0, color_of(toast.kind)))
                    .show(ui, |ui| {
                        ui.label(RichText::new(toast.message.as_str()).color(color_of(toast.kind)));
                    });
                ui.add_space(4.0);
            }
        });
}
