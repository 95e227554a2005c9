use egui::{Color32, Response, Ui};
use roster_business::{AuthSession, BusinessConfig};
use roster_states::StateCtx;

use crate::utils::colors::{COLOR_GREEN, COLOR_RED};

/// Radius of the status indicator circle (in pixels)
const STATUS_DOT_RADIUS: f32 = 5.0;

fn status_dot(ui: &mut Ui, tooltip_text: String, dot_color: Color32) -> Response {
    let (rect, response) = ui.allocate_exact_size(
        egui::vec2(STATUS_DOT_RADIUS * 2.0, STATUS_DOT_RADIUS * 2.0),
        egui::Sense::hover(),
    );

    ui.painter()
        .circle(rect.center(), STATUS_DOT_RADIUS, dot_color, egui::Stroke::NONE);

    response.on_hover_text(tooltip_text)
}

/// Dot plus label telling whether a bearer token is available, with the API
/// base URL in the tooltip.
pub fn session_status(state_ctx: &StateCtx, ui: &mut Ui) -> Response {
    let api_url = state_ctx.state::<BusinessConfig>().api_url();
    let signed_in = state_ctx.state::<AuthSession>().is_authenticated();

    let (label, color) = if signed_in {
        ("Signed in", COLOR_GREEN)
    } else {
        ("No session", COLOR_RED)
    };

    ui.horizontal(|ui| {
        let response = status_dot(ui, format!("API: {api_url}"), color);
        ui.label(label);
        response
    })
    .inner
}
