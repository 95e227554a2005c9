//! Shared color constants for the UI.

use egui::Color32;

/// Active users, signed-in session, success notices.
pub const COLOR_GREEN: Color32 = Color32::from_rgb(34, 139, 34);

/// Inactive users, missing session, error notices and field errors.
pub const COLOR_RED: Color32 = Color32::from_rgb(220, 53, 69);

/// Pending search.
pub const COLOR_AMBER: Color32 = Color32::from_rgb(255, 193, 7);

/// Background of role badges.
pub const COLOR_BADGE: Color32 = Color32::from_rgb(225, 235, 250);

/// Text of role badges.
pub const COLOR_BADGE_TEXT: Color32 = Color32::from_rgb(30, 64, 140);
