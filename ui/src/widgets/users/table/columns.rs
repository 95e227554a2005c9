//! Column definitions for the users table.

use egui_extras::Column;

pub const ID_WIDTH: f32 = 90.0;
pub const STATUS_WIDTH: f32 = 80.0;
pub const ACTIONS_WIDTH: f32 = 260.0;
pub const ROW_HEIGHT: f32 = 30.0;
pub const HEADER_HEIGHT: f32 = 24.0;

/// Columns in order: ID, Username, Name, Email, Roles, Status, Actions.
#[inline]
pub fn table_columns() -> Vec<Column> {
    vec![
        Column::exact(ID_WIDTH),
        Column::auto().at_least(100.0),
        Column::auto().at_least(120.0),
        Column::auto().at_least(160.0),
        Column::remainder().at_least(120.0),
        Column::exact(STATUS_WIDTH),
        Column::exact(ACTIONS_WIDTH),
    ]
}
