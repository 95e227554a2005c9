//! Table of the users on the current page.
//!
//! - `columns`: column definitions and widths
//! - `header`: clickable sort headers
//! - `row`: one row per user
//! - `cells`: cell renderers, shared with the details dialog

pub(crate) mod cells;
pub mod columns;
pub mod header;
pub mod row;

use egui::{Align, Layout, Ui};
use egui_extras::TableBuilder;
use roster_business::users::{ListingPage, SortKey, SortState, User};

use columns::{HEADER_HEIGHT, ROW_HEIGHT, table_columns};
use header::render_table_header;
use row::{RowAction, render_user_row};

/// What the user clicked in the table this frame.
#[derive(Debug, Default)]
pub struct TableOutput {
    pub sort_clicked: Option<SortKey>,
    pub row_action: Option<(RowAction, User)>,
}

pub fn users_table(
    ui: &mut Ui,
    page: &ListingPage,
    sort: Option<SortState>,
    is_loading: bool,
) -> TableOutput {
    let mut output = TableOutput::default();

    let mut builder = TableBuilder::new(ui)
        .striped(true)
        .resizable(false)
        .cell_layout(Layout::left_to_right(Align::Center))
        .min_scrolled_height(0.0);
    for column in table_columns() {
        builder = builder.column(column);
    }

    builder
        .header(HEADER_HEIGHT, |mut header| {
            output.sort_clicked = render_table_header(&mut header, sort);
        })
        .body(|mut body| {
            for user in &page.users {
                body.row(ROW_HEIGHT, |mut row| {
                    if let Some(action) = render_user_row(&mut row, user) {
                        output.row_action = Some((action, user.clone()));
                    }
                });
            }
        });

    if page.users.is_empty() {
        ui.add_space(8.0);
        ui.vertical_centered(|ui| {
            if is_loading {
                ui.spinner();
                ui.label("Loading users...");
            } else {
                ui.weak("No users to show");
            }
        });
    }

    output
}
