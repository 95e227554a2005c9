//! Table header with click-to-sort columns.

use egui::{Button, RichText, Ui};
use egui_extras::TableRow;
use roster_business::users::{SortKey, SortState};

/// Header labels, with the key a click sorts by.
const HEADERS: [(&str, Option<SortKey>); 7] = [
    ("ID", Some(SortKey::Id)),
    ("Username", Some(SortKey::Username)),
    ("Name", Some(SortKey::Name)),
    ("Email", Some(SortKey::Email)),
    ("Roles", None),
    ("Status", Some(SortKey::Status)),
    ("Actions", None),
];

/// Renders the header row. Returns the key whose header was clicked.
#[inline]
pub fn render_table_header(
    header: &mut TableRow<'_, '_>,
    sort: Option<SortState>,
) -> Option<SortKey> {
    let mut clicked = None;
    for (label, key) in HEADERS {
        header.col(|ui| match key {
            Some(key) => {
                if render_sortable_cell(ui, &header_text(label, key, sort)) {
                    clicked = Some(key);
                }
            }
            None => render_header_cell(ui, label),
        });
    }
    clicked
}

/// `label`, followed by the direction arrow when the table is sorted by `key`.
pub fn header_text(label: &str, key: SortKey, sort: Option<SortState>) -> String {
    match sort {
        Some(sort) if sort.key == key => format!("{label} {}", sort.direction.arrow()),
        _ => label.to_owned(),
    }
}

#[inline]
fn render_header_cell(ui: &mut Ui, label: &str) {
    ui.strong(label);
}

#[inline]
fn render_sortable_cell(ui: &mut Ui, text: &str) -> bool {
    ui.add(Button::new(RichText::new(text).strong()).frame(false))
        .on_hover_text("Sort")
        .clicked()
}

#[cfg(test)]
mod tests {
    use roster_business::users::SortDirection;

    use super::*;

    #[test]
    fn test_arrow_only_on_sorted_column() {
        let sort = Some(SortState {
            key: SortKey::Email,
            direction: SortDirection::Descending,
        });
        assert_eq!(header_text("Email", SortKey::Email, sort), "Email ▼");
        assert_eq!(header_text("Name", SortKey::Name, sort), "Name");
        assert_eq!(header_text("Name", SortKey::Name, None), "Name");
    }
}
