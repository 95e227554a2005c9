//! Result summary and page navigation under the table.

use egui::{Button, Ui};
use roster_business::users::{UsersListingCompute, UsersPanelState};

pub const PREVIOUS: &str = "◀ Previous";
pub const NEXT: &str = "Next ▶";

/// Pages with more buttons than this collapse into a window around the
/// current page.
const MAX_PAGE_BUTTONS: usize = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageAction {
    Previous,
    Next,
    Go(usize),
}

impl PageAction {
    pub fn apply(self, panel: &mut UsersPanelState, total_pages: usize) {
        match self {
            Self::Previous => panel.previous_page(),
            Self::Next => panel.next_page(total_pages),
            Self::Go(page) => panel.go_to_page(page, total_pages),
        }
    }
}

/// Page buttons to show; `None` is a gap.
///
/// First and last page are always present, plus the current page and its
/// neighbours.
pub fn page_window(current: usize, total: usize) -> Vec<Option<usize>> {
    if total <= MAX_PAGE_BUTTONS {
        return (1..=total).map(Some).collect();
    }

    let from = current.saturating_sub(1).max(2);
    let to = (current + 1).min(total - 1);

    let mut pages = vec![Some(1)];
    if from > 2 {
        pages.push(None);
    }
    pages.extend((from..=to).map(Some));
    if to < total - 1 {
        pages.push(None);
    }
    pages.push(Some(total));
    pages
}

pub fn render_pagination(ui: &mut Ui, listing: &UsersListingCompute) -> Option<PageAction> {
    let page = listing.page();
    let mut action = None;

    ui.horizontal(|ui| {
        ui.label(listing.summary());
        if page.total_pages <= 1 {
            return;
        }

        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            if ui.add_enabled(page.has_next(), Button::new(NEXT)).clicked() {
                action = Some(PageAction::Next);
            }
            // right to left: numbers are added last-first
            for entry in page_window(page.page, page.total_pages).into_iter().rev() {
                match entry {
                    Some(number) => {
                        if ui
                            .selectable_label(number == page.page, number.to_string())
                            .clicked()
                        {
                            action = Some(PageAction::Go(number));
                        }
                    }
                    None => {
                        ui.weak("…");
                    }
                }
            }
            if ui
                .add_enabled(page.has_previous(), Button::new(PREVIOUS))
                .clicked()
            {
                action = Some(PageAction::Previous);
            }
        });
    });

    action
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_page_lists_show_every_page() {
        assert_eq!(page_window(2, 3), vec![Some(1), Some(2), Some(3)]);
        assert!(page_window(1, 0).is_empty());
    }

    #[test]
    fn test_long_page_lists_collapse_around_current() {
        assert_eq!(
            page_window(5, 10),
            vec![Some(1), None, Some(4), Some(5), Some(6), None, Some(10)]
        );
        assert_eq!(
            page_window(1, 10),
            vec![Some(1), Some(2), None, Some(10)]
        );
        assert_eq!(
            page_window(10, 10),
            vec![Some(1), None, Some(9), Some(10)]
        );
    }
}
