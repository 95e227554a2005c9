use std::any::Any;

use roster_states::{Compute, ComputeDeps, Dep, SnapshotClone, State, Updater, assign_impl};

use crate::users::directory::UsersDirectoryCompute;
use crate::users::listing::{ListingPage, run_listing};
use crate::users::panel_state::UsersPanelState;

/// The page of users the table shows.
///
/// Recomputed whenever the panel state (filters, sort, page) or the fetched
/// user list changes.
#[derive(Debug, Clone, Default)]
pub struct UsersListingCompute {
    page: ListingPage,
    page_size: usize,
}

impl UsersListingCompute {
    pub fn page(&self) -> &ListingPage {
        &self.page
    }

    /// "Showing x to y of z users"
    pub fn summary(&self) -> String {
        match self.page.visible_range(self.page_size) {
            Some((first, last)) => format!(
                "Showing {first} to {last} of {} users",
                self.page.filtered_count
            ),
            None => "No users found".to_owned(),
        }
    }
}

impl SnapshotClone for UsersListingCompute {}

impl State for UsersListingCompute {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn assign_box(&mut self, new_self: Box<dyn Any + Send>) {
        assign_impl(self, new_self);
    }
}

impl Compute for UsersListingCompute {
    fn deps(&self) -> ComputeDeps {
        ComputeDeps::none()
            .state::<UsersPanelState>()
            .compute::<UsersDirectoryCompute>()
    }

    fn compute(&self, deps: Dep<'_>, updater: Updater) {
        let panel = deps.state::<UsersPanelState>();
        let directory = deps.compute::<UsersDirectoryCompute>();

        let page = run_listing(
            directory.users(),
            panel.filters(),
            panel.sort(),
            panel.page(),
            panel.page_size(),
        );
        updater.set(Self {
            page,
            page_size: panel.page_size(),
        });
    }
}
