//! The listing pipeline: search, status filter, role filter, sort, paginate.
//!
//! Everything here is pure. The displayed page is a function of the full user
//! list, [`FilterState`], optional [`SortState`] and the requested page.

use std::cmp::Ordering;

use ustr::Ustr;

use crate::users::model::User;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    All,
    Active,
    Inactive,
}

impl StatusFilter {
    pub const ALL: [Self; 3] = [Self::All, Self::Active, Self::Inactive];

    pub fn label(self) -> &'static str {
        match self {
            Self::All => "All statuses",
            Self::Active => "Active",
            Self::Inactive => "Inactive",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RoleFilter {
    #[default]
    All,
    Role(Ustr),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    pub search: String,
    pub status: StatusFilter,
    pub role: RoleFilter,
}

impl FilterState {
    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Username,
    Email,
    /// `first + " " + last`
    Name,
    Status,
    /// Raw comparison of the identifier.
    Id,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }

    pub fn arrow(self) -> &'static str {
        match self {
            Self::Ascending => "▲",
            Self::Descending => "▼",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortState {
    pub key: SortKey,
    pub direction: SortDirection,
}

impl SortState {
    pub fn ascending(key: SortKey) -> Self {
        Self {
            key,
            direction: SortDirection::Ascending,
        }
    }

    /// Clicking a header: same key flips, another key starts ascending.
    pub fn toggled(current: Option<Self>, key: SortKey) -> Self {
        match current {
            Some(sort) if sort.key == key => Self {
                key,
                direction: sort.direction.flipped(),
            },
            _ => Self::ascending(key),
        }
    }
}

/// One page of the pipeline output.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingPage {
    pub users: Vec<User>,
    /// 1-based page actually shown.
    pub page: usize,
    pub total_pages: usize,
    /// Users left after filtering, before slicing.
    pub filtered_count: usize,
}

impl ListingPage {
    /// 1-based index of the first and last visible row, if any.
    pub fn visible_range(&self, page_size: usize) -> Option<(usize, usize)> {
        if self.users.is_empty() {
            return None;
        }
        let first = (self.page - 1) * page_size + 1;
        Some((first, first + self.users.len() - 1))
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }
}

pub fn total_pages(count: usize, page_size: usize) -> usize {
    count.div_ceil(page_size.max(1))
}

pub fn matches_search(user: &User, search: &str) -> bool {
    if search.is_empty() {
        return true;
    }
    let needle = search.to_lowercase();
    [
        &user.username,
        &user.email,
        &user.first_name,
        &user.last_name,
    ]
    .into_iter()
    .any(|field| field.to_lowercase().contains(&needle))
}

pub fn matches_status(user: &User, status: StatusFilter) -> bool {
    match status {
        StatusFilter::All => true,
        StatusFilter::Active => user.is_active,
        StatusFilter::Inactive => !user.is_active,
    }
}

pub fn matches_role(user: &User, role: RoleFilter) -> bool {
    match role {
        RoleFilter::All => true,
        RoleFilter::Role(id) => user.has_role(id),
    }
}

fn compare_ignoring_case(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase())
}

pub fn compare_users(a: &User, b: &User, sort: SortState) -> Ordering {
    let ordering = match sort.key {
        SortKey::Username => compare_ignoring_case(&a.username, &b.username),
        SortKey::Email => compare_ignoring_case(&a.email, &b.email),
        SortKey::Name => compare_ignoring_case(&a.full_name(), &b.full_name()),
        SortKey::Status => a.is_active.cmp(&b.is_active),
        SortKey::Id => a.id.as_str().cmp(b.id.as_str()),
    };
    match sort.direction {
        SortDirection::Ascending => ordering,
        SortDirection::Descending => ordering.reverse(),
    }
}

/// Filter, sort and slice `users`.
///
/// A `page` past the last page (or 0) shows page 1.
pub fn run_listing(
    users: &[User],
    filters: &FilterState,
    sort: Option<SortState>,
    page: usize,
    page_size: usize,
) -> ListingPage {
    let page_size = page_size.max(1);

    let mut filtered: Vec<&User> = users
        .iter()
        .filter(|user| matches_search(user, &filters.search))
        .filter(|user| matches_status(user, filters.status))
        .filter(|user| matches_role(user, filters.role))
        .collect();

    if let Some(sort) = sort {
        // stable
        filtered.sort_by(|a, b| compare_users(a, b, sort));
    }

    let filtered_count = filtered.len();
    let total_pages = total_pages(filtered_count, page_size);
    let page = if page == 0 || page > total_pages {
        1
    } else {
        page
    };

    let users = filtered
        .into_iter()
        .skip((page - 1) * page_size)
        .take(page_size)
        .cloned()
        .collect();

    ListingPage {
        users,
        page,
        total_pages,
        filtered_count,
    }
}
