//! Read-only views over the user collection: search, role filter,
//! pagination and the dashboard role summary.

use serde::Serialize;

use crate::domain::{Role, User};

/// Default number of records per page.
pub const DEFAULT_PER_PAGE: usize = 5;

/// Search and role criteria for listing users.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserFilter {
    /// Case-insensitive substring matched against name and email. The term is
    /// used verbatim, so surrounding spaces must match too.
    pub search: Option<String>,
    /// Only include records with this role.
    pub role: Option<Role>,
}

impl UserFilter {
    /// Whether `user` satisfies both criteria.
    #[must_use]
    pub fn matches(&self, user: &User) -> bool {
        let matches_search = self
            .search
            .as_deref()
            .filter(|term| !term.is_empty())
            .is_none_or(|term| {
                let needle = term.to_lowercase();
                user.name().as_ref().to_lowercase().contains(&needle)
                    || user.email().as_ref().to_lowercase().contains(&needle)
            });
        let matches_role = self.role.is_none_or(|role| user.role() == role);
        matches_search && matches_role
    }
}

/// One-based page selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: usize,
    per_page: usize,
}

impl PageRequest {
    /// Build a request; `per_page` of zero is raised to one.
    #[must_use]
    pub fn new(page: usize, per_page: usize) -> Self {
        Self {
            page,
            per_page: per_page.max(1),
        }
    }

    /// Requested page number.
    #[must_use]
    pub const fn page(&self) -> usize {
        self.page
    }

    /// Records per page.
    #[must_use]
    pub const fn per_page(&self) -> usize {
        self.per_page
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(1, DEFAULT_PER_PAGE)
    }
}

/// A page of results plus the numbers needed to navigate the rest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    /// Records on this page.
    pub items: Vec<T>,
    /// Page number actually served, after clamping.
    pub page: usize,
    /// Records per page.
    pub per_page: usize,
    /// Records across all pages.
    pub total_items: usize,
    /// Number of pages; zero when there are no records.
    pub total_pages: usize,
}

/// Slice `items` into the requested page.
///
/// The page number is clamped into `1..=max(total_pages, 1)`, so asking for
/// page zero or a page past the end serves the nearest valid page.
///
/// # Examples
/// ```
/// use admin_console::domain::{PageRequest, paginate};
///
/// let page = paginate((1..=12).collect::<Vec<_>>(), PageRequest::new(9, 5));
/// assert_eq!(page.page, 3);
/// assert_eq!(page.items, vec![11, 12]);
/// assert_eq!(page.total_pages, 3);
/// ```
#[must_use]
pub fn paginate<T>(items: Vec<T>, request: PageRequest) -> Page<T> {
    let per_page = request.per_page();
    let total_items = items.len();
    let total_pages = total_items.div_ceil(per_page);
    let page = request.page().clamp(1, total_pages.max(1));
    let start = (page - 1) * per_page;
    Page {
        items: items.into_iter().skip(start).take(per_page).collect(),
        page,
        per_page,
        total_items,
        total_pages,
    }
}

/// Filter `users` and return the requested page of clones.
#[must_use]
pub fn query_users(users: &[User], filter: &UserFilter, request: PageRequest) -> Page<User> {
    let matching = users
        .iter()
        .filter(|user| filter.matches(user))
        .cloned()
        .collect();
    paginate(matching, request)
}

/// Account counts shown on the dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RoleSummary {
    /// All accounts.
    pub total: usize,
    /// Accounts with [`Role::Admin`].
    pub admins: usize,
    /// Accounts with [`Role::Editor`].
    pub editors: usize,
    /// Accounts with [`Role::Viewer`].
    pub viewers: usize,
}

impl RoleSummary {
    /// Count accounts per role.
    #[must_use]
    pub fn from_users(users: &[User]) -> Self {
        users.iter().fold(Self::default(), |mut summary, user| {
            summary.total += 1;
            match user.role() {
                Role::Admin => summary.admins += 1,
                Role::Editor => summary.editors += 1,
                Role::Viewer => summary.viewers += 1,
            }
            summary
        })
    }

    /// Count for a single role.
    #[must_use]
    pub const fn count(&self, role: Role) -> usize {
        match role {
            Role::Admin => self.admins,
            Role::Editor => self.editors,
            Role::Viewer => self.viewers,
        }
    }
}
