//! Read-only, role-scoped task listings with pagination.

use super::TaskServiceResult;
use crate::task::{
    domain::{Actor, Task},
    ports::{TaskQuery, TaskRepository},
};
use std::sync::Arc;

/// Page size used when a request does not override it, matching the
/// task-table views this engine serves.
pub const DEFAULT_PAGE_SIZE: usize = 5;

/// One-based page selection over a filtered result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: usize,
    size: usize,
}

impl PageRequest {
    /// Creates a request for the given one-based page at the default size.
    /// Page zero is treated as page one.
    #[must_use]
    pub const fn new(page: usize) -> Self {
        Self {
            page: if page == 0 { 1 } else { page },
            size: DEFAULT_PAGE_SIZE,
        }
    }

    /// Overrides the page size; zero is ignored.
    #[must_use]
    pub const fn with_size(mut self, size: usize) -> Self {
        if size > 0 {
            self.size = size;
        }
        self
    }

    /// Returns the one-based page number.
    #[must_use]
    pub const fn page(&self) -> usize {
        self.page
    }

    /// Returns the page size.
    #[must_use]
    pub const fn size(&self) -> usize {
        self.size
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(1)
    }
}

/// One page of a filtered task listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskPage {
    /// Tasks on this page, in stable storage order.
    pub tasks: Vec<Task>,
    /// One-based page number that was sliced.
    pub page: usize,
    /// Total matching tasks across all pages.
    pub total_tasks: usize,
    /// Total page count at the requested size.
    pub total_pages: usize,
}

/// Read-only task query service. Never mutates state.
#[derive(Clone)]
pub struct TaskQueryService<R>
where
    R: TaskRepository,
{
    repository: Arc<R>,
}

impl<R> TaskQueryService<R>
where
    R: TaskRepository,
{
    /// Creates a new query service.
    #[must_use]
    pub const fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Lists tasks visible to the caller, filtered and paginated.
    ///
    /// Staff see only their own tasks regardless of the assignee filter;
    /// admins and managers see everything. Empty filter values mean "no
    /// constraint".
    ///
    /// # Errors
    ///
    /// Returns [`super::TaskServiceError`] when the repository read fails.
    pub async fn list(
        &self,
        actor: &Actor,
        filter: TaskQuery,
        page: PageRequest,
    ) -> TaskServiceResult<TaskPage> {
        let scoped = scope_to_role(actor, normalize(filter));
        let matching = self.repository.list(&scoped).await?;
        Ok(paginate(matching, page))
    }
}

/// Treats blank search text as "no constraint".
fn normalize(mut filter: TaskQuery) -> TaskQuery {
    filter.title_contains = filter
        .title_contains
        .filter(|search| !search.trim().is_empty());
    filter
}

/// Forces the staff role down to its own tasks.
fn scope_to_role(actor: &Actor, mut filter: TaskQuery) -> TaskQuery {
    if !actor.role().can_assign() {
        filter.assigned_to = Some(actor.id());
    }
    filter
}

/// Pure slice of an already-ordered result set.
fn paginate(matching: Vec<Task>, page: PageRequest) -> TaskPage {
    let total_tasks = matching.len();
    let total_pages = total_tasks.div_ceil(page.size());
    let offset = page.page().saturating_sub(1).saturating_mul(page.size());
    let tasks = matching
        .into_iter()
        .skip(offset)
        .take(page.size())
        .collect();
    TaskPage {
        tasks,
        page: page.page(),
        total_tasks,
        total_pages,
    }
}
