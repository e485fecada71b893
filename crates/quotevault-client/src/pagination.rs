//! Offset pagination bookkeeping shared by every list screen.
//!
//! The coordinator is plain state with no I/O. A caller asks for permission
//! to fetch with [`PaginationCoordinator::begin`], performs the read, and
//! reports back with [`PaginationCoordinator::complete`] or
//! [`PaginationCoordinator::fail`] passing the same [`PageRequest`].
//!
//! Every reset starts a new generation. A request from an older generation
//! may still finish, but its result is reported as [`PageOutcome::Stale`] and
//! leaves the state untouched, so a slow page cannot overwrite a newer list.

use quotevault_shared::constants::{PAGE_SIZE, PREFETCH_THRESHOLD};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub generation: u64,
    pub offset: usize,
    pub limit: usize,
    /// The result replaces the list instead of extending it.
    pub reset: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageOutcome {
    Accepted,
    Stale,
}

#[derive(Debug, Clone)]
pub struct PaginationCoordinator {
    current_page: usize,
    is_loading: bool,
    has_more: bool,
    page_size: usize,
    generation: u64,
}

impl Default for PaginationCoordinator {
    fn default() -> Self {
        Self::new(PAGE_SIZE)
    }
}

impl PaginationCoordinator {
    pub fn new(page_size: usize) -> Self {
        Self {
            current_page: 0,
            is_loading: false,
            has_more: true,
            page_size: page_size.max(1),
            generation: 0,
        }
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Claims the next fetch.
    ///
    /// A reset is always granted. Otherwise `None` while a request is in
    /// flight or after the end of the data was seen.
    pub fn begin(&mut self, reset: bool) -> Option<PageRequest> {
        if reset {
            self.current_page = 0;
            self.has_more = true;
            self.generation += 1;
        } else if self.is_loading || !self.has_more {
            return None;
        }

        self.is_loading = true;
        Some(PageRequest {
            generation: self.generation,
            offset: self.current_page * self.page_size,
            limit: self.page_size,
            reset,
        })
    }

    /// Records a successful read of `returned` rows.
    ///
    /// A full page means more may follow; this is a heuristic, so an exact
    /// multiple of the page size costs one extra empty read.
    pub fn complete(&mut self, request: &PageRequest, returned: usize) -> PageOutcome {
        if request.generation != self.generation {
            return PageOutcome::Stale;
        }
        self.is_loading = false;
        self.has_more = returned == self.page_size;
        self.current_page += 1;
        PageOutcome::Accepted
    }

    /// Releases the in-flight flag after a failed read. No retry is scheduled.
    pub fn fail(&mut self, request: &PageRequest) -> PageOutcome {
        if request.generation != self.generation {
            return PageOutcome::Stale;
        }
        self.is_loading = false;
        PageOutcome::Accepted
    }
}

/// Whether displaying row `row_index` of `total_rows` should trigger the
/// next page.
pub fn should_prefetch(row_index: usize, total_rows: usize) -> bool {
    total_rows > 0 && row_index + PREFETCH_THRESHOLD >= total_rows
}
