//! Page arithmetic for the catalog.

/// Products shown per catalog page unless `catalog.toml` says otherwise.
pub const DEFAULT_PAGE_SIZE: usize = 4;

/// `ceil(total_count / page_size)`. Zero products means zero pages.
pub fn total_pages(total_count: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    total_count.div_ceil(page_size)
}

/// Half-open index range `[start, end)` of the flattened product list that
/// `page` (1-based) covers. Not clamped to the list length.
pub fn page_bounds(page: u32, page_size: usize) -> (usize, usize) {
    let start = (page.saturating_sub(1) as usize).saturating_mul(page_size);
    (start, start.saturating_add(page_size))
}

/// Current page plus what is needed to draw the pager.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub current_page: u32,
    pub page_size: usize,
    pub total_count: usize,
}

impl Pagination {
    pub fn new(page_size: usize) -> Self {
        Self {
            current_page: 1,
            page_size,
            total_count: 0,
        }
    }

    pub fn total_pages(&self) -> usize {
        total_pages(self.total_count, self.page_size)
    }

    /// Move to `requested`. Returns `None` when it is already the current page.
    ///
    /// No bounds check: callers disable the pager controls at the ends, so an
    /// out-of-range request here is a caller bug and is adopted as-is.
    pub fn change_page(&mut self, requested: u32) -> Option<u32> {
        if requested == self.current_page {
            return None;
        }
        self.current_page = requested;
        Some(requested)
    }

    pub fn has_previous(&self) -> bool {
        self.current_page > 1
    }

    pub fn has_next(&self) -> bool {
        (self.current_page as usize) < self.total_pages()
    }

    /// Back to page 1 with an unknown total, as after a category change.
    pub fn reset(&mut self) {
        self.current_page = 1;
        self.total_count = 0;
    }
}
