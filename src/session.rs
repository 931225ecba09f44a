//! One visitor's catalog session.
//!
//! The session owns everything that lives for as long as the catalog page is
//! open: the [`ProductLoader`] with its manifest and page caches, the
//! category taken from the current location, the pager state, and the page
//! currently on display. All mutation goes through `&mut self`, so there is
//! a single writer by construction.
//!
//! ## Page requests
//!
//! Changing page is split into issue / load / apply:
//!
//! ```text
//! let request = session.change_page(2)?;       // token 7
//! let page = session.load(&request)?;          // slow fetches
//! session.apply(&request, page);               // accepted only if 7 is still the latest
//! ```
//!
//! Each issued [`PageRequest`] carries a monotonically increasing token.
//! [`Session::apply`] drops any result whose token is not the newest, so a
//! slow response for page 2 cannot overwrite page 3 when the visitor clicks
//! twice in quick succession. [`Session::open_page`] runs all three steps.
//!
//! ## Category changes
//!
//! [`Session::navigate`] re-reads the category from the new location. When
//! it differs from the current one, every cached page is dropped and the
//! pager goes back to page 1. Requests issued before the change go stale.
//! The manifest stays memoized.

use crate::category::{parse_location, resolve_category};
use crate::loader::{CatalogError, LoadedPage, ProductLoader};
use crate::pagination::Pagination;
use crate::source::Source;
use url::Url;

/// A page load that has been asked for but not yet applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub token: u64,
}

#[derive(Debug)]
pub struct Session<S> {
    loader: ProductLoader<S>,
    category_param: String,
    category: Option<String>,
    pagination: Pagination,
    latest_token: u64,
    current: Option<LoadedPage>,
}

impl<S: Source> Session<S> {
    pub fn new(loader: ProductLoader<S>, category_param: impl Into<String>, location: &Url) -> Self {
        let category_param = category_param.into();
        let category = resolve_category(location, &category_param);
        let pagination = Pagination::new(loader.options().page_size);
        Self {
            loader,
            category_param,
            category,
            pagination,
            latest_token: 0,
            current: None,
        }
    }

    /// Start a session from a location string such as `/productos?categoria=Bolsos`.
    pub fn from_location(
        loader: ProductLoader<S>,
        category_param: impl Into<String>,
        location: &str,
    ) -> Result<Self, url::ParseError> {
        let url = parse_location(location)?;
        Ok(Self::new(loader, category_param, &url))
    }

    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    pub fn pagination(&self) -> &Pagination {
        &self.pagination
    }

    pub fn current(&self) -> Option<&LoadedPage> {
        self.current.as_ref()
    }

    pub fn loader(&self) -> &ProductLoader<S> {
        &self.loader
    }

    pub fn loader_mut(&mut self) -> &mut ProductLoader<S> {
        &mut self.loader
    }

    /// Follow a location change. Returns `true` if the category changed, in
    /// which case the page cache is cleared and the pager reset to page 1.
    pub fn navigate(&mut self, location: &Url) -> bool {
        let category = resolve_category(location, &self.category_param);
        if category == self.category {
            return false;
        }
        log::info!(
            "category changed: {} -> {}",
            self.category.as_deref().unwrap_or("all"),
            category.as_deref().unwrap_or("all")
        );
        self.category = category;
        self.loader.clear_cache();
        self.pagination.reset();
        self.current = None;
        self.latest_token += 1;
        true
    }

    /// Issue a request for `page` regardless of the current page.
    pub fn request(&mut self, page: u32) -> PageRequest {
        self.latest_token += 1;
        PageRequest {
            page,
            token: self.latest_token,
        }
    }

    /// Move the pager to `requested` and issue a request for it. `None` when
    /// `requested` is already the current page.
    pub fn change_page(&mut self, requested: u32) -> Option<PageRequest> {
        let page = self.pagination.change_page(requested)?;
        Some(self.request(page))
    }

    /// Perform the load for a request. Cached pages return without I/O.
    pub fn load(&mut self, request: &PageRequest) -> Result<LoadedPage, CatalogError> {
        let category = self.category.clone();
        self.loader.load_page(category.as_deref(), request.page)
    }

    /// Install a loaded page if its request is still the latest one.
    ///
    /// Returns `false` and leaves the session untouched for stale results.
    pub fn apply(&mut self, request: &PageRequest, page: LoadedPage) -> bool {
        if !self.is_latest(request) {
            log::debug!(
                "discarding stale page {} (token {}, latest {})",
                request.page,
                request.token,
                self.latest_token
            );
            return false;
        }
        self.pagination.current_page = request.page;
        self.pagination.total_count = page.total_count;
        self.current = Some(page);
        true
    }

    pub fn is_latest(&self, request: &PageRequest) -> bool {
        request.token == self.latest_token
    }

    /// Request, load and apply `page` in one go. Nothing can be issued in
    /// between, so the result is always the latest. On error the pager and
    /// the displayed page are left as they were.
    pub fn open_page(&mut self, page: u32) -> Result<&LoadedPage, CatalogError> {
        let request = self.request(page);
        let loaded = self.load(&request)?;
        self.pagination.current_page = request.page;
        self.pagination.total_count = loaded.total_count;
        Ok(self.current.insert(loaded))
    }
}
