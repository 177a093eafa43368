// src/services/feed.rs

//! Windowed view over a filtered result list.
//!
//! The feed only tracks a page counter. The visible slice is recomputed from
//! whatever list is passed in, so it never holds stale rows after a filter
//! change.

use std::num::NonZeroUsize;

/// Default number of rows revealed per page.
pub const PAGE_SIZE: NonZeroUsize = NonZeroUsize::new(100).unwrap();

/// Page counter for incremental result delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowedResultFeed {
    page_size: NonZeroUsize,
    page: usize,
}

impl WindowedResultFeed {
    pub fn new(page_size: NonZeroUsize) -> Self {
        Self { page_size, page: 1 }
    }

    pub fn page_size(&self) -> usize {
        self.page_size.get()
    }

    pub fn page(&self) -> usize {
        self.page
    }

    /// Number of pages needed to show `total` rows.
    pub fn last_page(&self, total: usize) -> usize {
        total.div_ceil(self.page_size.get())
    }

    /// Clamp a page number into `[1, last_page]`. An empty list still has page 1.
    pub fn clamp(&self, page: usize, total: usize) -> usize {
        page.clamp(1, self.last_page(total).max(1))
    }

    /// Rows visible at the current page.
    pub fn visible<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        self.visible_at(self.page, items)
    }

    /// Rows visible at an arbitrary page, clamped to the valid range.
    pub fn visible_at<'a, T>(&self, page: usize, items: &'a [T]) -> &'a [T] {
        let page = self.clamp(page, items.len());
        let end = page.saturating_mul(self.page_size.get()).min(items.len());
        &items[..end]
    }

    /// Handle a "load more" signal. Returns true if the page moved.
    pub fn advance(&mut self, total: usize) -> bool {
        let next = self.clamp(self.page + 1, total);
        let moved = next > self.page;
        if moved {
            self.page = next;
        }
        moved
    }

    /// Back to the first page. The caller also scrolls its view to the top.
    pub fn reset(&mut self) {
        self.page = 1;
    }
}

impl Default for WindowedResultFeed {
    fn default() -> Self {
        Self::new(PAGE_SIZE)
    }
}
