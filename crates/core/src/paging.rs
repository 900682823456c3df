//! Page requests and paged results.

use serde::{Serialize, Serializer};

/// Default page size when a caller does not supply one.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Largest page size the validation layer accepts.
pub const MAX_PAGE_SIZE: u32 = 100;

/// A 1-based page window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub number: u32,
    pub size: u32,
}

impl PageRequest {
    pub fn new(number: u32, size: u32) -> Self {
        Self { number, size }
    }

    /// Rows to skip before this page. Page numbers below 1 are treated as 1.
    pub fn offset(&self) -> u64 {
        u64::from(self.number.max(1) - 1) * u64::from(self.size)
    }

    pub fn limit(&self) -> u64 {
        u64::from(self.size)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(1, DEFAULT_PAGE_SIZE)
    }
}

/// One page of items plus the totals needed to render a pager.
#[derive(Debug, Clone, PartialEq)]
pub struct PagedResult<T> {
    pub items: Vec<T>,
    pub page_number: u32,
    pub page_size: u32,
    pub total_count: u64,
}

impl<T> PagedResult<T> {
    pub fn new(items: Vec<T>, page: PageRequest, total_count: u64) -> Self {
        Self {
            items,
            page_number: page.number,
            page_size: page.size,
            total_count,
        }
    }

    /// `ceil(total_count / page_size)`; zero when the page size is zero.
    pub fn total_pages(&self) -> u64 {
        if self.page_size == 0 {
            return 0;
        }
        self.total_count.div_ceil(u64::from(self.page_size))
    }

    pub fn has_previous_page(&self) -> bool {
        self.page_number > 1
    }

    pub fn has_next_page(&self) -> bool {
        u64::from(self.page_number) < self.total_pages()
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> PagedResult<U> {
        PagedResult {
            items: self.items.into_iter().map(f).collect(),
            page_number: self.page_number,
            page_size: self.page_size,
            total_count: self.total_count,
        }
    }
}

#[derive(Serialize)]
struct PagedWire<'a, T> {
    items: &'a [T],
    page_number: u32,
    page_size: u32,
    total_count: u64,
    total_pages: u64,
    has_previous_page: bool,
    has_next_page: bool,
}

impl<T: Serialize> Serialize for PagedResult<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        PagedWire {
            items: &self.items,
            page_number: self.page_number,
            page_size: self.page_size,
            total_count: self.total_count,
            total_pages: self.total_pages(),
            has_previous_page: self.has_previous_page(),
            has_next_page: self.has_next_page(),
        }
        .serialize(serializer)
    }
}
