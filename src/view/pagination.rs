use std::ops::Range;

use crate::error::{Result, ViewError};

pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Page size and zero-based page index
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationState {
    page_size: usize,
    pub page_index: usize,
}

impl Default for PaginationState {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            page_index: 0,
        }
    }
}

impl PaginationState {
    pub fn new(page_size: usize) -> Result<Self> {
        validate_page_size(page_size)?;
        Ok(Self {
            page_size,
            page_index: 0,
        })
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn set_page_size(&mut self, page_size: usize) -> Result<()> {
        validate_page_size(page_size)?;
        self.page_size = page_size;
        Ok(())
    }
}

fn validate_page_size(page_size: usize) -> Result<()> {
    if page_size == 0 {
        return Err(ViewError::InvalidArgument(
            "page size must be a positive integer".to_string(),
        ));
    }
    Ok(())
}

/// Result of slicing a row sequence into one page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSlice {
    /// Positions of the page within the input sequence
    pub range: Range<usize>,
    pub page_count: usize,
    pub page_index: usize,
}

/// Number of pages for `len` rows; never less than one
pub fn page_count(len: usize, page_size: usize) -> usize {
    len.div_ceil(page_size.max(1)).max(1)
}

/// Slice `len` rows into the requested page, clamping a stale index to the last page
pub fn apply(len: usize, state: &PaginationState) -> PageSlice {
    let page_count = page_count(len, state.page_size);
    let page_index = state.page_index.min(page_count - 1);
    let start = (page_index * state.page_size).min(len);
    let end = (start + state.page_size).min(len);

    PageSlice {
        range: start..end,
        page_count,
        page_index,
    }
}

/// Up to `max` page indices around `current`, shifted to stay inside `[0, page_count)`
pub fn page_window(current: usize, page_count: usize, max: usize) -> Vec<usize> {
    let len = max.min(page_count);
    if len == 0 {
        return Vec::new();
    }
    let half = len / 2;
    let start = current.saturating_sub(half).min(page_count - len);
    (start..start + len).collect()
}
