//! Pagination utilities for the admin table

use serde::Serialize;
use std::fmt;

/// Most page buttons shown at once
pub const MAX_PAGE_BUTTONS: usize = 10;

/// Selectable rows-per-page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PageSize {
    Ten,
    #[default]
    TwentyFive,
    Fifty,
    Hundred,
}

impl PageSize {
    pub const ALL: [PageSize; 4] = [
        PageSize::Ten,
        PageSize::TwentyFive,
        PageSize::Fifty,
        PageSize::Hundred,
    ];

    pub fn rows(&self) -> usize {
        match self {
            PageSize::Ten => 10,
            PageSize::TwentyFive => 25,
            PageSize::Fifty => 50,
            PageSize::Hundred => 100,
        }
    }

    /// None for any size outside 10/25/50/100
    pub fn from_rows(rows: usize) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.rows() == rows)
    }
}

impl fmt::Display for PageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.rows())
    }
}

impl Serialize for PageSize {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(self.rows() as u64)
    }
}

/// Pagination metadata calculated from total results
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    /// Current page number (1-indexed)
    pub page: usize,
    /// Total number of pages; 0 for an empty set
    pub total_pages: usize,
    /// Index of the first row on this page
    pub offset: usize,
}

/// Calculate pagination metadata from total results and requested page
///
/// The page is clamped to `[1, max(1, total_pages)]`.
///
/// # Examples
/// ```
/// use cpoll_server::dashboard::pagination::{calculate_pagination, PageSize};
///
/// // 120 responses at 25 per page = 5 pages
/// let p = calculate_pagination(120, PageSize::TwentyFive, 5);
/// assert_eq!(p.total_pages, 5);
/// assert_eq!(p.offset, 100);
///
/// // Requesting out-of-bounds page gets clamped
/// let p = calculate_pagination(120, PageSize::TwentyFive, 6);
/// assert_eq!(p.page, 5);
/// ```
pub fn calculate_pagination(total_results: usize, size: PageSize, requested_page: usize) -> Pagination {
    let rows = size.rows();
    let total_pages = total_results.div_ceil(rows);
    let page = requested_page.max(1).min(total_pages.max(1));
    let offset = (page - 1) * rows;

    Pagination {
        page,
        total_pages,
        offset,
    }
}

/// Page numbers for the button row
///
/// All pages when there are ten or fewer; otherwise a ten-page window that
/// starts at page 1 near the front, ends at the last page near the back, and
/// runs `current-5 ..= current+4` in between.
pub fn page_window(current: usize, total_pages: usize) -> Vec<usize> {
    let count = total_pages.min(MAX_PAGE_BUTTONS);
    let first = if total_pages <= MAX_PAGE_BUTTONS || current <= 5 {
        1
    } else if current + 4 >= total_pages {
        total_pages + 1 - MAX_PAGE_BUTTONS
    } else {
        current - 5
    };
    (first..first + count).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_normal() {
        let p = calculate_pagination(120, PageSize::TwentyFive, 2);
        assert_eq!(p.page, 2);
        assert_eq!(p.total_pages, 5);
        assert_eq!(p.offset, 25);
    }

    #[test]
    fn test_pagination_last_page() {
        let p = calculate_pagination(120, PageSize::TwentyFive, 5);
        assert_eq!(p.page, 5);
        assert_eq!(p.offset, 100);
    }

    #[test]
    fn test_pagination_out_of_bounds_high() {
        let p = calculate_pagination(120, PageSize::TwentyFive, 6);
        assert_eq!(p.page, 5); // Clamped to last page
        assert_eq!(p.offset, 100);
    }

    #[test]
    fn test_pagination_out_of_bounds_low() {
        let p = calculate_pagination(120, PageSize::Ten, 0);
        assert_eq!(p.page, 1);
        assert_eq!(p.total_pages, 12);
        assert_eq!(p.offset, 0);
    }

    #[test]
    fn test_pagination_empty() {
        let p = calculate_pagination(0, PageSize::Hundred, 3);
        assert_eq!(p.page, 1);
        assert_eq!(p.total_pages, 0);
        assert_eq!(p.offset, 0);
    }

    #[test]
    fn test_pagination_exact_page_boundary() {
        let p = calculate_pagination(100, PageSize::Fifty, 2);
        assert_eq!(p.total_pages, 2);
        assert_eq!(p.offset, 50);
    }

    #[test]
    fn test_page_size_choices() {
        assert_eq!(PageSize::default().rows(), 25);
        assert_eq!(PageSize::from_rows(50), Some(PageSize::Fifty));
        assert_eq!(PageSize::from_rows(20), None);
        assert_eq!(PageSize::from_rows(0), None);
    }

    #[test]
    fn test_window_small_total_shows_all() {
        assert_eq!(page_window(1, 0), Vec::<usize>::new());
        assert_eq!(page_window(3, 4), vec![1, 2, 3, 4]);
        assert_eq!(page_window(10, 10), (1..=10).collect::<Vec<_>>());
    }

    #[test]
    fn test_window_near_front() {
        assert_eq!(page_window(5, 30), (1..=10).collect::<Vec<_>>());
    }

    #[test]
    fn test_window_near_back() {
        assert_eq!(page_window(26, 30), (21..=30).collect::<Vec<_>>());
        assert_eq!(page_window(30, 30), (21..=30).collect::<Vec<_>>());
    }

    #[test]
    fn test_window_middle() {
        assert_eq!(page_window(12, 30), (7..=16).collect::<Vec<_>>());
        assert_eq!(page_window(6, 12), (1..=10).collect::<Vec<_>>());
    }
}
