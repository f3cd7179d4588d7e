//! # Pagination
//!
//! Page bounds and navigation metadata for the admin listings.
//!
//! Query parameters are parsed leniently on purpose: a missing, malformed,
//! zero or negative `page` falls back to 1 and the same for `limit` falls
//! back to [`DEFAULT_LIMIT`]. Pagination never fails.

use serde::Serialize;

/// Rows per page when the caller gives no usable limit
pub const DEFAULT_LIMIT: u64 = 10;

/// First page
pub const DEFAULT_PAGE: u64 = 1;

/// A sanitized page request; `page >= 1` and `limit >= 1` always hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u64,
    limit: u64,
}

impl PageRequest {
    /// Clamp raw numbers; anything below 1 becomes the default.
    pub fn new(page: i64, limit: i64) -> Self {
        Self {
            page: u64::try_from(page)
                .ok()
                .filter(|p| *p >= 1)
                .unwrap_or(DEFAULT_PAGE),
            limit: u64::try_from(limit)
                .ok()
                .filter(|l| *l >= 1)
                .unwrap_or(DEFAULT_LIMIT),
        }
    }

    /// Parse raw query-string values.
    pub fn from_query(page: Option<&str>, limit: Option<&str>) -> Self {
        let parse = |raw: Option<&str>| {
            raw.and_then(|s| s.trim().parse::<i64>().ok())
                .unwrap_or(0)
        };
        Self::new(parse(page), parse(limit))
    }

    pub fn page(&self) -> u64 {
        self.page
    }

    pub fn limit(&self) -> u64 {
        self.limit
    }

    /// Rows to skip: (page − 1) × limit
    pub fn offset(&self) -> u64 {
        (self.page - 1).saturating_mul(self.limit)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

/// Navigation metadata for one page of a listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageWindow {
    pub current_page: u64,
    pub total_pages: u64,
    pub limit: u64,
    pub offset: u64,
    /// `current_page - 1`; 0 on the first page, the caller hides the control
    pub previous_page: u64,
    /// `current_page + 1`; may exceed `total_pages`
    pub next_page: u64,
    /// 1..=total_pages, empty when there is nothing to list
    pub button_range: Vec<u64>,
}

/// Compute the window for `request` over `total_count` rows.
pub fn paginate(total_count: u64, request: PageRequest) -> PageWindow {
    let total_pages = total_count.div_ceil(request.limit);
    PageWindow {
        current_page: request.page,
        total_pages,
        limit: request.limit,
        offset: request.offset(),
        previous_page: request.page - 1,
        next_page: request.page.saturating_add(1),
        button_range: (1..=total_pages).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_middle_page() {
        let window = paginate(95, PageRequest::new(3, 10));

        assert_eq!(window.total_pages, 10);
        assert_eq!(window.previous_page, 2);
        assert_eq!(window.next_page, 4);
        assert_eq!(window.offset, 20);
        assert_eq!(window.button_range, (1..=10).collect::<Vec<_>>());
        assert_eq!(window.button_range.len(), 10);
    }

    #[test]
    fn test_empty_listing() {
        let window = paginate(0, PageRequest::new(1, 10));

        assert_eq!(window.total_pages, 0);
        assert!(window.button_range.is_empty());
        assert_eq!(window.previous_page, 0);
        assert_eq!(window.next_page, 2);
    }

    #[test]
    fn test_exact_multiple() {
        assert_eq!(paginate(30, PageRequest::new(1, 10)).total_pages, 3);
        assert_eq!(paginate(31, PageRequest::new(1, 10)).total_pages, 4);
        assert_eq!(paginate(1, PageRequest::new(1, 50)).total_pages, 1);
    }

    #[test]
    fn test_non_positive_values_fall_back() {
        assert_eq!(PageRequest::new(0, 0), PageRequest::default());
        assert_eq!(PageRequest::new(-4, -1), PageRequest::default());

        let req = PageRequest::new(2, 0);
        assert_eq!(req.page(), 2);
        assert_eq!(req.limit(), DEFAULT_LIMIT);
    }

    #[test]
    fn test_query_parsing_is_lenient() {
        assert_eq!(PageRequest::from_query(None, None), PageRequest::default());
        assert_eq!(
            PageRequest::from_query(Some("abc"), Some("ten")),
            PageRequest::default()
        );
        assert_eq!(
            PageRequest::from_query(Some(""), Some("-5")),
            PageRequest::default()
        );

        let req = PageRequest::from_query(Some(" 4 "), Some("25"));
        assert_eq!(req.page(), 4);
        assert_eq!(req.limit(), 25);
        assert_eq!(req.offset(), 75);
    }

    #[test]
    fn test_page_past_the_end() {
        let window = paginate(5, PageRequest::new(9, 10));
        assert_eq!(window.current_page, 9);
        assert_eq!(window.total_pages, 1);
        assert_eq!(window.offset, 80);
    }
}
