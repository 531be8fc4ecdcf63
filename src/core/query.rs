//! List query state and pagination utilities

use crate::core::comparator::SortSpec;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Selection value meaning "do not filter on this field"
pub const ALL: &str = "all";

/// Maximum number of rows per page
pub const MAX_PAGE_SIZE: usize = 100;

/// Default number of rows per page
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Whether a selection value is the pass-through sentinel
pub fn is_all(value: &str) -> bool {
    let value = value.trim();
    value.is_empty() || value.eq_ignore_ascii_case(ALL)
}

/// Inclusive date range over one record field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    /// Field holding the record's date or timestamp
    pub field: String,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl DateRange {
    /// The range only filters when both bounds are set
    pub fn bounds(&self) -> Option<(NaiveDate, NaiveDate)> {
        match (self.from, self.to) {
            (Some(from), Some(to)) => Some((from, to)),
            _ => None,
        }
    }
}

/// Filter, sort and page state of one list screen
///
/// # Example
/// ```rust,ignore
/// let query = ListQuery::default()
///     .with_search("ali")
///     .with_selection("platform", "telegram")
///     .with_sort(SortSpec::parse("price:desc"));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListQuery {
    /// Free-text search
    pub search: String,

    /// Enum selections by field; [`ALL`] or blank disables a selection
    pub selections: BTreeMap<String, String>,

    /// Optional date range
    pub date_range: Option<DateRange>,

    /// Active tab key
    pub tab: Option<String>,

    /// Sort field and direction
    pub sort: Option<SortSpec>,

    /// Page number (starts at 1)
    pub page: usize,

    /// Number of rows per page
    pub page_size: usize,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            search: String::new(),
            selections: BTreeMap::new(),
            date_range: None,
            tab: None,
            sort: None,
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl ListQuery {
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    pub fn with_selection(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.selections.insert(field.into(), value.into());
        self
    }

    pub fn with_date_range(
        mut self,
        field: impl Into<String>,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Self {
        self.date_range = Some(DateRange {
            field: field.into(),
            from,
            to,
        });
        self
    }

    pub fn with_tab(mut self, tab: impl Into<String>) -> Self {
        self.tab = Some(tab.into());
        self
    }

    pub fn with_sort(mut self, sort: Option<SortSpec>) -> Self {
        self.sort = sort;
        self
    }

    pub fn with_page(mut self, page: usize, page_size: usize) -> Self {
        self.page = page;
        self.page_size = page_size;
        self
    }

    /// Get page number, ensuring minimum of 1
    pub fn page(&self) -> usize {
        self.page.max(1)
    }

    /// Get page size, clamped to `1..=MAX_PAGE_SIZE`
    pub fn page_size(&self) -> usize {
        self.page_size.clamp(1, MAX_PAGE_SIZE)
    }

    /// Active (non-sentinel) selections
    pub fn active_selections(&self) -> impl Iterator<Item = (&str, &str)> {
        self.selections
            .iter()
            .filter(|(_, value)| !is_all(value))
            .map(|(field, value)| (field.as_str(), value.as_str()))
    }
}

/// Pagination metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaginationMeta {
    /// Current page number (starts at 1)
    pub page: usize,

    /// Number of items per page
    pub limit: usize,

    /// Total number of items (after filters)
    pub total: usize,

    /// Total number of pages
    pub total_pages: usize,

    /// Whether there is a next page
    pub has_next: bool,

    /// Whether there is a previous page
    pub has_prev: bool,
}

impl PaginationMeta {
    /// Create pagination metadata, clamping the page into the available range
    pub fn new(page: usize, limit: usize, total: usize) -> Self {
        // Ensure limit is at least 1 to avoid division by zero
        let limit = limit.max(1);
        let total_pages = if total == 0 { 0 } else { total.div_ceil(limit) };
        let page = page.clamp(1, total_pages.max(1));
        let start = (page - 1) * limit;

        Self {
            page,
            limit,
            total,
            total_pages,
            has_next: start + limit < total,
            has_prev: page > 1,
        }
    }

    /// Index range of the current page within the full list
    pub fn window(&self) -> std::ops::Range<usize> {
        let start = ((self.page - 1) * self.limit).min(self.total);
        let end = (start + self.limit).min(self.total);
        start..end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_defaults() {
        let query = ListQuery::default();
        assert_eq!(query.page(), 1);
        assert_eq!(query.page_size(), DEFAULT_PAGE_SIZE);
        assert!(query.search.is_empty());
    }

    #[test]
    fn test_page_size_is_clamped() {
        assert_eq!(ListQuery::default().with_page(1, 0).page_size(), 1);
        assert_eq!(ListQuery::default().with_page(1, 500).page_size(), MAX_PAGE_SIZE);
        assert_eq!(ListQuery::default().with_page(0, 10).page(), 1);
    }

    #[test]
    fn test_all_sentinel() {
        assert!(is_all("all"));
        assert!(is_all("ALL"));
        assert!(is_all(""));
        assert!(is_all("  "));
        assert!(!is_all("yangi"));

        let query = ListQuery::default()
            .with_selection("status", "all")
            .with_selection("platform", "telegram");
        let active: Vec<_> = query.active_selections().collect();
        assert_eq!(active, vec![("platform", "telegram")]);
    }

    #[test]
    fn test_date_range_needs_both_bounds() {
        let day = NaiveDate::from_ymd_opt(2024, 5, 1);
        let half = DateRange {
            field: "created_at".into(),
            from: day,
            to: None,
        };
        assert_eq!(half.bounds(), None);

        let full = DateRange {
            field: "created_at".into(),
            from: day,
            to: day,
        };
        assert!(full.bounds().is_some());
    }

    #[test]
    fn test_pagination_meta() {
        let meta = PaginationMeta::new(1, 20, 145);
        assert_eq!(meta.total, 145);
        assert_eq!(meta.total_pages, 8);
        assert!(!meta.has_prev);
        assert!(meta.has_next);
        assert_eq!(meta.window(), 0..20);
    }

    #[test]
    fn test_pagination_last_page_window() {
        let meta = PaginationMeta::new(8, 20, 145);
        assert_eq!(meta.window(), 140..145);
        assert!(!meta.has_next);
        assert!(meta.has_prev);
    }

    #[test]
    fn test_pagination_clamps_page_past_end() {
        let meta = PaginationMeta::new(9, 10, 25);
        assert_eq!(meta.page, 3);
        assert_eq!(meta.window(), 20..25);
    }

    #[test]
    fn test_pagination_empty() {
        let meta = PaginationMeta::new(3, 10, 0);
        assert_eq!(meta.page, 1);
        assert_eq!(meta.total_pages, 0);
        assert_eq!(meta.window(), 0..0);
        assert!(!meta.has_next);
        assert!(!meta.has_prev);
    }
}
