//! List pipeline: `paginate(sort(filter(source)))` plus per-tab counts
//!
//! Every list screen is described by a [`ListDescriptor`] (which fields are
//! searchable, which can be filtered or sorted, and how tabs partition the
//! data) and runs through the same [`ListPipeline`].
//!
//! # Example
//!
//! ```rust,ignore
//! let descriptor = ListDescriptor::new("orders")
//!     .search(["id", "customer", "status"])
//!     .select("platform")
//!     .date_range("created_at")
//!     .sort("price", SortKind::Numeric)
//!     .tabs("status", vec![Tab::all("all", "All"), Tab::new("new", "New", "yangi")]);
//!
//! let view = ListPipeline::new(descriptor).run(&orders, &query);
//! for order in view.rows() { /* render */ }
//! ```

use crate::core::comparator::{Comparator, SortKind, SortSpec};
use crate::core::entity::Entity;
use crate::core::predicate::Predicate;
use crate::core::query::{DEFAULT_PAGE_SIZE, ListQuery, PaginationMeta};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// Shown in place of the table when nothing matches
pub const EMPTY_STATE_MESSAGE: &str = "No records match the current filters";

/// Kind of a filterable field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterKind {
    /// Dropdown over enum values, with an "all" option
    Select,
    /// From/to date pickers
    DateRange,
}

/// A filterable field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterField {
    pub field: String,
    pub kind: FilterKind,
    /// Dropdown options, empty when they come from the data
    #[serde(default)]
    pub options: Vec<String>,
}

/// A sortable field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortField {
    pub field: String,
    #[serde(default)]
    pub kind: SortKind,
}

/// One status tab; `value: None` is the "all" tab
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tab {
    pub key: String,
    pub label: String,
    #[serde(default)]
    pub value: Option<String>,
}

impl Tab {
    pub fn new(key: impl Into<String>, label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            value: Some(value.into()),
        }
    }

    pub fn all(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            value: None,
        }
    }
}

/// Tabs partitioning a screen by one enum field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TabSet {
    pub field: String,
    pub tabs: Vec<Tab>,
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

/// Declarative description of one list screen
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListDescriptor {
    /// Resource name of the records (e.g., "orders")
    pub entity: String,

    #[serde(default)]
    pub search_fields: Vec<String>,

    #[serde(default)]
    pub filters: Vec<FilterField>,

    #[serde(default)]
    pub sort_fields: Vec<SortField>,

    #[serde(default)]
    pub tabs: Option<TabSet>,

    #[serde(default)]
    pub default_sort: Option<SortSpec>,

    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

impl ListDescriptor {
    pub fn new(entity: impl Into<String>) -> Self {
        Self {
            entity: entity.into(),
            search_fields: Vec::new(),
            filters: Vec::new(),
            sort_fields: Vec::new(),
            tabs: None,
            default_sort: None,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    pub fn search<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.search_fields.extend(fields.into_iter().map(Into::into));
        self
    }

    pub fn select(mut self, field: impl Into<String>) -> Self {
        self.filters.push(FilterField {
            field: field.into(),
            kind: FilterKind::Select,
            options: Vec::new(),
        });
        self
    }

    pub fn select_with_options<I, S>(mut self, field: impl Into<String>, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.filters.push(FilterField {
            field: field.into(),
            kind: FilterKind::Select,
            options: options.into_iter().map(Into::into).collect(),
        });
        self
    }

    pub fn date_range(mut self, field: impl Into<String>) -> Self {
        self.filters.push(FilterField {
            field: field.into(),
            kind: FilterKind::DateRange,
            options: Vec::new(),
        });
        self
    }

    pub fn sort(mut self, field: impl Into<String>, kind: SortKind) -> Self {
        self.sort_fields.push(SortField {
            field: field.into(),
            kind,
        });
        self
    }

    pub fn tabs(mut self, field: impl Into<String>, tabs: Vec<Tab>) -> Self {
        self.tabs = Some(TabSet {
            field: field.into(),
            tabs,
        });
        self
    }

    pub fn default_sort(mut self, spec: SortSpec) -> Self {
        self.default_sort = Some(spec);
        self
    }

    pub fn page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn filter_kind(&self, field: &str) -> Option<FilterKind> {
        self.filters.iter().find(|f| f.field == field).map(|f| f.kind)
    }

    pub fn sort_kind(&self, field: &str) -> Option<SortKind> {
        self.sort_fields
            .iter()
            .find(|f| f.field == field)
            .map(|f| f.kind)
    }

    /// A fresh query for this screen: first page, default sort and page size
    pub fn initial_query(&self) -> ListQuery {
        ListQuery::default()
            .with_sort(self.default_sort.clone())
            .with_page(1, self.page_size)
    }
}

/// Output of one pipeline run
#[derive(Debug, Clone)]
pub struct ListView<R> {
    filtered: Vec<R>,
    window: Range<usize>,
    pub pagination: PaginationMeta,
    /// Tab key -> count over the full source, in tab order
    pub tab_counts: IndexMap<String, usize>,
}

impl<R> ListView<R> {
    /// Rows of the current page
    pub fn rows(&self) -> &[R] {
        &self.filtered[self.window.clone()]
    }

    /// All matching rows in display order, before pagination
    pub fn filtered(&self) -> &[R] {
        &self.filtered
    }

    pub fn into_filtered(self) -> Vec<R> {
        self.filtered
    }

    pub fn total(&self) -> usize {
        self.filtered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filtered.is_empty()
    }

    /// Empty-state message when nothing matches
    pub fn empty_state(&self) -> Option<&'static str> {
        self.is_empty().then_some(EMPTY_STATE_MESSAGE)
    }

    pub fn tab_count(&self, key: &str) -> Option<usize> {
        self.tab_counts.get(key).copied()
    }
}

/// Filter -> sort -> paginate over any [`Entity`]
#[derive(Debug, Clone)]
pub struct ListPipeline {
    descriptor: ListDescriptor,
}

impl ListPipeline {
    pub fn new(descriptor: ListDescriptor) -> Self {
        Self { descriptor }
    }

    pub fn descriptor(&self) -> &ListDescriptor {
        &self.descriptor
    }

    /// Matching records in source order
    pub fn filter<R: Entity>(&self, source: &[R], query: &ListQuery) -> Vec<R> {
        Predicate::build(&self.descriptor, query).filter(source)
    }

    /// Sort in place; unknown or undeclared sort fields leave the order unchanged
    pub fn sort<R: Entity>(&self, rows: &mut [R], sort: Option<&SortSpec>) {
        let Some(spec) = sort else {
            return;
        };
        match self.descriptor.sort_kind(&spec.field) {
            Some(kind) => Comparator::new(spec, kind).sort(rows),
            None => {
                tracing::debug!(field = %spec.field, entity = %self.descriptor.entity, "ignoring sort on undeclared field");
            }
        }
    }

    /// Count per tab over the full source
    ///
    /// Counts only look at the tab field: search text, other selections, the
    /// date range and the active tab never change them.
    pub fn tab_counts<R: Entity>(&self, source: &[R]) -> IndexMap<String, usize> {
        let Some(tab_set) = &self.descriptor.tabs else {
            return IndexMap::new();
        };
        tab_set
            .tabs
            .iter()
            .map(|tab| {
                let predicate = Predicate::status_only(&tab_set.field, tab.value.as_deref());
                (tab.key.clone(), predicate.count(source))
            })
            .collect()
    }

    pub fn run<R: Entity>(&self, source: &[R], query: &ListQuery) -> ListView<R> {
        let mut filtered = self.filter(source, query);
        self.sort(&mut filtered, query.sort.as_ref());

        let pagination = PaginationMeta::new(query.page(), query.page_size(), filtered.len());
        let window = pagination.window();

        ListView {
            filtered,
            window,
            pagination,
            tab_counts: self.tab_counts(source),
        }
    }
}
