//! Predicate builder: filter state -> one boolean test per record
//!
//! All active clauses are AND-combined. There is no OR across fields and no
//! negation.

use crate::core::entity::Entity;
use crate::core::pipeline::{FilterKind, ListDescriptor};
use crate::core::query::{ListQuery, is_all};
use chrono::NaiveDate;

#[derive(Debug, Clone, PartialEq)]
enum Clause {
    /// Case-insensitive substring over any of the fields
    Text { needle: String, fields: Vec<String> },
    /// Exact equality of the field's text
    Equals { field: String, value: String },
    /// Inclusive date bounds over the field's date portion
    DateRange {
        field: String,
        from: NaiveDate,
        to: NaiveDate,
    },
}

impl Clause {
    fn matches<R: Entity>(&self, record: &R) -> bool {
        match self {
            Clause::Text { needle, fields } => fields
                .iter()
                .any(|field| record.field_text(field).to_lowercase().contains(needle)),
            Clause::Equals { field, value } => record.field_text(field) == *value,
            Clause::DateRange { field, from, to } => record
                .field_value(field)
                .and_then(|v| v.date_part())
                .is_some_and(|date| *from <= date && date <= *to),
        }
    }
}

/// A boolean filter over records
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Predicate {
    clauses: Vec<Clause>,
}

impl Predicate {
    /// Predicate matching every record
    pub fn always() -> Self {
        Self::default()
    }

    /// Build the compound predicate for a screen's current filter state
    ///
    /// Selections, date ranges and tabs on fields the descriptor does not
    /// declare are ignored.
    pub fn build(descriptor: &ListDescriptor, query: &ListQuery) -> Self {
        let mut predicate = Self::always();

        let needle = query.search.trim().to_lowercase();
        if !needle.is_empty() && !descriptor.search_fields.is_empty() {
            predicate.clauses.push(Clause::Text {
                needle,
                fields: descriptor.search_fields.clone(),
            });
        }

        for (field, value) in query.active_selections() {
            if descriptor.filter_kind(field) == Some(FilterKind::Select) {
                predicate = predicate.and_equals(field, value);
            } else {
                tracing::debug!(field, value, entity = %descriptor.entity, "ignoring selection on undeclared field");
            }
        }

        if let Some(range) = &query.date_range {
            if descriptor.filter_kind(&range.field) == Some(FilterKind::DateRange) {
                if let Some((from, to)) = range.bounds() {
                    predicate.clauses.push(Clause::DateRange {
                        field: range.field.clone(),
                        from,
                        to,
                    });
                }
            } else {
                tracing::debug!(field = %range.field, entity = %descriptor.entity, "ignoring date range on undeclared field");
            }
        }

        if let (Some(tab_key), Some(tab_set)) = (&query.tab, &descriptor.tabs) {
            match tab_set.tabs.iter().find(|t| &t.key == tab_key) {
                Some(tab) => {
                    if let Some(value) = &tab.value {
                        predicate = predicate.and_equals(&tab_set.field, value);
                    }
                }
                None => {
                    tracing::debug!(tab = %tab_key, entity = %descriptor.entity, "ignoring unknown tab");
                }
            }
        }

        predicate
    }

    /// Predicate that only looks at one enum field (used for tab counts)
    pub fn status_only(field: &str, value: Option<&str>) -> Self {
        match value {
            Some(value) => Self::always().and_equals(field, value),
            None => Self::always(),
        }
    }

    /// Add an equality clause; the [`ALL`](crate::core::query::ALL) sentinel adds nothing
    pub fn and_equals(mut self, field: &str, value: &str) -> Self {
        if !is_all(value) {
            self.clauses.push(Clause::Equals {
                field: field.to_string(),
                value: value.to_string(),
            });
        }
        self
    }

    /// Whether the predicate has no active clause
    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    pub fn matches<R: Entity>(&self, record: &R) -> bool {
        self.clauses.iter().all(|clause| clause.matches(record))
    }

    /// Matching records, in source order
    pub fn filter<R: Entity>(&self, source: &[R]) -> Vec<R> {
        source.iter().filter(|r| self.matches(*r)).cloned().collect()
    }

    pub fn count<R: Entity>(&self, source: &[R]) -> usize {
        source.iter().filter(|r| self.matches(*r)).count()
    }
}
