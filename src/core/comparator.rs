//! Comparator builder: sort key + direction -> ordering over records

use crate::core::entity::Entity;
use crate::core::field::{FieldValue, locale_compare};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Sort direction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }

    /// Header indicator for a sortable column
    pub fn indicator(self) -> &'static str {
        match self {
            SortDirection::Asc => "▲",
            SortDirection::Desc => "▼",
        }
    }
}

/// How values of a sortable field are compared
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKind {
    #[default]
    Text,
    Numeric,
    Date,
}

/// Sort field and direction
///
/// # Format
/// - `field:asc` or `field` (ascending)
/// - `field:desc` (descending)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    pub field: String,
    #[serde(default)]
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Asc,
        }
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Desc,
        }
    }

    /// Parse `field`, `field:asc` or `field:desc`
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        let (field, direction) = match raw.split_once(':') {
            Some((field, "desc")) => (field, SortDirection::Desc),
            Some((field, "asc")) => (field, SortDirection::Asc),
            Some(_) => return None,
            None => (raw, SortDirection::Asc),
        };
        if field.is_empty() {
            return None;
        }
        Some(Self {
            field: field.to_string(),
            direction,
        })
    }

    /// Sort state after clicking the header of `field`
    ///
    /// Clicking the current field flips the direction, a new field starts ascending.
    pub fn toggle(current: Option<&SortSpec>, field: &str) -> SortSpec {
        match current {
            Some(spec) if spec.field == field => SortSpec {
                field: spec.field.clone(),
                direction: spec.direction.toggled(),
            },
            _ => SortSpec::asc(field),
        }
    }
}

impl std::fmt::Display for SortSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let direction = match self.direction {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        };
        write!(f, "{}:{}", self.field, direction)
    }
}

/// Ordering function over two records
#[derive(Debug, Clone)]
pub struct Comparator {
    field: String,
    kind: SortKind,
    direction: SortDirection,
}

impl Comparator {
    pub fn new(spec: &SortSpec, kind: SortKind) -> Self {
        Self {
            field: spec.field.clone(),
            kind,
            direction: spec.direction,
        }
    }

    pub fn compare<R: Entity>(&self, a: &R, b: &R) -> Ordering {
        let left = a.field_value(&self.field).unwrap_or(FieldValue::Null);
        let right = b.field_value(&self.field).unwrap_or(FieldValue::Null);
        let ordering = compare_values(&left, &right, self.kind);
        match self.direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    }

    /// Stable in-place sort; equal keys keep their source order
    pub fn sort<R: Entity>(&self, rows: &mut [R]) {
        rows.sort_by(|a, b| self.compare(a, b));
    }
}

/// Compare two field values as `kind`; missing values come first
pub fn compare_values(left: &FieldValue, right: &FieldValue, kind: SortKind) -> Ordering {
    match kind {
        SortKind::Text => locale_compare(&left.to_text(), &right.to_text()),
        SortKind::Numeric => match (left.as_number(), right.as_number()) {
            (Some(l), Some(r)) => l.total_cmp(&r),
            (None, Some(_)) => Ordering::Less,
            (Some(_), None) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        },
        SortKind::Date => match (sort_instant(left), sort_instant(right)) {
            (Some(l), Some(r)) => l.cmp(&r),
            (None, Some(_)) => Ordering::Less,
            (Some(_), None) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        },
    }
}

// Full timestamps compare by their whole value, plain dates by day.
fn sort_instant(value: &FieldValue) -> Option<chrono::NaiveDateTime> {
    match value {
        FieldValue::DateTime(dt) => Some(dt.naive_utc()),
        FieldValue::Date(d) => d.and_hms_opt(0, 0, 0),
        FieldValue::String(s) => {
            let s = s.trim();
            chrono::DateTime::parse_from_rfc3339(s)
                .map(|dt| dt.naive_utc())
                .ok()
                .or_else(|| chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S").ok())
                .or_else(|| chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").ok())
                .or_else(|| chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M").ok())
                .or_else(|| value.date_part().and_then(|d| d.and_hms_opt(0, 0, 0)))
        }
        _ => None,
    }
}
