//! Export adapter: filtered rows -> CSV, workbook or printable HTML
//!
//! Exports always run on the filtered, sorted set before pagination
//! ([`ListView::filtered`](crate::core::ListView::filtered)), never on the
//! current page only.
//!
//! # Example
//!
//! ```rust,ignore
//! let exporter = Exporter::new("orders", Order::export_columns());
//! let file = exporter.export(view.filtered(), ExportFormat::Csv, today)?;
//! file.save_to("/tmp")?; // orders-2026-10-18.csv
//! ```

pub mod csv;
pub mod print;
pub mod xlsx;

use crate::core::entity::Entity;
use crate::core::error::{ExportError, Result};
use crate::core::field::FieldValue;
use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Ordered column map: field -> header
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExportColumns {
    columns: IndexMap<String, String>,
}

impl ExportColumns {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn column(mut self, field: impl Into<String>, header: impl Into<String>) -> Self {
        self.columns.insert(field.into(), header.into());
        self
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }

    pub fn headers(&self) -> impl Iterator<Item = &str> {
        self.columns.values().map(String::as_str)
    }

    /// Values of one record in column order (missing fields are null)
    pub fn values<R: Entity>(&self, record: &R) -> Vec<FieldValue> {
        self.fields()
            .map(|field| record.field_value(field).unwrap_or(FieldValue::Null))
            .collect()
    }

    /// Text cells of one record in column order
    pub fn cells<R: Entity>(&self, record: &R) -> Vec<String> {
        self.values(record).iter().map(FieldValue::to_text).collect()
    }
}

/// Output format of an export
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Csv,
    /// Office Open XML spreadsheet
    Workbook,
    /// HTML page for the print dialog
    Print,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Workbook => "xlsx",
            ExportFormat::Print => "html",
        }
    }

    pub fn content_type(self) -> &'static str {
        match self {
            ExportFormat::Csv => "text/csv;charset=utf-8",
            ExportFormat::Workbook => {
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            }
            ExportFormat::Print => "text/html;charset=utf-8",
        }
    }
}

/// `<entity>-<YYYY-MM-DD>.<ext>`
pub fn export_filename(entity: &str, today: NaiveDate, format: ExportFormat) -> String {
    format!(
        "{}-{}.{}",
        entity,
        today.format("%Y-%m-%d"),
        format.extension()
    )
}

/// A generated file, ready to download or print
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportFile {
    pub filename: String,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

impl ExportFile {
    /// Write the file into `dir`, returning its path
    pub fn save_to(&self, dir: impl AsRef<Path>) -> Result<PathBuf> {
        let path = dir.as_ref().join(&self.filename);
        std::fs::write(&path, &self.bytes).map_err(|e| {
            ExportError::Io(format!("{}: {}", path.display(), e))
        })?;
        tracing::info!(path = %path.display(), bytes = self.bytes.len(), "export saved");
        Ok(path)
    }
}

/// Export adapter of one screen
#[derive(Debug, Clone)]
pub struct Exporter {
    entity: String,
    title: String,
    columns: ExportColumns,
}

impl Exporter {
    pub fn new(entity: impl Into<String>, columns: ExportColumns) -> Self {
        let entity = entity.into();
        Self {
            title: entity.clone(),
            entity,
            columns,
        }
    }

    /// Heading of the printable page
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn columns(&self) -> &ExportColumns {
        &self.columns
    }

    pub fn export<R: Entity>(
        &self,
        rows: &[R],
        format: ExportFormat,
        today: NaiveDate,
    ) -> Result<ExportFile> {
        let bytes = match format {
            ExportFormat::Csv => csv::write_csv(rows, &self.columns)?,
            ExportFormat::Workbook => xlsx::write_workbook(rows, &self.columns, &self.entity)?,
            ExportFormat::Print => {
                print::render_print(rows, &self.columns, &self.title, today)?.into_bytes()
            }
        };
        tracing::debug!(entity = %self.entity, ?format, rows = rows.len(), "export generated");

        Ok(ExportFile {
            filename: export_filename(&self.entity, today, format),
            content_type: format.content_type(),
            bytes,
        })
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::core::entity::Entity;
    use crate::core::field::FieldValue;

    #[derive(Debug, Clone)]
    pub struct Line {
        pub id: String,
        pub name: String,
        pub qty: i64,
    }

    impl Entity for Line {
        fn resource_name() -> &'static str {
            "lines"
        }
        fn resource_name_singular() -> &'static str {
            "line"
        }
        fn fields() -> &'static [&'static str] {
            &["id", "name", "qty"]
        }
        fn id(&self) -> &str {
            &self.id
        }
        fn field_value(&self, field: &str) -> Option<FieldValue> {
            match field {
                "id" => Some(FieldValue::String(self.id.clone())),
                "name" => Some(FieldValue::String(self.name.clone())),
                "qty" => Some(FieldValue::Integer(self.qty)),
                _ => None,
            }
        }
    }

    pub fn line(id: &str, name: &str, qty: i64) -> Line {
        Line {
            id: id.to_string(),
            name: name.to_string(),
            qty,
        }
    }

    pub fn columns() -> super::ExportColumns {
        super::ExportColumns::new()
            .column("name", "Name")
            .column("qty", "Quantity")
    }
}
