//! CSV export: UTF-8 with BOM so spreadsheet apps detect the encoding

use super::ExportColumns;
use crate::core::entity::Entity;
use crate::core::error::{ExportError, Result};

/// Byte order mark prefixed to every CSV export
pub const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Header row plus one row per record; an empty set yields the header only
pub fn write_csv<R: Entity>(rows: &[R], columns: &ExportColumns) -> Result<Vec<u8>> {
    let mut writer = ::csv::WriterBuilder::new()
        .terminator(::csv::Terminator::CRLF)
        .from_writer(UTF8_BOM.to_vec());

    writer
        .write_record(columns.headers())
        .map_err(|e| ExportError::Csv(e.to_string()))?;

    for row in rows {
        writer
            .write_record(columns.cells(row))
            .map_err(|e| ExportError::Csv(e.to_string()))?;
    }

    writer
        .into_inner()
        .map_err(|e| ExportError::Csv(e.to_string()).into())
}
