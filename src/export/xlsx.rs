//! Minimal Office Open XML workbook writer
//!
//! One sheet, a header row and one row per record. Text goes into inline
//! strings and numbers into numeric cells, so no shared-string table or
//! style sheet is needed.

use super::ExportColumns;
use crate::core::entity::Entity;
use crate::core::error::{ExportError, Result};
use crate::core::field::FieldValue;
use std::io::{Cursor, Write};
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/><Override PartName="/xl/worksheets/sheet1.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/></Types>"#;

const ROOT_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/></Relationships>"#;

const WORKBOOK_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/></Relationships>"#;

/// Sheet names are limited to 31 characters and a few forbidden symbols
fn sheet_name(entity: &str) -> String {
    let cleaned: String = entity
        .chars()
        .filter(|c| !matches!(c, '\\' | '/' | '?' | '*' | '[' | ']' | ':'))
        .take(31)
        .collect();
    if cleaned.is_empty() {
        "Sheet1".to_string()
    } else {
        cleaned
    }
}

fn workbook_xml(entity: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><sheets><sheet name="{}" sheetId="1" r:id="rId1"/></sheets></workbook>"#,
        escape(&sheet_name(entity))
    )
}

/// Escape text for XML content and attributes
fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            // Control characters are not allowed in XML 1.0
            c if c.is_control() && !matches!(c, '\t' | '\n' | '\r') => {}
            c => out.push(c),
        }
    }
    out
}

/// Spreadsheet column letters: 0 -> A, 25 -> Z, 26 -> AA
fn column_letters(mut index: usize) -> String {
    let mut letters = Vec::new();
    loop {
        letters.push(b'A' + (index % 26) as u8);
        if index < 26 {
            break;
        }
        index = index / 26 - 1;
    }
    letters.iter().rev().map(|&b| b as char).collect()
}

fn push_cell(xml: &mut String, reference: &str, value: &FieldValue) {
    match value {
        FieldValue::Null => {}
        FieldValue::Integer(i) => {
            xml.push_str(&format!(r#"<c r="{}"><v>{}</v></c>"#, reference, i));
        }
        FieldValue::Float(f) if f.is_finite() => {
            xml.push_str(&format!(r#"<c r="{}"><v>{}</v></c>"#, reference, f));
        }
        FieldValue::Boolean(b) => {
            xml.push_str(&format!(
                r#"<c r="{}" t="b"><v>{}</v></c>"#,
                reference,
                u8::from(*b)
            ));
        }
        other => push_text_cell(xml, reference, &other.to_text()),
    }
}

fn push_text_cell(xml: &mut String, reference: &str, text: &str) {
    xml.push_str(&format!(
        r#"<c r="{}" t="inlineStr"><is><t xml:space="preserve">{}</t></is></c>"#,
        reference,
        escape(text)
    ));
}

fn sheet_xml<R: Entity>(rows: &[R], columns: &ExportColumns) -> String {
    let mut xml = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData>"#,
    );

    xml.push_str(r#"<row r="1">"#);
    for (col, header) in columns.headers().enumerate() {
        push_text_cell(&mut xml, &format!("{}1", column_letters(col)), header);
    }
    xml.push_str("</row>");

    for (index, record) in rows.iter().enumerate() {
        let row_number = index + 2;
        xml.push_str(&format!(r#"<row r="{}">"#, row_number));
        for (col, value) in columns.values(record).iter().enumerate() {
            let reference = format!("{}{}", column_letters(col), row_number);
            push_cell(&mut xml, &reference, value);
        }
        xml.push_str("</row>");
    }

    xml.push_str("</sheetData></worksheet>");
    xml
}

/// Build the `.xlsx` archive
pub fn write_workbook<R: Entity>(
    rows: &[R],
    columns: &ExportColumns,
    entity: &str,
) -> Result<Vec<u8>> {
    let parts: [(&str, String); 5] = [
        ("[Content_Types].xml", CONTENT_TYPES.to_string()),
        ("_rels/.rels", ROOT_RELS.to_string()),
        ("xl/workbook.xml", workbook_xml(entity)),
        ("xl/_rels/workbook.xml.rels", WORKBOOK_RELS.to_string()),
        ("xl/worksheets/sheet1.xml", sheet_xml(rows, columns)),
    ];

    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options =
        SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);

    for (name, content) in parts {
        zip.start_file(name, options)
            .map_err(|e| ExportError::Workbook(format!("{}: {}", name, e)))?;
        zip.write_all(content.as_bytes())
            .map_err(|e| ExportError::Workbook(format!("{}: {}", name, e)))?;
    }

    let cursor = zip
        .finish()
        .map_err(|e| ExportError::Workbook(e.to_string()))?;
    Ok(cursor.into_inner())
}
