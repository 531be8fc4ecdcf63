//! Printable HTML table rendered with tera (auto-escaped)

use super::ExportColumns;
use crate::core::entity::Entity;
use crate::core::error::{ExportError, Result};
use chrono::NaiveDate;
use tera::{Context, Tera};

const PRINT_TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>{{ title }}</title>
<style>
  body { font-family: sans-serif; font-size: 12px; }
  table { border-collapse: collapse; width: 100%; }
  th, td { border: 1px solid #999; padding: 4px 6px; text-align: left; }
  th { background: #eee; }
</style>
</head>
<body onload="window.print()">
<h1>{{ title }}</h1>
<p>{{ date }} &middot; {{ rows | length }} rows</p>
<table>
<thead><tr>{% for header in headers %}<th>{{ header }}</th>{% endfor %}</tr></thead>
<tbody>
{% for row in rows %}<tr>{% for cell in row %}<td>{{ cell }}</td>{% endfor %}</tr>
{% endfor %}</tbody>
</table>
</body>
</html>
"#;

pub fn render_print<R: Entity>(
    rows: &[R],
    columns: &ExportColumns,
    title: &str,
    today: NaiveDate,
) -> Result<String> {
    let headers: Vec<&str> = columns.headers().collect();
    let cells: Vec<Vec<String>> = rows.iter().map(|r| columns.cells(r)).collect();

    let mut context = Context::new();
    context.insert("title", title);
    context.insert("date", &today.format("%Y-%m-%d").to_string());
    context.insert("headers", &headers);
    context.insert("rows", &cells);

    Tera::one_off(PRINT_TEMPLATE, &context, true)
        .map_err(|e| ExportError::Template(e.to_string()).into())
}
