//! Text serializers over a [`ResultSet`].

use crate::constants::export::MARKDOWN_MAX_COLUMN_WIDTH;
use crate::engine::{ResultSet, Row};
use chrono::{DateTime, Utc};
use serde_json::Value;

/// Display text for one cell; null and missing cells are empty
pub fn cell_text(row: &Row, column: &str) -> String {
    match row.get(column) {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(text)) => text.clone(),
        Some(other) => other.to_string(),
    }
}

/// Comma-separated values with a header row.
///
/// Cells containing a comma, a double quote or a newline are quoted, with
/// inner quotes doubled. Lines are joined with `\n`.
pub fn to_csv(results: &ResultSet) -> String {
    let mut lines = Vec::with_capacity(results.rows.len() + 1);
    lines.push(results.columns.join(","));

    for row in &results.rows {
        let cells: Vec<String> = results
            .columns
            .iter()
            .map(|column| escape_csv(&cell_text(row, column)))
            .collect();
        lines.push(cells.join(","));
    }

    lines.join("\n")
}

fn escape_csv(text: &str) -> String {
    if text.contains(',') || text.contains('"') || text.contains('\n') {
        format!("\"{}\"", text.replace('"', "\"\""))
    } else {
        text.to_string()
    }
}

/// Pretty-printed JSON array of row objects
pub fn to_json(results: &ResultSet) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&results.rows)
}

/// One compact JSON row object per line
pub fn to_json_lines(results: &ResultSet) -> serde_json::Result<String> {
    let lines = results
        .rows
        .iter()
        .map(serde_json::to_string)
        .collect::<serde_json::Result<Vec<_>>>()?;
    Ok(lines.join("\n"))
}

/// Pipe table with padded columns.
///
/// Column width is the longest of the header and its cells, capped for
/// padding purposes. Longer cells are written in full.
pub fn to_markdown(results: &ResultSet) -> String {
    let widths: Vec<usize> = results
        .columns
        .iter()
        .map(|column| {
            let widest_cell = results
                .rows
                .iter()
                .map(|row| cell_text(row, column).chars().count())
                .max()
                .unwrap_or(0);
            column
                .chars()
                .count()
                .max(widest_cell)
                .min(MARKDOWN_MAX_COLUMN_WIDTH)
        })
        .collect();

    let format_line = |cells: Vec<String>| format!("| {} |", cells.join(" | "));

    let mut lines = Vec::with_capacity(results.rows.len() + 2);
    lines.push(format_line(
        results
            .columns
            .iter()
            .zip(&widths)
            .map(|(column, width)| pad_end(column, *width))
            .collect(),
    ));
    lines.push(format_line(widths.iter().map(|width| "-".repeat(*width)).collect()));

    for row in &results.rows {
        lines.push(format_line(
            results
                .columns
                .iter()
                .zip(&widths)
                .map(|(column, width)| pad_end(&cell_text(row, column), *width))
                .collect(),
        ));
    }

    lines.join("\n")
}

fn pad_end(text: &str, width: usize) -> String {
    let len = text.chars().count();
    if len >= width {
        text.to_string()
    } else {
        format!("{text}{}", " ".repeat(width - len))
    }
}

/// Standalone HTML document with a summary line and an escaped table
pub fn to_html(results: &ResultSet, generated_at: DateTime<Utc>) -> String {
    let header_cells: String = results
        .columns
        .iter()
        .map(|column| format!("<th>{}</th>", escape_html(column)))
        .collect();

    let body_rows: String = results
        .rows
        .iter()
        .map(|row| {
            let cells: String = results
                .columns
                .iter()
                .map(|column| format!("<td>{}</td>", escape_html(&cell_text(row, column))))
                .collect();
            format!("\n        <tr>\n          {cells}\n        </tr>")
        })
        .collect();

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="UTF-8">
  <title>Query Results</title>
  <style>
    body {{ font-family: system-ui, -apple-system, sans-serif; padding: 20px; }}
    table {{ border-collapse: collapse; width: 100%; }}
    th, td {{ border: 1px solid #ddd; padding: 8px; text-align: left; }}
    th {{ background-color: #f5f5f5; font-weight: 600; }}
    tr:hover {{ background-color: #f9f9f9; }}
    .meta {{ color: #666; font-size: 14px; margin-bottom: 20px; }}
  </style>
</head>
<body>
  <div class="meta">
    <strong>Query Results</strong> • {row_count} rows • {column_count} columns
    • Generated: {generated}
  </div>
  <table>
    <thead>
      <tr>
        {header_cells}
      </tr>
    </thead>
    <tbody>{body_rows}
    </tbody>
  </table>
</body>
</html>"#,
        row_count = results.row_count,
        column_count = results.columns.len(),
        generated = generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
    )
}

/// Escape `& < > " '` for HTML text
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#039;"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// Tab-separated header and rows for the clipboard
pub fn copyable_text(results: &ResultSet) -> String {
    let mut lines = Vec::with_capacity(results.rows.len() + 1);
    lines.push(results.columns.join("\t"));

    for row in &results.rows {
        let cells: Vec<String> = results
            .columns
            .iter()
            .map(|column| cell_text(row, column))
            .collect();
        lines.push(cells.join("\t"));
    }

    lines.join("\n")
}
