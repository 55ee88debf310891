//! Data shapes exchanged with the analytical engine.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single result row, keyed by column name
pub type Row = serde_json::Map<String, Value>;

/// Rows and column names returned by one query execution
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultSet {
    /// Result rows in engine order
    pub rows: Vec<Row>,

    /// Column names in projection order
    pub columns: Vec<String>,

    /// Number of rows in `rows`
    pub row_count: usize,
}

impl ResultSet {
    /// Build a result set, deriving the row count from `rows`
    pub fn new(columns: Vec<String>, rows: Vec<Row>) -> Self {
        let row_count = rows.len();
        Self {
            rows,
            columns,
            row_count,
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Value of `column` in row `index`, `None` when either is absent
    pub fn value(&self, index: usize, column: &str) -> Option<&Value> {
        self.rows.get(index).and_then(|row| row.get(column))
    }
}

/// Column description returned by schema introspection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableColumn {
    pub name: String,

    #[serde(rename = "type")]
    pub data_type: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nullable: Option<bool>,
}

impl TableColumn {
    pub fn new(name: impl Into<String>, data_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data_type: data_type.into(),
            nullable: None,
        }
    }
}

/// SQL proposed by the assistant backend for a natural-language request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SqlSuggestion {
    pub query: String,
    pub explanation: String,
    pub table_used: Option<String>,
}

/// Derive a table name from an uploaded file name.
///
/// Strips the final extension, replaces anything outside `[A-Za-z0-9_]` with
/// `_` and lowercases the result, so `Sales Report.2024.csv` becomes
/// `sales_report_2024`.
pub fn sanitize_table_name(file_name: &str) -> String {
    let stem = match file_name.rfind('.') {
        Some(idx) if idx + 1 < file_name.len() && !file_name[idx + 1..].contains('/') => {
            &file_name[..idx]
        }
        _ => file_name,
    };

    stem.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect()
}
