//! # Result Export
//!
//! Serializes a [`ResultSet`] into downloadable text formats. Delivering the
//! text (a download, a file, the clipboard) is left to the caller.
//!
//! ```rust
//! use dataguard_core::engine::ResultSet;
//! use dataguard_core::export::{export, ExportFormat};
//!
//! let results = ResultSet::new(vec!["id".to_string()], Vec::new());
//! let csv = export(&results, ExportFormat::Csv).unwrap();
//! assert_eq!(csv, "id");
//! ```

pub mod writers;

use crate::engine::ResultSet;
use crate::error::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub use writers::{
    cell_text, copyable_text, escape_html, to_csv, to_html, to_json, to_json_lines, to_markdown,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Csv,
    Json,
    #[serde(rename = "jsonl")]
    JsonLines,
    Markdown,
    Html,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 5] = [
        ExportFormat::Csv,
        ExportFormat::Json,
        ExportFormat::JsonLines,
        ExportFormat::Markdown,
        ExportFormat::Html,
    ];

    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
            ExportFormat::JsonLines => "jsonl",
            ExportFormat::Markdown => "md",
            ExportFormat::Html => "html",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "text/csv",
            ExportFormat::Json => "application/json",
            ExportFormat::JsonLines => "application/x-ndjson",
            ExportFormat::Markdown => "text/markdown",
            ExportFormat::Html => "text/html",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "json" => Ok(ExportFormat::Json),
            "jsonl" | "ndjson" => Ok(ExportFormat::JsonLines),
            "md" | "markdown" => Ok(ExportFormat::Markdown),
            "html" => Ok(ExportFormat::Html),
            other => Err(format!("Unsupported export format: {other}")),
        }
    }
}

/// Serialize `results` in `format`, stamping HTML output with the current time
pub fn export(results: &ResultSet, format: ExportFormat) -> Result<String> {
    export_at(results, format, Utc::now())
}

/// Serialize `results` in `format` with an explicit generation time
pub fn export_at(
    results: &ResultSet,
    format: ExportFormat,
    generated_at: DateTime<Utc>,
) -> Result<String> {
    Ok(match format {
        ExportFormat::Csv => to_csv(results),
        ExportFormat::Json => to_json(results)?,
        ExportFormat::JsonLines => to_json_lines(results)?,
        ExportFormat::Markdown => to_markdown(results),
        ExportFormat::Html => to_html(results, generated_at),
    })
}

/// `results-<epoch ms>.<ext>`
pub fn default_filename(format: ExportFormat, now: DateTime<Utc>) -> String {
    format!("results-{}.{}", now.timestamp_millis(), format.extension())
}
