//! # Engine Collaborator
//!
//! The embedded analytical database is a black box to this crate. It is reached
//! only through [`QueryEngine`], which covers query execution, CSV ingestion and
//! schema introspection. Anything that can run SQL and hand back rows can sit
//! behind it: an embedded engine, a remote service, or a test double.

pub mod errors;
pub mod types;

use async_trait::async_trait;

pub use errors::EngineError;
pub use types::{sanitize_table_name, ResultSet, Row, SqlSuggestion, TableColumn};

/// Narrow interface to the analytical engine
#[async_trait]
pub trait QueryEngine: Send + Sync {
    /// Execute SQL text and return its rows and columns
    async fn execute(&self, sql: &str) -> Result<ResultSet, EngineError>;

    /// Load CSV contents as a new table, returning the table name
    async fn upload_csv(&self, file_name: &str, contents: &str) -> Result<String, EngineError>;

    /// Describe the columns of a loaded table
    async fn table_schema(&self, table_name: &str) -> Result<Vec<TableColumn>, EngineError>;

    /// Engine name for logging
    fn engine_name(&self) -> &'static str {
        "engine"
    }
}
