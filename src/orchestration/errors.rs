//! Error types for query orchestration.
//!
//! - [`ErrorCode`]: machine-readable failure code
//! - [`QueryError`]: a failure raised already classified by the component that hit it
//! - [`ErrorContext`]: the classified, user-facing description of a failure
//! - [`OrchestrationError`]: why a `QueryOrchestrator::run` call did not produce results

use crate::constants::error_codes;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Machine-readable failure code
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ErrorCode {
    /// Malformed input file
    ParseError,
    /// Rejected or failing SQL
    QueryError,
    /// Generic failure with a message
    Error,
    /// Failure value that was not an error
    Unknown,
    /// Pre-classified failure raised without an explicit code
    UnknownError,
    /// Caller-supplied code
    Custom(String),
}

impl ErrorCode {
    pub fn as_str(&self) -> &str {
        match self {
            ErrorCode::ParseError => error_codes::PARSE_ERROR,
            ErrorCode::QueryError => error_codes::QUERY_ERROR,
            ErrorCode::Error => error_codes::ERROR,
            ErrorCode::Unknown => error_codes::UNKNOWN,
            ErrorCode::UnknownError => error_codes::UNKNOWN_ERROR,
            ErrorCode::Custom(code) => code,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for ErrorCode {
    fn from(code: &str) -> Self {
        match code {
            error_codes::PARSE_ERROR => ErrorCode::ParseError,
            error_codes::QUERY_ERROR => ErrorCode::QueryError,
            error_codes::ERROR => ErrorCode::Error,
            error_codes::UNKNOWN => ErrorCode::Unknown,
            error_codes::UNKNOWN_ERROR => ErrorCode::UnknownError,
            other => ErrorCode::Custom(other.to_string()),
        }
    }
}

impl From<String> for ErrorCode {
    fn from(code: String) -> Self {
        ErrorCode::from(code.as_str())
    }
}

impl From<ErrorCode> for String {
    fn from(code: ErrorCode) -> Self {
        code.as_str().to_string()
    }
}

/// Failure raised by a component that already knows how to describe it.
///
/// Defaults to `UNKNOWN_ERROR`, not recoverable, with no context tag.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{message}")]
pub struct QueryError {
    message: String,
    code: ErrorCode,
    recoverable: bool,
    context: Option<String>,
}

impl QueryError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: ErrorCode::UnknownError,
            recoverable: false,
            context: None,
        }
    }

    pub fn with_code(mut self, code: impl Into<ErrorCode>) -> Self {
        self.code = code.into();
        self
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    pub fn recoverable(mut self, recoverable: bool) -> Self {
        self.recoverable = recoverable;
        self
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn code(&self) -> &ErrorCode {
        &self.code
    }

    pub fn context(&self) -> Option<&str> {
        self.context.as_deref()
    }

    pub fn is_recoverable(&self) -> bool {
        self.recoverable
    }
}

/// Classified description of a failure, ready for display
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{message}")]
pub struct ErrorContext {
    /// User-facing description, never empty
    pub message: String,

    pub code: ErrorCode,

    /// Operation that failed, e.g. `file_upload` or `query_execution`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,

    /// Whether the user should be offered edit-and-resubmit
    pub recoverable: bool,
}

impl From<QueryError> for ErrorContext {
    fn from(error: QueryError) -> Self {
        Self {
            message: error.message,
            code: error.code,
            context: error.context,
            recoverable: error.recoverable,
        }
    }
}

/// Why a query run did not produce results
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OrchestrationError {
    /// Query text was empty after trimming; nothing was recorded
    #[error("Query text is empty")]
    EmptyQuery,

    /// Execution failed and the failure was classified
    #[error("Query failed ({}): {}", .0.code, .0.message)]
    Failed(ErrorContext),
}

impl OrchestrationError {
    /// Classified context for execution failures
    pub fn context(&self) -> Option<&ErrorContext> {
        match self {
            OrchestrationError::EmptyQuery => None,
            OrchestrationError::Failed(context) => Some(context),
        }
    }

    pub fn is_recoverable(&self) -> bool {
        match self {
            OrchestrationError::EmptyQuery => true,
            OrchestrationError::Failed(context) => context.recoverable,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_round_trips_through_strings() {
        assert_eq!(ErrorCode::from("PARSE_ERROR"), ErrorCode::ParseError);
        assert_eq!(
            ErrorCode::from("RATE_LIMITED"),
            ErrorCode::Custom("RATE_LIMITED".to_string())
        );
        assert_eq!(ErrorCode::UnknownError.to_string(), "UNKNOWN_ERROR");

        let json = serde_json::to_string(&ErrorCode::QueryError).unwrap();
        assert_eq!(json, "\"QUERY_ERROR\"");
    }

    #[test]
    fn test_query_error_defaults() {
        let error = QueryError::new("boom");
        assert_eq!(error.code(), &ErrorCode::UnknownError);
        assert!(!error.is_recoverable());
        assert!(error.context().is_none());
        assert_eq!(error.to_string(), "boom");
    }

    #[test]
    fn test_orchestration_error_display() {
        let error = OrchestrationError::Failed(ErrorContext {
            message: "Query execution failed. Please check your SQL syntax.".to_string(),
            code: ErrorCode::QueryError,
            context: Some("query_execution".to_string()),
            recoverable: true,
        });
        assert_eq!(
            error.to_string(),
            "Query failed (QUERY_ERROR): Query execution failed. Please check your SQL syntax."
        );
        assert!(error.is_recoverable());
        assert!(OrchestrationError::EmptyQuery.context().is_none());
    }
}
