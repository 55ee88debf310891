//! # Query Failure Classification
//!
//! Maps raw engine failures into an [`ErrorContext`] the UI can display.
//!
//! ## Overview
//!
//! The analytical engine reports failures as free-form messages, so the standard
//! classifier works on message text. Rules are checked in order and the first
//! match wins:
//!
//! 1. Already classified ([`QueryError`]) → fields passed through
//! 2. Message contains `CSV` or `parse` → `PARSE_ERROR`, recoverable
//! 3. Message contains `query` or `SQL` → `QUERY_ERROR`, recoverable
//! 4. Any other message → `ERROR`, not recoverable, original message kept
//! 5. Not an error at all → `UNKNOWN`, not recoverable
//!
//! Substring matching is case-sensitive. A classifier for a typed engine error
//! contract can be swapped in through the [`ErrorClassifier`] trait.
//!
//! ## Usage
//!
//! ```rust
//! use dataguard_core::engine::EngineError;
//! use dataguard_core::orchestration::{ErrorClassifier, ErrorCode, StandardErrorClassifier};
//!
//! let classifier = StandardErrorClassifier::new();
//! let context = classifier.classify(&EngineError::failed("SQL syntax error near SELECT"));
//!
//! assert_eq!(context.code, ErrorCode::QueryError);
//! assert!(context.recoverable);
//! ```
//!
//! [`QueryError`]: crate::orchestration::QueryError

use crate::constants::{error_contexts, error_messages};
use crate::engine::EngineError;
use crate::orchestration::errors::{ErrorCode, ErrorContext};

/// Trait for failure classification strategies
pub trait ErrorClassifier: Send + Sync {
    /// Classify a failure into a displayable context. Must never fail.
    fn classify(&self, error: &EngineError) -> ErrorContext;

    /// Get the classifier name for identification
    fn classifier_name(&self) -> &'static str;
}

/// Message-heuristic classifier matching the engine's untyped error channel
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardErrorClassifier;

impl StandardErrorClassifier {
    pub fn new() -> Self {
        Self
    }

    fn classify_message(&self, message: &str) -> ErrorContext {
        if message.contains("CSV") || message.contains("parse") {
            return ErrorContext {
                message: error_messages::PARSE_FAILED.to_string(),
                code: ErrorCode::ParseError,
                context: Some(error_contexts::FILE_UPLOAD.to_string()),
                recoverable: true,
            };
        }

        if message.contains("query") || message.contains("SQL") {
            return ErrorContext {
                message: error_messages::QUERY_FAILED.to_string(),
                code: ErrorCode::QueryError,
                context: Some(error_contexts::QUERY_EXECUTION.to_string()),
                recoverable: true,
            };
        }

        ErrorContext {
            message: message.to_string(),
            code: ErrorCode::Error,
            context: None,
            recoverable: false,
        }
    }
}

impl ErrorClassifier for StandardErrorClassifier {
    fn classify(&self, error: &EngineError) -> ErrorContext {
        match error {
            EngineError::Classified(query_error) => {
                let mut context = ErrorContext::from(query_error.clone());
                if context.message.is_empty() {
                    context.message = error_messages::UNKNOWN_ERROR.to_string();
                }
                context
            }
            EngineError::Failed(message) if message.is_empty() => {
                self.classify_message(error_messages::UNKNOWN_ERROR)
            }
            EngineError::Failed(message) => self.classify_message(message),
            EngineError::Opaque(_) => ErrorContext {
                message: error_messages::UNEXPECTED_ERROR.to_string(),
                code: ErrorCode::Unknown,
                context: None,
                recoverable: false,
            },
        }
    }

    fn classifier_name(&self) -> &'static str {
        "standard"
    }
}

/// Classify with the standard rules
pub fn classify(error: &EngineError) -> ErrorContext {
    StandardErrorClassifier.classify(error)
}
