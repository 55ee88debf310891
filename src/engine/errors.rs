//! Failure values raised by engine collaborators.

use serde_json::Value;
use thiserror::Error;

use crate::orchestration::QueryError;

/// Failure raised by the analytical engine or an ingestion collaborator.
///
/// The engine does not expose a typed taxonomy, so most failures arrive as a
/// bare message. Components that already know what went wrong raise a
/// [`QueryError`] instead, and the classifier passes its fields through.
#[derive(Debug, Clone, Error)]
pub enum EngineError {
    /// Failure already classified by the component that raised it
    #[error(transparent)]
    Classified(#[from] QueryError),

    /// Ordinary failure carrying a message
    #[error("{0}")]
    Failed(String),

    /// Failure value that is not an error and carries no message
    #[error("non-error failure value: {0}")]
    Opaque(Value),
}

impl EngineError {
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed(message.into())
    }

    pub fn opaque(value: impl Into<Value>) -> Self {
        Self::Opaque(value.into())
    }

    /// Message carried by the failure, if it has one
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Classified(error) => Some(error.message()),
            Self::Failed(message) => Some(message),
            Self::Opaque(_) => None,
        }
    }
}

impl From<anyhow::Error> for EngineError {
    fn from(error: anyhow::Error) -> Self {
        match error.downcast_ref::<QueryError>() {
            Some(query_error) => Self::Classified(query_error.clone()),
            None => Self::Failed(error.to_string()),
        }
    }
}
