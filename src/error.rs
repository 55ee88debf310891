use thiserror::Error;

use crate::chat::ChatStoreError;
use crate::config::ConfigurationError;
use crate::engine::EngineError;
use crate::orchestration::OrchestrationError;

#[derive(Debug, Error)]
pub enum DataguardError {
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),
    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),
    #[error("Orchestration error: {0}")]
    Orchestration(#[from] OrchestrationError),
    #[error("Chat store error: {0}")]
    ChatStore(#[from] ChatStoreError),
    #[error("Export error: {0}")]
    Export(String),
}

impl From<serde_json::Error> for DataguardError {
    fn from(error: serde_json::Error) -> Self {
        DataguardError::Export(format!("JSON serialization error: {error}"))
    }
}

pub type Result<T> = std::result::Result<T, DataguardError>;
