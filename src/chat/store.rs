//! File-backed chat transcript persistence.
//!
//! Each chat lives in `<directory>/<chat_id>.json` as a pretty-printed JSON
//! array of messages. The directory is created on first use.

use super::message::ChatMessage;
use crate::config::ChatConfig;
use crate::constants::chat::TRANSCRIPT_EXTENSION;
use crate::logging::log_error;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ChatStoreError {
    #[error("Invalid chat id '{0}': only letters, digits, '-' and '_' are allowed")]
    InvalidChatId(String),

    #[error("Chat store I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Chat transcript serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type ChatStoreResult<T> = Result<T, ChatStoreError>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatSummary {
    pub id: String,
    pub last_modified: DateTime<Utc>,
}

/// Keyed transcript storage under one directory
#[derive(Debug, Clone)]
pub struct ChatStore {
    directory: PathBuf,
}

impl ChatStore {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    pub fn from_config(config: &ChatConfig) -> Self {
        Self::new(config.directory.clone())
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Create an empty transcript under a fresh id
    pub async fn create(&self) -> ChatStoreResult<String> {
        let chat_id = uuid::Uuid::new_v4().simple().to_string();
        self.save(&chat_id, &[]).await?;
        debug!(chat_id = %chat_id, "Created chat transcript");
        Ok(chat_id)
    }

    /// Messages for `chat_id`.
    ///
    /// A missing transcript is an empty chat. A transcript that cannot be read
    /// or parsed is logged and also treated as empty.
    pub async fn load(&self, chat_id: &str) -> ChatStoreResult<Vec<ChatMessage>> {
        let path = self.transcript_path(chat_id)?;

        let content = match fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(error) if error.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(error) => {
                log_error("chat_store", "load", &error.to_string(), Some(chat_id));
                return Ok(Vec::new());
            }
        };

        match serde_json::from_str(&content) {
            Ok(messages) => Ok(messages),
            Err(error) => {
                log_error("chat_store", "load", &error.to_string(), Some(chat_id));
                Ok(Vec::new())
            }
        }
    }

    /// Replace the transcript for `chat_id`
    pub async fn save(&self, chat_id: &str, messages: &[ChatMessage]) -> ChatStoreResult<()> {
        let path = self.transcript_path(chat_id)?;
        self.ensure_directory().await?;

        let content = serde_json::to_string_pretty(messages)?;
        fs::write(&path, content)
            .await
            .map_err(|source| ChatStoreError::Io {
                path: path.clone(),
                source,
            })?;

        debug!(chat_id = %chat_id, messages = messages.len(), "Saved chat transcript");
        Ok(())
    }

    /// Empty the transcript but keep the chat
    pub async fn clear(&self, chat_id: &str) -> ChatStoreResult<()> {
        self.save(chat_id, &[]).await
    }

    /// Remove the transcript. Deleting an unknown chat is not an error.
    pub async fn delete(&self, chat_id: &str) -> ChatStoreResult<()> {
        let path = self.transcript_path(chat_id)?;
        match fs::remove_file(&path).await {
            Ok(()) => {
                debug!(chat_id = %chat_id, "Deleted chat transcript");
                Ok(())
            }
            Err(error) if error.kind() == ErrorKind::NotFound => Ok(()),
            Err(source) => Err(ChatStoreError::Io { path, source }),
        }
    }

    /// Every stored chat, most recently modified first
    pub async fn list(&self) -> ChatStoreResult<Vec<ChatSummary>> {
        self.ensure_directory().await?;

        let mut entries = fs::read_dir(&self.directory)
            .await
            .map_err(|source| self.io_error(source))?;

        let mut chats = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|source| self.io_error(source))?
        {
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(TRANSCRIPT_EXTENSION) {
                continue;
            }
            let Some(id) = path.file_stem().and_then(|stem| stem.to_str()) else {
                continue;
            };

            let modified = entry
                .metadata()
                .await
                .and_then(|metadata| metadata.modified())
                .map_err(|source| ChatStoreError::Io {
                    path: path.clone(),
                    source,
                })?;

            chats.push(ChatSummary {
                id: id.to_string(),
                last_modified: DateTime::<Utc>::from(modified),
            });
        }

        chats.sort_by(|a, b| b.last_modified.cmp(&a.last_modified));
        Ok(chats)
    }

    fn transcript_path(&self, chat_id: &str) -> ChatStoreResult<PathBuf> {
        validate_chat_id(chat_id)?;
        Ok(self
            .directory
            .join(format!("{chat_id}.{TRANSCRIPT_EXTENSION}")))
    }

    async fn ensure_directory(&self) -> ChatStoreResult<()> {
        fs::create_dir_all(&self.directory)
            .await
            .map_err(|source| self.io_error(source))
    }

    fn io_error(&self, source: std::io::Error) -> ChatStoreError {
        ChatStoreError::Io {
            path: self.directory.clone(),
            source,
        }
    }
}

impl Default for ChatStore {
    fn default() -> Self {
        Self::from_config(&ChatConfig::default())
    }
}

/// Reject ids that could escape the transcript directory
pub fn validate_chat_id(chat_id: &str) -> ChatStoreResult<()> {
    let valid = !chat_id.is_empty()
        && chat_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');

    if valid {
        Ok(())
    } else {
        Err(ChatStoreError::InvalidChatId(chat_id.to_string()))
    }
}
