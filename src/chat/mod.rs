//! # Chat Transcripts
//!
//! Persistence for the assistant's chat history. The assistant backend itself
//! is an external collaborator; this crate only stores what it exchanged so a
//! session can be reloaded, cleared or removed.

pub mod message;
pub mod store;

pub use message::{ChatMessage, ChatRole};
pub use store::{validate_chat_id, ChatStore, ChatStoreError, ChatStoreResult, ChatSummary};
