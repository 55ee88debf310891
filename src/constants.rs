//! # System Constants
//!
//! Defaults and fixed strings that define the operational boundaries of the
//! query cache and orchestration layer. Configuration presets and the error
//! classifier both read from here so the numbers live in one place.

/// Result cache defaults
pub mod cache {
    /// Maximum number of cached query results
    pub const DEFAULT_MAX_ENTRIES: usize = 50;

    /// Maximum age of a cached result before it expires (5 minutes)
    pub const DEFAULT_MAX_AGE_MS: u64 = 5 * 60 * 1000;
}

/// Retry helper defaults
pub mod retry {
    pub const DEFAULT_MAX_RETRIES: u32 = 3;
    pub const DEFAULT_INITIAL_DELAY_MS: u64 = 1000;
}

/// Query history defaults
pub mod history {
    pub const DEFAULT_HISTORY_LIMIT: usize = 50;
}

/// Error codes surfaced in an `ErrorContext`
pub mod error_codes {
    pub const PARSE_ERROR: &str = "PARSE_ERROR";
    pub const QUERY_ERROR: &str = "QUERY_ERROR";
    pub const ERROR: &str = "ERROR";
    pub const UNKNOWN: &str = "UNKNOWN";
    pub const UNKNOWN_ERROR: &str = "UNKNOWN_ERROR";
}

/// Operation tags attached to classified failures
pub mod error_contexts {
    pub const FILE_UPLOAD: &str = "file_upload";
    pub const QUERY_EXECUTION: &str = "query_execution";
}

/// User-facing messages produced by the error classifier
pub mod error_messages {
    pub const PARSE_FAILED: &str = "Failed to parse CSV file. Please check the file format.";
    pub const QUERY_FAILED: &str = "Query execution failed. Please check your SQL syntax.";
    pub const UNKNOWN_ERROR: &str = "An unknown error occurred";
    pub const UNEXPECTED_ERROR: &str = "An unexpected error occurred";
}

/// Chat transcript store defaults
pub mod chat {
    pub const DEFAULT_CHAT_DIRECTORY: &str = ".chats";
    pub const TRANSCRIPT_EXTENSION: &str = "json";
}

/// Export defaults
pub mod export {
    /// Markdown columns never grow wider than this many characters
    pub const MARKDOWN_MAX_COLUMN_WIDTH: usize = 50;
}

pub mod system {
    pub const DATAGUARD_CORE_VERSION: &str = "0.1.0";

    /// Environment variables consulted (in order) to detect the runtime environment
    pub const ENVIRONMENT_VARIABLES: &[&str] = &["DATAGUARD_ENV", "APP_ENV", "RUST_ENV"];

    pub const DEFAULT_ENVIRONMENT: &str = "development";
}
