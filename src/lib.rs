//! Spacer: an incremental forum thread archiver
//!
//! This crate walks the pages of a discussion-forum thread (or a forum's
//! thread listing), extracts typed post/user records from each page's markup,
//! and upserts them into SQLite so repeated runs converge on one dataset.

pub mod config;
pub mod crawler;
pub mod extract;
pub mod output;
pub mod records;
pub mod storage;

use thiserror::Error;

/// Main error type for Spacer operations
#[derive(Debug, Error)]
pub enum SpacerError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("HTTP status {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Gave up on {url} after {attempts} attempts (last status {status})")]
    RetriesExhausted {
        url: String,
        status: u16,
        attempts: u32,
    },

    #[error("Missing element in markup: {0}")]
    MissingElement(String),

    #[error("Malformed date '{value}': {source}")]
    MalformedDate {
        value: String,
        source: chrono::ParseError,
    },

    #[error("Malformed number '{0}'")]
    MalformedNumber(String),

    #[error("Malformed attribute {name}='{value}'")]
    MalformedAttribute { name: &'static str, value: String },

    #[error("Invalid selector '{0}'")]
    Selector(String),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for Spacer operations
pub type Result<T> = std::result::Result<T, SpacerError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{Coordinator, EntityKind, PageResult, PageStep, Paginator};
pub use extract::{Extracted, ExtractMode, Extractor};
pub use records::{ForumPost, ForumUser};
pub use storage::{ForumStore, SqliteStorage};
