//! Pagesift: a single-page crawl task engine
//!
//! This crate analyzes one web page per tracked crawl task: it fetches the
//! base page, extracts structural metadata, classifies discovered links as
//! internal or external, probes link liveness under bounded concurrency and
//! rate limiting, and records broken links before writing a terminal task
//! status.

pub mod config;
pub mod crawler;
pub mod storage;

use thiserror::Error;

/// Main error type for pagesift operations
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
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
}

/// Result type alias for pagesift operations
pub type Result<T> = std::result::Result<T, CrawlError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{CrawlEngine, StartOutcome, StopOutcome};
pub use storage::{BrokenLinkRecord, PageSummary, TaskRecord, TaskStatus};
