//! Extension-Harvest: a marketplace catalog crawler and table exporter
//!
//! This crate retrieves extension metadata from a paginated gallery query API,
//! persists every page as a JSON snapshot, and flattens the accumulated records
//! into a fixed tabular schema that is written as CSV and loaded into SQLite.

pub mod config;
pub mod crawler;
pub mod export;
pub mod output;
pub mod state;
pub mod storage;

use thiserror::Error;

/// Main error type for Extension-Harvest operations
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Export error: {0}")]
    Export(#[from] export::ExportError),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),
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

/// Result type alias for Extension-Harvest operations
pub type Result<T> = std::result::Result<T, HarvestError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{CrawlReport, TerminationReason};
pub use export::{flatten, Extraction, FieldSpec, FlatRow, TableExporter, EXTENSION_FIELDS};
pub use state::CrawlState;
