//! Kerbside: an incremental vehicle listing harvester
//!
//! This crate collects structured vehicle records from a paginated listing
//! site, validates them against a strict schema, and maintains a durable,
//! deduplicated dataset that tracks the current state of the remote source
//! across repeated runs.

pub mod config;
pub mod dataset;
pub mod extract;
pub mod fetch;
pub mod run;

use thiserror::Error;

/// Main error type for Kerbside operations
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Fetch error: {0}")]
    Fetch(#[from] fetch::FetchError),

    #[error("Store error: {0}")]
    Store(#[from] dataset::StoreError),
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

/// Result type alias for Kerbside operations
pub type Result<T> = std::result::Result<T, HarvestError>;

// Re-export commonly used types
pub use config::Config;
pub use dataset::{page_key, reconcile, Dataset, DatasetStore, JsonFileStore};
pub use extract::Record;
pub use run::{Harvester, RunOutcome, RunStats};
