//! Demand-Miner: an SEO keyword demand mining tool
//!
//! This crate discovers candidate search keywords by expanding seed terms
//! through autocomplete suggestion queries, classifies each keyword by
//! competitive opportunity using staged time-windowed search counts, and
//! caches classification results to minimize third-party API usage.

pub mod cache;
pub mod config;
pub mod mining;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod providers;
pub mod ranking;

use thiserror::Error;

/// Main error type for Demand-Miner operations
#[derive(Debug, Error)]
pub enum MinerError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

    #[error("Unknown pattern id: {0}")]
    UnknownPattern(String),

    #[error("No suggestions discovered for the selected pattern")]
    NoSuggestions,

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

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

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for Demand-Miner operations
pub type Result<T> = std::result::Result<T, MinerError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use cache::ResultCache;
pub use config::Config;
pub use mining::MiningEngine;
pub use progress::{CancelToken, ProgressEvent, ProgressSink};
pub use providers::{QueryCount, SearchItem, WindowedResult};
pub use ranking::{Rank, RankClassifier, RankEntry};
