//! Configuration module for Demand-Miner
//!
//! This module handles loading, parsing, and validating TOML configuration
//! files, including word groups and preset mining patterns.
//!
//! # Example
//!
//! ```no_run
//! use demand_miner::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("config.toml")).unwrap();
//! println!("Max recursion depth: {}", config.mining.max_recursion_depth);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    BatchConfig, CacheConfig, Config, FilteringConfig, MiningConfig, OutputConfig, PatternConfig,
    ProviderConfig, RankingConfig, RateLimitConfig, SmartTtlConfig, SniperConfig, TimeoutConfig,
    WordGroup,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash};
