//! Output module for exporting and summarizing analysis results
//!
//! This module owns the record contract handed to the export layer and
//! handles:
//! - Writing result CSV files
//! - Tallying keywords per rank for the console summary

mod csv;
mod stats;

pub use csv::write_results_csv;
pub use stats::{print_statistics, tally_ranks, AnalysisStats};

use crate::ranking::Rank;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to write output: {0}")]
    Write(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// One exported keyword with its classification
///
/// This is the only contract the analysis core owes the export layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordRecord {
    pub keyword: String,

    pub rank: Rank,

    /// Allintitle competition count; -1 when the query failed or the
    /// search provider was not configured
    pub allintitle_count: i64,

    /// Label of the pattern route(s) that produced this keyword
    pub route: String,
}
