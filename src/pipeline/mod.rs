//! Analysis pipeline module
//!
//! Orchestrates a full run: pattern resolution, trend fetch, suggestion
//! mining, cache-or-classify per keyword, checkpointing, and the final
//! cache flush.

mod coordinator;

pub use coordinator::{run_analysis, AnalysisReport, Coordinator};
