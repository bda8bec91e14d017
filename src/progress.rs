//! Progress reporting and cooperative cancellation
//!
//! The mining engine and pipeline emit structured events to a side-channel
//! observer; nothing in the control flow depends on whether anyone
//! listens. Cancellation is a shared token observed at the same
//! boundaries: the current unit of work always completes.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Structured progress events emitted during a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressEvent {
    /// Smart recursive mining is starting
    MiningStarted {
        roots: usize,
        filters: usize,
        max_depth: u32,
    },
    /// A suggestion fetch is about to be issued
    FetchingSuggestions {
        depth: u32,
        max_depth: u32,
        keyword: String,
        index: usize,
        total: usize,
    },
    /// A new depth level begins with the given number of branches
    DepthAdvanced {
        depth: u32,
        max_depth: u32,
        branches: usize,
    },
    /// Brute-force mode is sweeping suggestions over generated combinations
    CombinationSweep { combinations: usize },
    /// Trend words are being fetched
    FetchingTrends,
    /// A keyword is being classified
    AnalyzingKeyword {
        keyword: String,
        index: usize,
        total: usize,
    },
    /// The cache was persisted at a checkpoint
    CheckpointSaved { processed: usize },
    /// A cancel request was observed; the run stops after this event
    Cancelled,
}

impl fmt::Display for ProgressEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProgressEvent::MiningStarted {
                roots,
                filters,
                max_depth,
            } => write!(
                f,
                "Smart recursive mining: {} roots, {} filters, max depth {}",
                roots, filters, max_depth
            ),
            ProgressEvent::FetchingSuggestions {
                depth,
                max_depth,
                keyword,
                index,
                total,
            } => write!(
                f,
                "[depth {}/{}] fetching suggestions: '{}' ({}/{})",
                depth + 1,
                max_depth,
                keyword,
                index,
                total
            ),
            ProgressEvent::DepthAdvanced {
                depth,
                max_depth,
                branches,
            } => write!(
                f,
                "[depth {}/{}] expanding {} promising branches",
                depth + 1,
                max_depth,
                branches
            ),
            ProgressEvent::CombinationSweep { combinations } => write!(
                f,
                "Brute-force mode: fetching suggestions for {} combinations",
                combinations
            ),
            ProgressEvent::FetchingTrends => write!(f, "Fetching trending keywords"),
            ProgressEvent::AnalyzingKeyword {
                keyword,
                index,
                total,
            } => write!(f, "Analyzing '{}' ({}/{})", keyword, index, total),
            ProgressEvent::CheckpointSaved { processed } => {
                write!(f, "Checkpoint saved after {} keywords", processed)
            }
            ProgressEvent::Cancelled => write!(f, "Cancel requested, stopping"),
        }
    }
}

/// Observer for progress events
pub trait ProgressSink {
    fn event(&self, event: ProgressEvent);
}

/// Sink that forwards every event to the tracing subscriber
pub struct LogSink;

impl ProgressSink for LogSink {
    fn event(&self, event: ProgressEvent) {
        tracing::info!("{}", event);
    }
}

/// Sink that discards everything
pub struct NullSink;

impl ProgressSink for NullSink {
    fn event(&self, _event: ProgressEvent) {}
}

/// Cooperative "stop after the current unit of work" signal
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests a stop; takes effect at the next work boundary
    pub fn request(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_requested(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}
