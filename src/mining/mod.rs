//! Suggestion mining module
//!
//! Two mining modes feed the classifier: smart recursive search (depth-
//! bounded branch expansion guided by filter keywords) and brute-force
//! combination sweeps (cartesian products of word groups, each expanded
//! one suggestion level).

mod combine;
mod engine;

pub use combine::{brute_force_combinations, fetch_suggestions_for_combinations};
pub use engine::{filter_by_keywords, MiningEngine};

/// A fully resolved mining pattern, word-group references already expanded
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MiningPattern {
    /// Expand roots recursively, following only filter-matched branches
    SmartRecursive {
        root: Vec<String>,
        filter: Vec<String>,
        max_depth: u32,
    },
    /// Cartesian-product word groups, optionally prefixed with trend words
    BruteForce {
        groups: Vec<Vec<String>>,
        use_trend: bool,
    },
}
