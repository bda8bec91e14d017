//! Rank tally and console summary

use crate::output::KeywordRecord;
use crate::ranking::Rank;
use std::collections::HashMap;

/// Per-rank keyword counts for a completed run
#[derive(Debug, Clone, Default)]
pub struct AnalysisStats {
    pub total: usize,
    counts: HashMap<Rank, usize>,
}

impl AnalysisStats {
    /// Number of keywords that received the given rank
    pub fn count(&self, rank: Rank) -> usize {
        self.counts.get(&rank).copied().unwrap_or(0)
    }
}

/// Tallies records per rank
pub fn tally_ranks(records: &[KeywordRecord]) -> AnalysisStats {
    let mut stats = AnalysisStats {
        total: records.len(),
        counts: HashMap::new(),
    };
    for record in records {
        *stats.counts.entry(record.rank).or_insert(0) += 1;
    }
    stats
}

/// Prints the run summary to stdout
pub fn print_statistics(stats: &AnalysisStats, cache_hits: usize, api_calls: usize) {
    println!("Analysis complete: {} keywords", stats.total);
    println!();
    println!("Rank breakdown:");
    for rank in Rank::ALL {
        let count = stats.count(rank);
        if count > 0 {
            println!("  {}: {}", rank, count);
        }
    }
    println!();
    println!("Cache hits: {}", cache_hits);
    println!("New API runs: {}", api_calls);
}
