//! Competitive rank classification
//!
//! Each mined keyword is assigned one of the closed set of ranks based on
//! its allintitle competition count and how recently the existing
//! competition has been updated.

mod classifier;

pub use classifier::RankClassifier;

use crate::providers::{QueryCount, WindowedResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Competitive opportunity rank
///
/// `SS` is the sniper override (low competition plus very recent activity
/// on allowlisted domains); `S` through `C` follow the windowed-freshness
/// cascade; `Unknown` marks keywords recorded without a configured search
/// provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rank {
    #[serde(rename = "SS")]
    Ss,
    S,
    A,
    B,
    C,
    #[serde(rename = "?")]
    Unknown,
}

impl Rank {
    /// All ranks in display order
    pub const ALL: [Rank; 6] = [
        Rank::Ss,
        Rank::S,
        Rank::A,
        Rank::B,
        Rank::C,
        Rank::Unknown,
    ];
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Rank::Ss => "SS",
            Rank::S => "S",
            Rank::A => "A",
            Rank::B => "B",
            Rank::C => "C",
            Rank::Unknown => "?",
        };
        write!(f, "{}", label)
    }
}

/// Classification record for one keyword
///
/// The classifier emits entries without a timestamp; the result cache
/// stamps them on store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankEntry {
    pub keyword: String,

    pub allintitle_count: QueryCount,

    pub rank: Rank,

    /// Windowed query results keyed by window label ("7d", "30d", ...)
    #[serde(default)]
    pub recent_results: BTreeMap<String, WindowedResult>,

    /// RFC 3339 store time; absent until the entry has been cached
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

impl RankEntry {
    /// Entry recorded when no search provider is configured
    pub fn unknown(keyword: &str) -> Self {
        Self {
            keyword: keyword.to_string(),
            allintitle_count: QueryCount::Failed,
            rank: Rank::Unknown,
            recent_results: BTreeMap::new(),
            timestamp: None,
        }
    }
}

/// Label under which a windowed result is recorded
pub fn window_label(days: u32) -> String {
    format!("{}d", days)
}
