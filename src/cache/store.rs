//! TTL/rank-sensitive result store with checkpointing
//!
//! The store is loaded once at startup, mutated in memory during the run,
//! and persisted at checkpoints and at the end. Cache IO never fails the
//! run: a corrupt or unreadable file degrades to an empty store, and a
//! failed save leaves the in-memory state intact for the rest of the run.

use crate::config::CacheConfig;
use crate::ranking::{Rank, RankEntry};
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Durable keyword -> RankEntry store
pub struct ResultCache {
    path: PathBuf,
    config: CacheConfig,
    entries: HashMap<String, RankEntry>,
}

impl ResultCache {
    /// Loads the cache from the configured path
    ///
    /// A missing file is a normal first run; unreadable or corrupt data is
    /// logged and degrades to an empty store.
    pub fn load(path: &Path, config: CacheConfig) -> Self {
        let entries = match std::fs::read_to_string(path) {
            Ok(content) => match serde_json::from_str::<HashMap<String, RankEntry>>(&content) {
                Ok(entries) => {
                    tracing::info!("Loaded {} cached entries from {}", entries.len(), path.display());
                    entries
                }
                Err(e) => {
                    tracing::warn!("Cache file {} is corrupt, starting empty: {}", path.display(), e);
                    HashMap::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(e) => {
                tracing::warn!("Failed to read cache file {}, starting empty: {}", path.display(), e);
                HashMap::new()
            }
        };

        Self {
            path: path.to_path_buf(),
            config,
            entries,
        }
    }

    /// Number of entries in the store, fresh or stale
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the cached entry if caching is enabled and the entry is
    /// still fresh under the TTL policy
    pub fn lookup(&self, keyword: &str) -> Option<&RankEntry> {
        if !self.config.enabled {
            return None;
        }
        let entry = self.entries.get(keyword)?;
        if self.is_fresh(entry) {
            Some(entry)
        } else {
            None
        }
    }

    /// Stamps the entry with the current time and upserts it
    ///
    /// Entries are replaced wholesale; stores happen even when lookups are
    /// disabled so a forced re-run still refreshes the file.
    pub fn store(&mut self, mut entry: RankEntry) {
        entry.timestamp = Some(Utc::now().to_rfc3339());
        self.entries.insert(entry.keyword.clone(), entry);
    }

    /// Persists the store when `processed` is a positive multiple of
    /// `interval`; an interval of 0 disables checkpointing
    pub fn checkpoint(&self, processed: usize, interval: u32) -> bool {
        if interval > 0 && processed > 0 && processed % interval as usize == 0 {
            self.flush();
            tracing::info!("Checkpoint saved: {} keywords processed", processed);
            true
        } else {
            false
        }
    }

    /// Unconditionally persists the store
    ///
    /// Save failures are logged and swallowed; the in-memory state stays
    /// usable for the rest of the run.
    pub fn flush(&self) {
        if let Some(parent) = self.path.parent() {
            if let Err(e) = std::fs::create_dir_all(parent) {
                tracing::error!("Failed to create cache directory {}: {}", parent.display(), e);
                return;
            }
        }

        let serialized = match serde_json::to_string_pretty(&self.entries) {
            Ok(serialized) => serialized,
            Err(e) => {
                tracing::error!("Failed to serialize cache: {}", e);
                return;
            }
        };

        if let Err(e) = std::fs::write(&self.path, serialized) {
            tracing::error!("Failed to save cache to {}: {}", self.path.display(), e);
        }
    }

    /// Effective TTL in hours for an entry of the given rank
    fn effective_ttl_hours(&self, rank: Rank) -> i64 {
        if !self.config.smart_ttl.enabled {
            return self.config.ttl_hours;
        }
        let smart = &self.config.smart_ttl;
        match rank {
            Rank::Ss => smart.rank_ss_ttl_hours,
            Rank::S => smart.rank_s_ttl_hours,
            Rank::A => smart.rank_a_ttl_hours,
            Rank::B => smart.rank_b_ttl_hours,
            Rank::C => smart.rank_c_ttl_hours,
            // No per-rank entry for unknowns, the base TTL applies
            Rank::Unknown => self.config.ttl_hours,
        }
    }

    /// Freshness check: a TTL of exactly 0 forces a miss, and an entry
    /// with a missing or unparseable timestamp is stale, never an error
    fn is_fresh(&self, entry: &RankEntry) -> bool {
        let Some(timestamp) = entry.timestamp.as_deref() else {
            return false;
        };
        let Ok(stored_at) = DateTime::parse_from_rfc3339(timestamp) else {
            return false;
        };

        let ttl_hours = self.effective_ttl_hours(entry.rank);
        if ttl_hours == 0 {
            return false;
        }

        Utc::now() < stored_at.with_timezone(&Utc) + Duration::hours(ttl_hours)
    }
}
