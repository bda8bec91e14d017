//! Per-keyword rank classification
//!
//! The classifier runs the staged query pipeline: allintitle count, an
//! optional competition short-circuit, then the windowed cascade under the
//! monotonic assumption that a window with no results implies no results
//! in any longer window. Failed counts branch like nonzero values here;
//! a provider outage therefore drifts keywords toward C rather than
//! raising errors.

use crate::config::Config;
use crate::providers::{QueryCount, SearchProvider, WindowedResult};
use crate::ranking::{window_label, Rank, RankEntry};
use std::collections::BTreeMap;

/// Classifies keywords by competitive opportunity
pub struct RankClassifier<'a, P> {
    search: &'a P,
    config: &'a Config,
}

impl<'a, P: SearchProvider> RankClassifier<'a, P> {
    pub fn new(search: &'a P, config: &'a Config) -> Self {
        Self { search, config }
    }

    /// Runs the full classification pipeline for one keyword
    ///
    /// The returned entry carries no timestamp; the cache stamps it.
    pub async fn classify(&self, keyword: &str) -> RankEntry {
        let allintitle = self.search.title_count(keyword).await;

        // Competition cap: confirmed counts above the cap are a C without
        // spending any windowed queries
        let cap = self.config.filtering.max_allintitle_results;
        if cap > 0 && allintitle.exceeds(cap) {
            tracing::debug!(
                "'{}' exceeds allintitle cap ({} > {}), rank C",
                keyword,
                allintitle.as_i64(),
                cap
            );
            return RankEntry {
                keyword: keyword.to_string(),
                allintitle_count: allintitle,
                rank: Rank::C,
                recent_results: BTreeMap::new(),
                timestamp: None,
            };
        }

        let recent_results = self.fetch_windows(keyword).await;
        let rank = self.determine_rank(keyword, allintitle, &recent_results);

        RankEntry {
            keyword: keyword.to_string(),
            allintitle_count: allintitle,
            rank,
            recent_results,
            timestamp: None,
        }
    }

    /// Fetches the windowed results, skipping windows the monotonic
    /// assumption already answers: no change in N days means no change in
    /// any longer window, so those are synthesized as confirmed-empty
    async fn fetch_windows(&self, keyword: &str) -> BTreeMap<String, WindowedResult> {
        let ranking = &self.config.ranking;
        let mut windows = BTreeMap::new();

        // Sniper needs the 1-day signal regardless of the cascade
        if self.config.sniper.enabled {
            windows.insert(window_label(1), self.search.windowed_query(keyword, 1).await);
        }

        let b_window = self.search.windowed_query(keyword, ranking.rank_b_days).await;
        let b_is_zero = b_window.count.is_zero();
        windows.insert(window_label(ranking.rank_b_days), b_window);

        if b_is_zero {
            windows.insert(window_label(ranking.rank_a_days), WindowedResult::empty());
            windows.insert(window_label(ranking.rank_s_days), WindowedResult::empty());
        } else {
            let a_window = self.search.windowed_query(keyword, ranking.rank_a_days).await;
            let a_is_zero = a_window.count.is_zero();
            windows.insert(window_label(ranking.rank_a_days), a_window);

            if a_is_zero {
                windows.insert(window_label(ranking.rank_s_days), WindowedResult::empty());
            } else {
                windows.insert(
                    window_label(ranking.rank_s_days),
                    self.search.windowed_query(keyword, ranking.rank_s_days).await,
                );
            }
        }

        windows
    }

    /// Applies the rank rules in strict priority order
    fn determine_rank(
        &self,
        keyword: &str,
        allintitle: QueryCount,
        windows: &BTreeMap<String, WindowedResult>,
    ) -> Rank {
        let ranking = &self.config.ranking;
        let sniper = &self.config.sniper;

        // SS: low confirmed competition plus fresh allowlisted activity
        if sniper.enabled && allintitle.in_range(1, sniper.max_competitors) {
            if let Some(one_day) = windows.get(&window_label(1)) {
                if one_day.count.is_positive()
                    && domains_all_match(one_day, &sniper.target_domains)
                {
                    tracing::info!("SS rank (sniper): '{}'", keyword);
                    return Rank::Ss;
                }
            }
        }

        if allintitle.is_zero() {
            tracing::debug!("S rank (zero competition): '{}'", keyword);
            return Rank::S;
        }

        if window_is_zero(windows, ranking.rank_s_days) {
            tracing::debug!("S rank ({}d stale): '{}'", ranking.rank_s_days, keyword);
            return Rank::S;
        }

        if window_is_zero(windows, ranking.rank_a_days) {
            tracing::debug!("A rank ({}d stale): '{}'", ranking.rank_a_days, keyword);
            return Rank::A;
        }

        if window_is_zero(windows, ranking.rank_b_days) {
            tracing::debug!("B rank ({}d stale): '{}'", ranking.rank_b_days, keyword);
            return Rank::B;
        }

        tracing::debug!("C rank: '{}'", keyword);
        Rank::C
    }
}

/// A missing window reads as empty, matching the cascade's synthesis
fn window_is_zero(windows: &BTreeMap<String, WindowedResult>, days: u32) -> bool {
    windows
        .get(&window_label(days))
        .map(|w| w.count.is_zero())
        .unwrap_or(true)
}

/// True when every item's domain contains at least one allowlisted domain
/// as a substring; an empty item list never matches
fn domains_all_match(window: &WindowedResult, target_domains: &[String]) -> bool {
    if window.items.is_empty() {
        return false;
    }
    window.items.iter().all(|item| {
        target_domains
            .iter()
            .any(|target| item.domain.contains(target.as_str()))
    })
}
