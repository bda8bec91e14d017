//! Pipeline coordinator - main analysis orchestration logic
//!
//! This module contains the run loop that ties the components together:
//! - Resolving the selected pattern (expanding run-multiple composites)
//! - Fetching trend words when a pattern wants them
//! - Mining suggestions per pattern and merging them
//! - Classifying each keyword through the cache
//! - Checkpointing and flushing the cache

use crate::cache::ResultCache;
use crate::config::{Config, PatternConfig};
use crate::mining::{
    brute_force_combinations, fetch_suggestions_for_combinations, MiningEngine, MiningPattern,
};
use crate::output::KeywordRecord;
use crate::progress::{CancelToken, ProgressEvent, ProgressSink};
use crate::providers::{
    build_http_client, CustomSearchClient, DailyTrendsClient, GoogleSuggestClient, RateLimiter,
    SearchProvider, SuggestionSource, TrendSource,
};
use crate::ranking::{RankClassifier, RankEntry};
use crate::MinerError;
use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

/// Trend words fetched per run when a pattern asks for them
const TREND_LIMIT: usize = 20;

/// Outcome of a pipeline run
#[derive(Debug, Clone)]
pub struct AnalysisReport {
    /// Stable record list in keyword discovery order
    pub records: Vec<KeywordRecord>,

    /// Keywords answered from the cache
    pub cache_hits: usize,

    /// Keywords classified through the search provider
    pub api_calls: usize,
}

/// Main pipeline coordinator
pub struct Coordinator<'a, S, P, T> {
    config: &'a Config,
    suggest: &'a S,
    search: &'a P,
    trends: Option<&'a T>,
    progress: &'a dyn ProgressSink,
    cancel: CancelToken,
}

impl<'a, S, P, T> Coordinator<'a, S, P, T>
where
    S: SuggestionSource,
    P: SearchProvider,
    T: TrendSource,
{
    pub fn new(
        config: &'a Config,
        suggest: &'a S,
        search: &'a P,
        trends: Option<&'a T>,
        progress: &'a dyn ProgressSink,
        cancel: CancelToken,
    ) -> Self {
        Self {
            config,
            suggest,
            search,
            trends,
            progress,
            cancel,
        }
    }

    /// Runs the full pipeline for the selected pattern id
    pub async fn run(&self, pattern_id: &str) -> Result<AnalysisReport, MinerError> {
        let patterns = self.resolve_patterns(pattern_id)?;
        let route_label = patterns
            .iter()
            .map(|p| p.label())
            .collect::<Vec<_>>()
            .join(", ");

        let trend_words = self.fetch_trend_words(&patterns).await;

        // Mine each pattern and merge first-seen-wins
        let mut seen = HashSet::new();
        let mut keywords = Vec::new();
        for pattern in &patterns {
            tracing::info!("Running pattern: {}", pattern.label());
            let mined = self.run_pattern(pattern, trend_words.as_deref()).await;
            tracing::info!("  pattern '{}' yielded {} suggestions", pattern.id, mined.len());
            for keyword in mined {
                if seen.insert(keyword.clone()) {
                    keywords.push(keyword);
                }
            }
        }
        tracing::info!("Total suggestions after dedup: {}", keywords.len());

        if keywords.is_empty() {
            return Err(MinerError::NoSuggestions);
        }

        self.classify_keywords(&keywords, &route_label).await
    }

    /// Resolves a pattern id into the concrete patterns to run
    ///
    /// Composite patterns expand to their referenced patterns in
    /// declaration order; validation guarantees the references resolve
    /// and do not nest.
    fn resolve_patterns(&self, pattern_id: &str) -> Result<Vec<&'a PatternConfig>, MinerError> {
        let pattern = self
            .config
            .pattern(pattern_id)
            .ok_or_else(|| MinerError::UnknownPattern(pattern_id.to_string()))?;

        if pattern.run_multiple.is_empty() {
            return Ok(vec![pattern]);
        }

        Ok(pattern
            .run_multiple
            .iter()
            .filter_map(|id| self.config.pattern(id))
            .collect())
    }

    /// Fetches trend words once if any pattern wants them and a trend
    /// provider is available
    async fn fetch_trend_words(&self, patterns: &[&PatternConfig]) -> Option<Vec<String>> {
        if !patterns.iter().any(|p| p.use_trend) {
            return None;
        }
        let Some(trends) = self.trends else {
            tracing::warn!("Pattern requests trend words but no trend provider is configured");
            return None;
        };

        self.progress.event(ProgressEvent::FetchingTrends);
        let words = trends.top(TREND_LIMIT).await;
        if words.is_empty() {
            tracing::warn!("Trend fetch returned no keywords");
            None
        } else {
            tracing::info!("Using {} trend words", words.len());
            Some(words)
        }
    }

    /// Runs one mining pattern
    async fn run_pattern(
        &self,
        pattern: &PatternConfig,
        trend_words: Option<&[String]>,
    ) -> Vec<String> {
        match self.resolve_mining_pattern(pattern) {
            MiningPattern::SmartRecursive {
                root,
                filter,
                max_depth,
            } => {
                let engine = MiningEngine::new(self.suggest, max_depth);
                engine
                    .smart_recursive(&root, &filter, self.progress, &self.cancel)
                    .await
            }
            MiningPattern::BruteForce { groups, use_trend } => {
                let trends = if use_trend { trend_words } else { None };
                let combinations = brute_force_combinations(&groups, trends);
                fetch_suggestions_for_combinations(
                    self.suggest,
                    &combinations,
                    self.progress,
                    &self.cancel,
                )
                .await
            }
        }
    }

    /// Expands word-group references into a concrete mining pattern
    fn resolve_mining_pattern(&self, pattern: &PatternConfig) -> MiningPattern {
        let group_words = |id: &Option<String>| {
            id.as_deref()
                .and_then(|id| self.config.word_group(id))
                .map(|g| g.words.clone())
                .unwrap_or_default()
        };

        if pattern.mining_mode.as_deref() == Some("smart-recursive") {
            MiningPattern::SmartRecursive {
                root: group_words(&pattern.root),
                filter: group_words(&pattern.filter),
                max_depth: self.config.mining.max_recursion_depth,
            }
        } else {
            MiningPattern::BruteForce {
                groups: pattern
                    .combination
                    .iter()
                    .filter_map(|id| self.config.word_group(id))
                    .map(|g| g.words.clone())
                    .collect(),
                use_trend: pattern.use_trend,
            }
        }
    }

    /// Classifies every keyword through the cache, checkpointing as
    /// configured, and flushes the cache at the end
    async fn classify_keywords(
        &self,
        keywords: &[String],
        route_label: &str,
    ) -> Result<AnalysisReport, MinerError> {
        let mut cache = ResultCache::load(
            Path::new(&self.config.cache.path),
            self.config.cache.clone(),
        );
        let classifier = RankClassifier::new(self.search, self.config);
        let interval = self.config.batch.checkpoint_interval;
        let search_configured = self.config.providers.search_configured();

        let mut records = Vec::new();
        let mut cache_hits = 0;
        let mut api_calls = 0;
        let total = keywords.len();

        for (index, keyword) in keywords.iter().enumerate() {
            if self.cancel.is_requested() {
                self.progress.event(ProgressEvent::Cancelled);
                break;
            }

            self.progress.event(ProgressEvent::AnalyzingKeyword {
                keyword: keyword.clone(),
                index: index + 1,
                total,
            });

            if let Some(cached) = cache.lookup(keyword) {
                records.push(to_record(cached, route_label));
                cache_hits += 1;
                continue;
            }

            let entry = if search_configured {
                api_calls += 1;
                classifier.classify(keyword).await
            } else {
                // Record the discovery anyway; rank stays unknown until a
                // search provider is configured
                RankEntry::unknown(keyword)
            };

            records.push(to_record(&entry, route_label));
            cache.store(entry);

            if cache.checkpoint(index + 1, interval) {
                self.progress.event(ProgressEvent::CheckpointSaved {
                    processed: index + 1,
                });
            }
        }

        cache.flush();
        tracing::info!(
            "Run complete: {} records, {} cache hits, {} API classifications",
            records.len(),
            cache_hits,
            api_calls
        );

        Ok(AnalysisReport {
            records,
            cache_hits,
            api_calls,
        })
    }
}

fn to_record(entry: &RankEntry, route_label: &str) -> KeywordRecord {
    KeywordRecord {
        keyword: entry.keyword.clone(),
        rank: entry.rank,
        allintitle_count: entry.allintitle_count.as_i64(),
        route: route_label.to_string(),
    }
}

/// Runs a full analysis with the production provider clients
///
/// Builds the shared HTTP client and rate limiter, wires up the provider
/// implementations, and hands off to the [`Coordinator`].
pub async fn run_analysis(
    config: &Config,
    pattern_id: &str,
    progress: &dyn ProgressSink,
    cancel: CancelToken,
) -> Result<AnalysisReport, MinerError> {
    let client = build_http_client()?;
    let limiter = Arc::new(RateLimiter::from_config(&config.rate_limit));

    let suggest = GoogleSuggestClient::new(
        client.clone(),
        &config.providers,
        &config.timeouts,
        limiter.clone(),
    );
    let search = CustomSearchClient::new(
        client.clone(),
        &config.providers,
        &config.timeouts,
        limiter.clone(),
    );
    let trends = DailyTrendsClient::new(client, &config.providers, &config.timeouts, limiter);
    let trends_ref = if config.providers.trends_configured() {
        Some(&trends)
    } else {
        None
    };

    let coordinator = Coordinator::new(config, &suggest, &search, trends_ref, progress, cancel);
    coordinator.run(pattern_id).await
}
