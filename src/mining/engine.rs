//! Smart recursive suggestion mining
//!
//! The engine walks suggestion space depth by depth with an explicit
//! frontier rather than call-stack recursion, so stack usage is bounded
//! regardless of the configured depth. A single seen set spans the whole
//! traversal: a keyword is fetched at most once, first claim wins.

use crate::progress::{CancelToken, ProgressEvent, ProgressSink};
use crate::providers::SuggestionSource;
use std::collections::HashSet;

/// Depth-bounded branch-expand-and-filter suggestion crawler
pub struct MiningEngine<'a, S> {
    source: &'a S,
    max_depth: u32,
}

impl<'a, S: SuggestionSource> MiningEngine<'a, S> {
    pub fn new(source: &'a S, max_depth: u32) -> Self {
        Self { source, max_depth }
    }

    /// Runs the smart recursive search from `roots`
    ///
    /// Depth 0 keeps only filter-matched suggestions; deeper levels keep
    /// every suggestion but expand only the filter-matched subset. The
    /// returned list is deduplicated in first-discovery order, and a
    /// keyword that was itself fetched never re-enters the results.
    ///
    /// Fetches are issued at depths `0..max_depth`; the cancel token is
    /// checked before each fetch.
    pub async fn smart_recursive(
        &self,
        roots: &[String],
        filters: &[String],
        progress: &dyn ProgressSink,
        cancel: &CancelToken,
    ) -> Vec<String> {
        // Claimed keywords: a fetch has been issued (or skipped as a
        // duplicate claim) for these
        let mut seen: HashSet<String> = HashSet::new();
        // Output dedup, separate from the claim set
        let mut emitted: HashSet<String> = HashSet::new();
        let mut results: Vec<String> = Vec::new();
        let mut frontier: Vec<String> = roots.to_vec();

        progress.event(ProgressEvent::MiningStarted {
            roots: roots.len(),
            filters: filters.len(),
            max_depth: self.max_depth,
        });

        for depth in 0..self.max_depth {
            if frontier.is_empty() {
                break;
            }
            if depth > 0 {
                progress.event(ProgressEvent::DepthAdvanced {
                    depth,
                    max_depth: self.max_depth,
                    branches: frontier.len(),
                });
            }

            let total = frontier.len();
            let mut next_frontier = Vec::new();

            for (index, keyword) in frontier.iter().enumerate() {
                if cancel.is_requested() {
                    progress.event(ProgressEvent::Cancelled);
                    return results;
                }

                // Claim before fetch; a keyword queued by several branches
                // is fetched by whichever claim lands first
                if !seen.insert(keyword.clone()) {
                    continue;
                }

                progress.event(ProgressEvent::FetchingSuggestions {
                    depth,
                    max_depth: self.max_depth,
                    keyword: keyword.clone(),
                    index: index + 1,
                    total,
                });

                let suggestions = self.source.fetch(keyword).await;
                let matched = filter_by_keywords(&suggestions, filters);

                if depth == 0 {
                    tracing::info!(
                        "depth 1: '{}' -> {} suggestions, {} filter matches",
                        keyword,
                        suggestions.len(),
                        matched.len()
                    );
                } else {
                    // Past the first level the whole suggestion list counts
                    // as a discovery; only matched branches expand further
                    for suggestion in &suggestions {
                        if !seen.contains(suggestion) && emitted.insert(suggestion.clone()) {
                            results.push(suggestion.clone());
                        }
                    }
                }

                for matched_keyword in matched {
                    if seen.contains(&matched_keyword) {
                        continue;
                    }
                    if emitted.insert(matched_keyword.clone()) {
                        results.push(matched_keyword.clone());
                    }
                    next_frontier.push(matched_keyword);
                }
            }

            frontier = next_frontier;
        }

        results
    }
}

/// Keeps the suggestions that contain any filter keyword as a substring
pub fn filter_by_keywords(suggestions: &[String], filters: &[String]) -> Vec<String> {
    suggestions
        .iter()
        .filter(|suggestion| filters.iter().any(|f| suggestion.contains(f.as_str())))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::NullSink;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Suggestion source with canned responses and a fetch log
    struct ScriptedSource {
        responses: HashMap<String, Vec<String>>,
        calls: Mutex<Vec<String>>,
    }

    impl ScriptedSource {
        fn new(entries: &[(&str, &[&str])]) -> Self {
            let responses = entries
                .iter()
                .map(|(k, v)| {
                    (
                        k.to_string(),
                        v.iter().map(|s| s.to_string()).collect::<Vec<_>>(),
                    )
                })
                .collect();
            Self {
                responses,
                calls: Mutex::new(Vec::new()),
            }
        }

        fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl SuggestionSource for ScriptedSource {
        async fn fetch(&self, keyword: &str) -> Vec<String> {
            self.calls.lock().unwrap().push(keyword.to_string());
            self.responses.get(keyword).cloned().unwrap_or_default()
        }
    }

    fn words(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn scripted_tree() -> ScriptedSource {
        ScriptedSource::new(&[
            ("a", &["ax1", "b", "x a"]),
            ("ax1", &["foo", "x deep"]),
            ("x a", &["bar"]),
            ("x deep", &["x deeper"]),
        ])
    }

    #[tokio::test]
    async fn test_depth0_keeps_only_filter_matches() {
        let source = scripted_tree();
        let engine = MiningEngine::new(&source, 1);
        let results = engine
            .smart_recursive(&words(&["a"]), &words(&["x"]), &NullSink, &CancelToken::new())
            .await;

        // "b" came back at depth 0 but matches no filter
        assert_eq!(results, words(&["ax1", "x a"]));
        assert_eq!(source.call_count(), 1);
    }

    #[tokio::test]
    async fn test_deeper_levels_keep_all_suggestions() {
        let source = scripted_tree();
        let engine = MiningEngine::new(&source, 3);
        let results = engine
            .smart_recursive(&words(&["a"]), &words(&["x"]), &NullSink, &CancelToken::new())
            .await;

        assert_eq!(
            results,
            words(&["ax1", "x a", "foo", "x deep", "bar", "x deeper"])
        );
        // a, ax1, "x a", "x deep" - "x deeper" is discovered but never fetched
        assert_eq!(source.calls(), words(&["a", "ax1", "x a", "x deep"]));
    }

    #[tokio::test]
    async fn test_depth_bound_stops_fetches() {
        let source = scripted_tree();
        let engine = MiningEngine::new(&source, 2);
        let results = engine
            .smart_recursive(&words(&["a"]), &words(&["x"]), &NullSink, &CancelToken::new())
            .await;

        // "x deeper" is only discoverable through the depth-2 fetch
        assert!(!results.contains(&"x deeper".to_string()));
        assert_eq!(source.call_count(), 3);
    }

    #[tokio::test]
    async fn test_overlapping_branches_dedup_first_discovery() {
        let source = ScriptedSource::new(&[
            ("a", &["x shared", "x one"]),
            ("b", &["x shared", "x two"]),
            ("x shared", &[]),
            ("x one", &[]),
            ("x two", &[]),
        ]);
        let engine = MiningEngine::new(&source, 2);
        let results = engine
            .smart_recursive(
                &words(&["a", "b"]),
                &words(&["x"]),
                &NullSink,
                &CancelToken::new(),
            )
            .await;

        assert_eq!(results, words(&["x shared", "x one", "x two"]));
        // The shared branch is claimed once, fetched once
        assert_eq!(source.call_count(), 5);
    }

    #[tokio::test]
    async fn test_claimed_keyword_never_reenters_results() {
        let source = ScriptedSource::new(&[
            ("a", &["bx"]),
            ("b", &["c"]),
            ("bx", &["b", "y x"]),
            ("y x", &[]),
        ]);
        let engine = MiningEngine::new(&source, 3);
        let results = engine
            .smart_recursive(
                &words(&["a", "b"]),
                &words(&["x"]),
                &NullSink,
                &CancelToken::new(),
            )
            .await;

        // "b" was fetched as a root, so its reappearance as a suggestion
        // is dropped from the results
        assert_eq!(results, words(&["bx", "y x"]));
    }

    #[tokio::test]
    async fn test_duplicate_roots_fetched_once() {
        let source = ScriptedSource::new(&[("a", &["x hit"]), ("x hit", &[])]);
        let engine = MiningEngine::new(&source, 2);
        let results = engine
            .smart_recursive(
                &words(&["a", "a"]),
                &words(&["x"]),
                &NullSink,
                &CancelToken::new(),
            )
            .await;

        assert_eq!(results, words(&["x hit"]));
        assert_eq!(source.calls(), words(&["a", "x hit"]));
    }

    #[tokio::test]
    async fn test_cancel_stops_before_next_fetch() {
        let source = scripted_tree();
        let engine = MiningEngine::new(&source, 3);
        let cancel = CancelToken::new();
        cancel.request();

        let results = engine
            .smart_recursive(&words(&["a"]), &words(&["x"]), &NullSink, &cancel)
            .await;

        assert!(results.is_empty());
        assert_eq!(source.call_count(), 0);
    }

    #[test]
    fn test_filter_by_keywords_substring_match() {
        let suggestions = words(&["ghosted by boyfriend", "wedding", "painful breakup"]);
        let filters = words(&["ghosted", "painful"]);
        assert_eq!(
            filter_by_keywords(&suggestions, &filters),
            words(&["ghosted by boyfriend", "painful breakup"])
        );
    }

    #[test]
    fn test_filter_with_no_filters_matches_nothing() {
        let suggestions = words(&["anything"]);
        assert!(filter_by_keywords(&suggestions, &[]).is_empty());
    }
}
