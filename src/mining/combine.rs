//! Brute-force combination generation
//!
//! Builds the cartesian product of word groups in group order (with an
//! optional trend group prefixed) and sweeps a single suggestion level
//! over the combinations. No size cap is enforced; callers bound the
//! input groups.

use crate::progress::{CancelToken, ProgressEvent, ProgressSink};
use crate::providers::SuggestionSource;
use std::collections::HashSet;

/// Generates every combination of the given word groups
///
/// Combinations are the selected words joined by single spaces, ordered
/// with the last group varying fastest. An empty group yields no
/// combinations at all.
pub fn brute_force_combinations(
    word_groups: &[Vec<String>],
    trend_words: Option<&[String]>,
) -> Vec<String> {
    let mut all_groups: Vec<&[String]> = Vec::new();
    if let Some(trends) = trend_words {
        if !trends.is_empty() {
            all_groups.push(trends);
        }
    }
    for group in word_groups {
        all_groups.push(group);
    }

    if all_groups.is_empty() || all_groups.iter().any(|g| g.is_empty()) {
        return Vec::new();
    }

    let sizes: Vec<usize> = all_groups.iter().map(|g| g.len()).collect();
    let total: usize = sizes.iter().product();
    let mut combinations = Vec::with_capacity(total);
    let mut indices = vec![0usize; all_groups.len()];

    loop {
        let keyword = all_groups
            .iter()
            .zip(&indices)
            .map(|(group, &i)| group[i].as_str())
            .collect::<Vec<_>>()
            .join(" ");
        combinations.push(keyword);

        // Odometer increment, rightmost position first
        let mut position = indices.len();
        loop {
            if position == 0 {
                tracing::info!("Generated {} brute-force combinations", combinations.len());
                return combinations;
            }
            position -= 1;
            indices[position] += 1;
            if indices[position] < sizes[position] {
                break;
            }
            indices[position] = 0;
        }
    }
}

/// Fetches one suggestion level for every combination and merges the
/// results with first-seen-wins deduplication
pub async fn fetch_suggestions_for_combinations<S: SuggestionSource>(
    source: &S,
    keywords: &[String],
    progress: &dyn ProgressSink,
    cancel: &CancelToken,
) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut merged = Vec::new();
    let total = keywords.len();

    progress.event(ProgressEvent::CombinationSweep {
        combinations: total,
    });

    for (index, keyword) in keywords.iter().enumerate() {
        if cancel.is_requested() {
            progress.event(ProgressEvent::Cancelled);
            break;
        }

        progress.event(ProgressEvent::FetchingSuggestions {
            depth: 0,
            max_depth: 1,
            keyword: keyword.clone(),
            index: index + 1,
            total,
        });

        for suggestion in source.fetch(keyword).await {
            if seen.insert(suggestion.clone()) {
                merged.push(suggestion);
            }
        }
    }

    merged
}
