//! Custom Search API client
//!
//! Provides the two query classes the rank cascade needs: a
//! title-restricted count (`allintitle:`) and a date-windowed search
//! (`dateRestrict=dN`). Transport, HTTP, and parse failures all degrade to
//! sentinels; the pipeline never sees an error from here.

use crate::config::{ProviderConfig, TimeoutConfig};
use crate::providers::{QueryCount, RateLimiter, SearchItem, SearchProvider, WindowedResult};
use std::sync::Arc;
use std::time::Duration;

/// Search client for the Google Custom Search JSON API
pub struct CustomSearchClient {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    engine_id: String,
    count_timeout: Duration,
    window_timeout: Duration,
    limiter: Arc<RateLimiter>,
}

impl CustomSearchClient {
    pub fn new(
        client: reqwest::Client,
        providers: &ProviderConfig,
        timeouts: &TimeoutConfig,
        limiter: Arc<RateLimiter>,
    ) -> Self {
        Self {
            client,
            endpoint: providers.search_url.clone(),
            api_key: providers.api_key.clone(),
            engine_id: providers.search_engine_id.clone(),
            count_timeout: Duration::from_secs(timeouts.count_api),
            window_timeout: Duration::from_secs(timeouts.window_api),
            limiter,
        }
    }

    async fn request(
        &self,
        query: &str,
        date_restrict: Option<String>,
        timeout: Duration,
    ) -> Result<serde_json::Value, String> {
        self.limiter.acquire().await;

        let mut request = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("key", self.api_key.as_str()),
                ("cx", self.engine_id.as_str()),
                ("q", query),
            ])
            .timeout(timeout);

        if let Some(restrict) = date_restrict {
            request = request.query(&[("dateRestrict", restrict.as_str())]);
        }

        let response = request
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| e.to_string())?;

        response
            .json::<serde_json::Value>()
            .await
            .map_err(|e| e.to_string())
    }
}

impl SearchProvider for CustomSearchClient {
    async fn title_count(&self, keyword: &str) -> QueryCount {
        let query = format!("allintitle:{}", keyword);
        match self.request(&query, None, self.count_timeout).await {
            Ok(payload) => match parse_total_results(&payload) {
                Some(total) => {
                    tracing::debug!("allintitle '{}': {} results", keyword, total);
                    QueryCount::Exact(total)
                }
                None => {
                    tracing::warn!("Unparseable allintitle payload for '{}'", keyword);
                    QueryCount::Failed
                }
            },
            Err(e) => {
                tracing::warn!("allintitle request failed for '{}': {}", keyword, e);
                QueryCount::Failed
            }
        }
    }

    async fn windowed_query(&self, keyword: &str, days: u32) -> WindowedResult {
        let restrict = format!("d{}", days);
        match self.request(keyword, Some(restrict), self.window_timeout).await {
            Ok(payload) => match parse_total_results(&payload) {
                Some(total) => WindowedResult {
                    count: QueryCount::Exact(total),
                    items: parse_items(&payload),
                },
                None => {
                    tracing::warn!("Unparseable windowed payload for '{}' ({}d)", keyword, days);
                    WindowedResult::failed()
                }
            },
            Err(e) => {
                tracing::warn!(
                    "Windowed request failed for '{}' ({}d): {}",
                    keyword,
                    days,
                    e
                );
                WindowedResult::failed()
            }
        }
    }
}

/// Reads `searchInformation.totalResults`
///
/// The API reports the total as a decimal string; an absent field means a
/// valid zero-result payload, an unparseable one means a bad payload.
fn parse_total_results(payload: &serde_json::Value) -> Option<u64> {
    match payload.pointer("/searchInformation/totalResults") {
        None => Some(0),
        Some(value) => {
            if let Some(s) = value.as_str() {
                s.parse().ok()
            } else {
                value.as_u64()
            }
        }
    }
}

fn parse_items(payload: &serde_json::Value) -> Vec<SearchItem> {
    let Some(items) = payload.get("items").and_then(|v| v.as_array()) else {
        return Vec::new();
    };

    items
        .iter()
        .map(|item| {
            let field = |key: &str| {
                item.get(key)
                    .and_then(|v| v.as_str())
                    .unwrap_or("")
                    .to_string()
            };
            SearchItem {
                title: field("title"),
                url: field("link"),
                domain: field("displayLink"),
            }
        })
        .collect()
}
