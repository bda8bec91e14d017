//! Autocomplete suggestion client
//!
//! Queries the suggest endpoint in the firefox client format, whose payload
//! is `[query, [suggestion, ...]]`. Any transport or parse failure degrades
//! to an empty suggestion list.

use crate::config::{ProviderConfig, TimeoutConfig};
use crate::providers::{RateLimiter, SuggestionSource};
use std::sync::Arc;
use std::time::Duration;

/// Suggestion client for the Google Suggest web endpoint
pub struct GoogleSuggestClient {
    client: reqwest::Client,
    endpoint: String,
    language: String,
    timeout: Duration,
    limiter: Arc<RateLimiter>,
}

impl GoogleSuggestClient {
    pub fn new(
        client: reqwest::Client,
        providers: &ProviderConfig,
        timeouts: &TimeoutConfig,
        limiter: Arc<RateLimiter>,
    ) -> Self {
        Self {
            client,
            endpoint: providers.suggest_url.clone(),
            language: providers.language.clone(),
            timeout: Duration::from_secs(timeouts.suggest_api),
            limiter,
        }
    }

    async fn request(&self, keyword: &str) -> Result<serde_json::Value, String> {
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("client", "firefox"),
                ("q", keyword),
                ("hl", self.language.as_str()),
            ])
            .timeout(self.timeout)
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

impl SuggestionSource for GoogleSuggestClient {
    async fn fetch(&self, keyword: &str) -> Vec<String> {
        self.limiter.acquire().await;

        let payload = match self.request(keyword).await {
            Ok(payload) => payload,
            Err(e) => {
                tracing::warn!("Suggest request failed for '{}': {}", keyword, e);
                return Vec::new();
            }
        };

        let suggestions = parse_suggestions(&payload, keyword);
        tracing::debug!("Suggest '{}' -> {} suggestions", keyword, suggestions.len());
        suggestions
    }
}

/// Extracts the suggestion list, excluding the input keyword itself
fn parse_suggestions(payload: &serde_json::Value, keyword: &str) -> Vec<String> {
    let Some(list) = payload.get(1).and_then(|v| v.as_array()) else {
        tracing::warn!("Unexpected suggest payload shape for '{}'", keyword);
        return Vec::new();
    };

    list.iter()
        .filter_map(|v| v.as_str())
        .filter(|s| s.trim() != keyword.trim())
        .map(|s| s.to_string())
        .collect()
}
