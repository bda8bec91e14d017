//! Trending keyword client
//!
//! Pulls rising queries from the daily-trends endpoint. The payload is JSON
//! behind an XSSI guard prefix that has to be stripped before parsing. The
//! provider is optional: any failure, or an empty endpoint in the config,
//! yields an empty list and mining proceeds without trend words.

use crate::config::{ProviderConfig, TimeoutConfig};
use crate::providers::{RateLimiter, TrendSource};
use std::sync::Arc;
use std::time::Duration;

const XSSI_PREFIX: &str = ")]}',";

/// Client for the daily trends endpoint
pub struct DailyTrendsClient {
    client: reqwest::Client,
    endpoint: String,
    language: String,
    timeout: Duration,
    limiter: Arc<RateLimiter>,
}

impl DailyTrendsClient {
    pub fn new(
        client: reqwest::Client,
        providers: &ProviderConfig,
        timeouts: &TimeoutConfig,
        limiter: Arc<RateLimiter>,
    ) -> Self {
        Self {
            client,
            endpoint: providers.trends_url.clone(),
            language: providers.language.clone(),
            timeout: Duration::from_secs(timeouts.trends_api),
            limiter,
        }
    }

    async fn request(&self) -> Result<String, String> {
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("hl", self.language.as_str()), ("geo", "JP"), ("tz", "-540")])
            .timeout(self.timeout)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| e.to_string())?;

        response.text().await.map_err(|e| e.to_string())
    }
}

impl TrendSource for DailyTrendsClient {
    async fn top(&self, limit: usize) -> Vec<String> {
        self.limiter.acquire().await;

        let body = match self.request().await {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!("Trend request failed: {}", e);
                return Vec::new();
            }
        };

        let keywords = parse_trending(&body, limit);
        if keywords.is_empty() {
            tracing::warn!("Trend payload contained no trending searches");
        } else {
            tracing::info!("Fetched {} trending keywords", keywords.len());
        }
        keywords
    }
}

/// Extracts rising query titles from the daily-trends payload
fn parse_trending(body: &str, limit: usize) -> Vec<String> {
    let json_body = body.strip_prefix(XSSI_PREFIX).unwrap_or(body);
    let Ok(payload) = serde_json::from_str::<serde_json::Value>(json_body) else {
        return Vec::new();
    };

    let Some(days) = payload
        .pointer("/default/trendingSearchesDays")
        .and_then(|v| v.as_array())
    else {
        return Vec::new();
    };

    let mut keywords = Vec::new();
    for day in days {
        let Some(searches) = day.get("trendingSearches").and_then(|v| v.as_array()) else {
            continue;
        };
        for search in searches {
            if let Some(query) = search.pointer("/title/query").and_then(|v| v.as_str()) {
                keywords.push(query.to_string());
                if keywords.len() >= limit {
                    return keywords;
                }
            }
        }
    }
    keywords
}
