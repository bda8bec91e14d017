//! External data providers
//!
//! This module defines the trait seam between the mining/ranking core and
//! the third-party services it consumes, plus the reqwest-backed clients
//! implementing those traits. The core never performs HTTP itself; every
//! boundary call returns a plain value and failures degrade to sentinels
//! or empty results.

mod limiter;
mod search;
mod suggest;
mod trends;

pub use limiter::RateLimiter;
pub use search::CustomSearchClient;
pub use suggest::GoogleSuggestClient;
pub use trends::DailyTrendsClient;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::time::Duration;

/// A search-result count from a provider
///
/// `Failed` is the tagged form of the wire sentinel `-1` and persists as
/// such. In the rank cascade a failed count branches like a nonzero value
/// but never like a positive one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryCount {
    Exact(u64),
    Failed,
}

impl QueryCount {
    /// True only for a confirmed zero; `Failed` is not zero
    pub fn is_zero(&self) -> bool {
        matches!(self, QueryCount::Exact(0))
    }

    /// True only for a confirmed count greater than zero
    pub fn is_positive(&self) -> bool {
        matches!(self, QueryCount::Exact(n) if *n > 0)
    }

    /// True only for a confirmed count strictly above `threshold`
    pub fn exceeds(&self, threshold: u64) -> bool {
        matches!(self, QueryCount::Exact(n) if *n > threshold)
    }

    /// True only for a confirmed count within `[lo, hi]`
    pub fn in_range(&self, lo: u64, hi: u64) -> bool {
        matches!(self, QueryCount::Exact(n) if *n >= lo && *n <= hi)
    }

    /// External integer form: the count, or -1 for a failed query
    pub fn as_i64(&self) -> i64 {
        match self {
            QueryCount::Exact(n) => *n as i64,
            QueryCount::Failed => -1,
        }
    }
}

impl Serialize for QueryCount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(self.as_i64())
    }
}

impl<'de> Deserialize<'de> for QueryCount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = i64::deserialize(deserializer)?;
        if value < 0 {
            if value != -1 {
                return Err(D::Error::custom(format!(
                    "invalid count sentinel: {}",
                    value
                )));
            }
            Ok(QueryCount::Failed)
        } else {
            Ok(QueryCount::Exact(value as u64))
        }
    }
}

/// One result item of a windowed search query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchItem {
    pub title: String,
    pub url: String,
    pub domain: String,
}

/// Result of a time-windowed search query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowedResult {
    pub count: QueryCount,
    pub items: Vec<SearchItem>,
}

impl WindowedResult {
    /// A confirmed-empty window, synthesized without querying
    pub fn empty() -> Self {
        Self {
            count: QueryCount::Exact(0),
            items: Vec::new(),
        }
    }

    /// The degraded form of a provider failure
    pub fn failed() -> Self {
        Self {
            count: QueryCount::Failed,
            items: Vec::new(),
        }
    }
}

/// Source of autocomplete suggestions for a keyword
///
/// Implementations must exclude the literal input keyword (trimmed exact
/// match) and return an empty list on any failure.
pub trait SuggestionSource {
    fn fetch(&self, keyword: &str) -> impl std::future::Future<Output = Vec<String>> + Send;
}

/// Source of search-result counts and windowed queries
pub trait SearchProvider {
    /// Count of pages whose title matches the whole keyword
    fn title_count(&self, keyword: &str)
        -> impl std::future::Future<Output = QueryCount> + Send;

    /// Search restricted to results from the last `days` days
    fn windowed_query(
        &self,
        keyword: &str,
        days: u32,
    ) -> impl std::future::Future<Output = WindowedResult> + Send;
}

/// Source of currently trending keywords
pub trait TrendSource {
    fn top(&self, limit: usize) -> impl std::future::Future<Output = Vec<String>> + Send;
}

/// Builds the HTTP client shared by all provider implementations
///
/// Per-call timeouts are applied per request from the configured call-class
/// values, so the client itself carries only the connect timeout.
pub fn build_http_client() -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder()
        .user_agent(concat!("demand-miner/", env!("CARGO_PKG_VERSION")))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}
