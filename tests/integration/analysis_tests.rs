//! End-to-end pipeline tests against mock provider endpoints

use demand_miner::output::KeywordRecord;
use demand_miner::pipeline::run_analysis;
use demand_miner::progress::{NullSink, ProgressEvent, ProgressSink};
use demand_miner::ranking::Rank;
use demand_miner::{CancelToken, Config};
use serde_json::json;
use std::sync::Mutex;
use tempfile::TempDir;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SUGGEST_PATH: &str = "/complete/search";
const SEARCH_PATH: &str = "/customsearch/v1";

/// Builds a config pointing both providers at the mock server
fn test_config(server_uri: &str, cache_dir: &TempDir, with_credentials: bool) -> Config {
    let credentials = if with_credentials {
        "api-key = \"test-key\"\nsearch-engine-id = \"test-cx\"\n"
    } else {
        ""
    };
    let toml = format!(
        r#"
[rate-limit]
wait-seconds = 0.0

[mining]
max-recursion-depth = 2

[providers]
suggest-url = "{uri}{suggest}"
search-url = "{uri}{search}"
trends-url = ""
{credentials}

[cache]
path = "{cache}"

[batch]
checkpoint-interval = 1

[[word-group]]
id = "seeds"
words = ["a"]

[[word-group]]
id = "filters"
words = ["x"]

[[pattern]]
id = "route-a"
name = "Smart recursive"
mining-mode = "smart-recursive"
root = "seeds"
filter = "filters"
"#,
        uri = server_uri,
        suggest = SUGGEST_PATH,
        search = SEARCH_PATH,
        credentials = credentials,
        cache = cache_dir.path().join("keyword_cache.json").display(),
    );
    toml::from_str(&toml).expect("test config must parse")
}

/// Mounts a suggestion response for one keyword
async fn mock_suggestions(server: &MockServer, keyword: &str, suggestions: &[&str]) {
    Mock::given(method("GET"))
        .and(path(SUGGEST_PATH))
        .and(query_param("q", keyword))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([keyword, suggestions])))
        .mount(server)
        .await;
}

/// Mounts an allintitle count for one keyword
async fn mock_allintitle(server: &MockServer, keyword: &str, total: &str) {
    Mock::given(method("GET"))
        .and(path(SEARCH_PATH))
        .and(query_param("q", format!("allintitle:{}", keyword)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "searchInformation": {"totalResults": total}
        })))
        .mount(server)
        .await;
}

/// Mounts a windowed search result for one keyword and window
async fn mock_window(server: &MockServer, keyword: &str, days: u32, total: &str, domains: &[&str]) {
    let items: Vec<_> = domains
        .iter()
        .map(|d| {
            json!({
                "title": format!("Post on {}", d),
                "link": format!("https://{}/post", d),
                "displayLink": d
            })
        })
        .collect();

    Mock::given(method("GET"))
        .and(path(SEARCH_PATH))
        .and(query_param("q", keyword))
        .and(query_param("dateRestrict", format!("d{}", days)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "searchInformation": {"totalResults": total},
            "items": items
        })))
        .mount(server)
        .await;
}

fn record_for<'a>(records: &'a [KeywordRecord], keyword: &str) -> &'a KeywordRecord {
    records
        .iter()
        .find(|r| r.keyword == keyword)
        .unwrap_or_else(|| panic!("no record for '{}'", keyword))
}

/// Progress sink that collects every event
struct CollectingSink {
    events: Mutex<Vec<ProgressEvent>>,
}

impl CollectingSink {
    fn new() -> Self {
        Self {
            events: Mutex::new(Vec::new()),
        }
    }

    fn checkpoint_count(&self) -> usize {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter(|e| matches!(e, ProgressEvent::CheckpointSaved { .. }))
            .count()
    }
}

impl ProgressSink for CollectingSink {
    fn event(&self, event: ProgressEvent) {
        self.events.lock().unwrap().push(event);
    }
}

#[tokio::test]
async fn test_full_run_mines_and_classifies() {
    let server = MockServer::start().await;
    let cache_dir = TempDir::new().unwrap();

    // Mining tree: depth 0 keeps only "x one"; depth 1 discovers "x two"
    mock_suggestions(&server, "a", &["x one", "noise"]).await;
    mock_suggestions(&server, "x one", &["x two"]).await;

    // "x one": zero competition -> S (windows still probed)
    mock_allintitle(&server, "x one", "0").await;
    mock_window(&server, "x one", 7, "3", &[]).await;
    mock_window(&server, "x one", 30, "2", &[]).await;
    mock_window(&server, "x one", 90, "1", &[]).await;

    // "x two": competition present but quiet for 7 days -> B
    mock_allintitle(&server, "x two", "10").await;
    mock_window(&server, "x two", 7, "0", &[]).await;

    let config = test_config(&server.uri(), &cache_dir, true);
    let report = run_analysis(&config, "route-a", &NullSink, CancelToken::new())
        .await
        .expect("run failed");

    let keywords: Vec<&str> = report.records.iter().map(|r| r.keyword.as_str()).collect();
    assert_eq!(keywords, vec!["x one", "x two"]);

    assert_eq!(record_for(&report.records, "x one").rank, Rank::S);
    assert_eq!(record_for(&report.records, "x two").rank, Rank::B);
    assert_eq!(record_for(&report.records, "x two").allintitle_count, 10);
    assert!(report
        .records
        .iter()
        .all(|r| r.route == "Smart recursive"));
    assert_eq!(report.api_calls, 2);
    assert_eq!(report.cache_hits, 0);
}

#[tokio::test]
async fn test_monotonic_cascade_synthesizes_windows_in_cache() {
    let server = MockServer::start().await;
    let cache_dir = TempDir::new().unwrap();

    mock_suggestions(&server, "a", &["x one"]).await;
    mock_suggestions(&server, "x one", &[]).await;

    mock_allintitle(&server, "x one", "10").await;
    // Only the 7-day window is mocked; a request for 30/90 days would 404
    // and degrade to a sentinel, which would flip the expected rank
    mock_window(&server, "x one", 7, "0", &[]).await;

    let config = test_config(&server.uri(), &cache_dir, true);
    let report = run_analysis(&config, "route-a", &NullSink, CancelToken::new())
        .await
        .expect("run failed");

    assert_eq!(record_for(&report.records, "x one").rank, Rank::B);

    // The synthesized windows are persisted as confirmed-empty results
    let raw = std::fs::read_to_string(cache_dir.path().join("keyword_cache.json")).unwrap();
    let cache: serde_json::Value = serde_json::from_str(&raw).unwrap();
    let windows = &cache["x one"]["recent_results"];
    assert_eq!(windows["30d"], json!({"count": 0, "items": []}));
    assert_eq!(windows["90d"], json!({"count": 0, "items": []}));
    assert_eq!(windows["7d"]["count"], json!(0));
}

#[tokio::test]
async fn test_sniper_ss_rank_end_to_end() {
    let server = MockServer::start().await;
    let cache_dir = TempDir::new().unwrap();

    mock_suggestions(&server, "a", &["x one"]).await;
    mock_suggestions(&server, "x one", &[]).await;

    mock_allintitle(&server, "x one", "3").await;
    mock_window(&server, "x one", 1, "2", &["note.com", "blog.note.com"]).await;
    mock_window(&server, "x one", 7, "5", &[]).await;
    mock_window(&server, "x one", 30, "4", &[]).await;
    mock_window(&server, "x one", 90, "2", &[]).await;

    let mut config = test_config(&server.uri(), &cache_dir, true);
    config.sniper.enabled = true;
    config.sniper.max_competitors = 5;
    config.sniper.target_domains = vec!["note.com".to_string()];

    let report = run_analysis(&config, "route-a", &NullSink, CancelToken::new())
        .await
        .expect("run failed");

    assert_eq!(record_for(&report.records, "x one").rank, Rank::Ss);
}

#[tokio::test]
async fn test_second_run_hits_cache() {
    let server = MockServer::start().await;
    let cache_dir = TempDir::new().unwrap();

    mock_suggestions(&server, "a", &["x one"]).await;
    mock_suggestions(&server, "x one", &[]).await;

    // All windows active -> C, which caches for 168 hours
    mock_allintitle(&server, "x one", "10").await;
    mock_window(&server, "x one", 7, "3", &[]).await;
    mock_window(&server, "x one", 30, "2", &[]).await;
    mock_window(&server, "x one", 90, "1", &[]).await;

    let config = test_config(&server.uri(), &cache_dir, true);

    let first = run_analysis(&config, "route-a", &NullSink, CancelToken::new())
        .await
        .expect("first run failed");
    assert_eq!(first.api_calls, 1);
    assert_eq!(first.cache_hits, 0);
    assert_eq!(record_for(&first.records, "x one").rank, Rank::C);

    let second = run_analysis(&config, "route-a", &NullSink, CancelToken::new())
        .await
        .expect("second run failed");
    assert_eq!(second.api_calls, 0);
    assert_eq!(second.cache_hits, 1);
    assert_eq!(record_for(&second.records, "x one").rank, Rank::C);
}

#[tokio::test]
async fn test_no_cache_flag_forces_requery() {
    let server = MockServer::start().await;
    let cache_dir = TempDir::new().unwrap();

    mock_suggestions(&server, "a", &["x one"]).await;
    mock_suggestions(&server, "x one", &[]).await;
    mock_allintitle(&server, "x one", "10").await;
    mock_window(&server, "x one", 7, "3", &[]).await;
    mock_window(&server, "x one", 30, "2", &[]).await;
    mock_window(&server, "x one", 90, "1", &[]).await;

    let config = test_config(&server.uri(), &cache_dir, true);
    run_analysis(&config, "route-a", &NullSink, CancelToken::new())
        .await
        .expect("first run failed");

    // Same run with lookups disabled: everything is re-queried
    let mut no_cache = config.clone();
    no_cache.cache.enabled = false;
    let report = run_analysis(&no_cache, "route-a", &NullSink, CancelToken::new())
        .await
        .expect("no-cache run failed");

    assert_eq!(report.cache_hits, 0);
    assert_eq!(report.api_calls, 1);
}

#[tokio::test]
async fn test_provider_outage_degrades_to_sentinels() {
    let server = MockServer::start().await;
    let cache_dir = TempDir::new().unwrap();

    mock_suggestions(&server, "a", &["x one"]).await;
    mock_suggestions(&server, "x one", &[]).await;

    // Every search call fails with a server error
    Mock::given(method("GET"))
        .and(path(SEARCH_PATH))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let config = test_config(&server.uri(), &cache_dir, true);
    let report = run_analysis(&config, "route-a", &NullSink, CancelToken::new())
        .await
        .expect("run must not fail on provider errors");

    // Failed counts branch as nonzero through the cascade, landing on C
    let record = record_for(&report.records, "x one");
    assert_eq!(record.rank, Rank::C);
    assert_eq!(record.allintitle_count, -1);
}

#[tokio::test]
async fn test_unconfigured_search_records_unknown_rank() {
    let server = MockServer::start().await;
    let cache_dir = TempDir::new().unwrap();

    mock_suggestions(&server, "a", &["x one"]).await;
    mock_suggestions(&server, "x one", &[]).await;

    // Any search request would be a bug with no credentials configured
    Mock::given(method("GET"))
        .and(path(SEARCH_PATH))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let config = test_config(&server.uri(), &cache_dir, false);
    let report = run_analysis(&config, "route-a", &NullSink, CancelToken::new())
        .await
        .expect("run failed");

    let record = record_for(&report.records, "x one");
    assert_eq!(record.rank, Rank::Unknown);
    assert_eq!(record.allintitle_count, -1);
    assert_eq!(report.api_calls, 0);
}

#[tokio::test]
async fn test_checkpoint_fires_per_configured_interval() {
    let server = MockServer::start().await;
    let cache_dir = TempDir::new().unwrap();

    mock_suggestions(&server, "a", &["x one", "x two"]).await;
    mock_suggestions(&server, "x one", &[]).await;
    mock_suggestions(&server, "x two", &[]).await;

    for keyword in ["x one", "x two"] {
        mock_allintitle(&server, keyword, "10").await;
        mock_window(&server, keyword, 7, "0", &[]).await;
    }

    // checkpoint-interval = 1 in the test config: one checkpoint per miss
    let config = test_config(&server.uri(), &cache_dir, true);
    let sink = CollectingSink::new();
    let report = run_analysis(&config, "route-a", &sink, CancelToken::new())
        .await
        .expect("run failed");

    assert_eq!(report.records.len(), 2);
    assert_eq!(sink.checkpoint_count(), 2);
}

#[tokio::test]
async fn test_cancel_before_mining_yields_no_suggestions() {
    let server = MockServer::start().await;
    let cache_dir = TempDir::new().unwrap();

    mock_suggestions(&server, "a", &["x one"]).await;

    let config = test_config(&server.uri(), &cache_dir, true);
    let cancel = CancelToken::new();
    cancel.request();

    // Cancelled before any fetch: mining yields nothing and the run
    // surfaces that as an error rather than an empty report
    let result = run_analysis(&config, "route-a", &NullSink, cancel).await;
    assert!(result.is_err());
}
