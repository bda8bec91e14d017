use serde::Deserialize;

/// Main configuration structure for Demand-Miner
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(rename = "rate-limit", default)]
    pub rate_limit: RateLimitConfig,
    #[serde(default)]
    pub timeouts: TimeoutConfig,
    #[serde(default)]
    pub mining: MiningConfig,
    #[serde(default)]
    pub ranking: RankingConfig,
    #[serde(default)]
    pub sniper: SniperConfig,
    #[serde(default)]
    pub filtering: FilteringConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub batch: BatchConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub providers: ProviderConfig,
    #[serde(rename = "word-group", default)]
    pub word_groups: Vec<WordGroup>,
    #[serde(rename = "pattern", default)]
    pub patterns: Vec<PatternConfig>,
}

/// Rate limit applied to every external call
#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitConfig {
    /// Minimum interval between external calls (seconds)
    #[serde(rename = "wait-seconds", default = "default_wait_seconds")]
    pub wait_seconds: f64,
}

/// Per-call-class timeouts (seconds)
#[derive(Debug, Clone, Deserialize)]
pub struct TimeoutConfig {
    #[serde(rename = "suggest-api", default = "default_suggest_timeout")]
    pub suggest_api: u64,

    /// Allintitle count queries
    #[serde(rename = "count-api", default = "default_search_timeout")]
    pub count_api: u64,

    /// Time-windowed search queries
    #[serde(rename = "window-api", default = "default_search_timeout")]
    pub window_api: u64,

    #[serde(rename = "trends-api", default = "default_trends_timeout")]
    pub trends_api: u64,
}

/// Suggestion mining configuration
#[derive(Debug, Clone, Deserialize)]
pub struct MiningConfig {
    /// Maximum recursion depth for smart recursive search
    #[serde(rename = "max-recursion-depth", default = "default_max_depth")]
    pub max_recursion_depth: u32,
}

/// Day thresholds for the windowed rank cascade
#[derive(Debug, Clone, Deserialize)]
pub struct RankingConfig {
    #[serde(rename = "rank-s-days", default = "default_rank_s_days")]
    pub rank_s_days: u32,

    #[serde(rename = "rank-a-days", default = "default_rank_a_days")]
    pub rank_a_days: u32,

    #[serde(rename = "rank-b-days", default = "default_rank_b_days")]
    pub rank_b_days: u32,
}

/// Sniper mode (aggressive SS-rank detection)
#[derive(Debug, Clone, Deserialize)]
pub struct SniperConfig {
    #[serde(default)]
    pub enabled: bool,

    /// Upper bound on the allintitle count for an SS candidate
    #[serde(rename = "max-competitors", default = "default_max_competitors")]
    pub max_competitors: u64,

    /// Recency window the SS signal is meant to capture (hours)
    #[serde(rename = "hours-threshold", default = "default_hours_threshold")]
    pub hours_threshold: u32,

    /// Domains whose activity qualifies a keyword for SS
    #[serde(rename = "target-domains", default)]
    pub target_domains: Vec<String>,
}

/// Pre-classification filtering
#[derive(Debug, Clone, Deserialize)]
pub struct FilteringConfig {
    /// Allintitle count above which a keyword is ranked C without any
    /// windowed queries. 0 disables the short-circuit.
    #[serde(rename = "max-allintitle-results", default)]
    pub max_allintitle_results: u64,
}

/// Result cache configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Base TTL in hours, used when smart TTL is disabled or the rank has
    /// no per-rank entry
    #[serde(rename = "ttl-hours", default = "default_ttl_hours")]
    pub ttl_hours: i64,

    /// Path of the persisted cache file
    #[serde(default = "default_cache_path")]
    pub path: String,

    #[serde(rename = "smart-ttl", default)]
    pub smart_ttl: SmartTtlConfig,
}

/// Per-rank cache freshness policy
#[derive(Debug, Clone, Deserialize)]
pub struct SmartTtlConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(rename = "rank-ss-ttl-hours", default)]
    pub rank_ss_ttl_hours: i64,

    #[serde(rename = "rank-s-ttl-hours", default)]
    pub rank_s_ttl_hours: i64,

    #[serde(rename = "rank-a-ttl-hours", default = "default_rank_a_ttl")]
    pub rank_a_ttl_hours: i64,

    #[serde(rename = "rank-b-ttl-hours", default = "default_rank_b_ttl")]
    pub rank_b_ttl_hours: i64,

    #[serde(rename = "rank-c-ttl-hours", default = "default_rank_c_ttl")]
    pub rank_c_ttl_hours: i64,
}

/// Batch processing configuration
#[derive(Debug, Clone, Deserialize)]
pub struct BatchConfig {
    /// Persist the cache every N processed keywords. 0 disables
    /// checkpointing.
    #[serde(rename = "checkpoint-interval", default = "default_checkpoint_interval")]
    pub checkpoint_interval: u32,
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Directory for result CSV files
    #[serde(rename = "csv-dir", default = "default_csv_dir")]
    pub csv_dir: String,
}

/// External provider endpoints and credentials
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderConfig {
    #[serde(rename = "suggest-url", default = "default_suggest_url")]
    pub suggest_url: String,

    #[serde(rename = "search-url", default = "default_search_url")]
    pub search_url: String,

    /// Empty disables the trend provider entirely
    #[serde(rename = "trends-url", default = "default_trends_url")]
    pub trends_url: String,

    /// Custom Search API key; empty means the search provider is
    /// unconfigured and keywords are recorded with an unknown rank
    #[serde(rename = "api-key", default)]
    pub api_key: String,

    #[serde(rename = "search-engine-id", default)]
    pub search_engine_id: String,

    /// Interface language passed to the suggestion endpoint
    #[serde(default = "default_language")]
    pub language: String,
}

/// Named ordered word list, referenced by id from patterns
#[derive(Debug, Clone, Deserialize)]
pub struct WordGroup {
    pub id: String,

    #[serde(default)]
    pub name: Option<String>,

    pub words: Vec<String>,
}

/// Raw pattern entry as declared in the config file
///
/// Exactly one of the three shapes must hold: `mining-mode =
/// "smart-recursive"` with `root`/`filter`, `mining-mode = "brute-force"`
/// with `combination`, or `run-multiple` referencing other pattern ids.
#[derive(Debug, Clone, Deserialize)]
pub struct PatternConfig {
    pub id: String,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(rename = "mining-mode", default)]
    pub mining_mode: Option<String>,

    #[serde(default)]
    pub root: Option<String>,

    #[serde(default)]
    pub filter: Option<String>,

    #[serde(default)]
    pub combination: Vec<String>,

    #[serde(rename = "use-trend", default)]
    pub use_trend: bool,

    #[serde(rename = "run-multiple", default)]
    pub run_multiple: Vec<String>,
}

impl Config {
    /// Looks up a word group by id
    pub fn word_group(&self, id: &str) -> Option<&WordGroup> {
        self.word_groups.iter().find(|g| g.id == id)
    }

    /// Looks up a pattern by id
    pub fn pattern(&self, id: &str) -> Option<&PatternConfig> {
        self.patterns.iter().find(|p| p.id == id)
    }
}

impl PatternConfig {
    /// Display label for summaries and the CSV route column
    pub fn label(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.id)
    }
}

impl ProviderConfig {
    /// Whether the search provider has usable credentials
    pub fn search_configured(&self) -> bool {
        !self.api_key.is_empty() && !self.search_engine_id.is_empty()
    }

    /// Whether the trend provider is enabled at all
    pub fn trends_configured(&self) -> bool {
        !self.trends_url.is_empty()
    }
}

fn default_wait_seconds() -> f64 {
    1.0
}

fn default_suggest_timeout() -> u64 {
    10
}

fn default_search_timeout() -> u64 {
    15
}

fn default_trends_timeout() -> u64 {
    20
}

fn default_max_depth() -> u32 {
    3
}

fn default_rank_s_days() -> u32 {
    90
}

fn default_rank_a_days() -> u32 {
    30
}

fn default_rank_b_days() -> u32 {
    7
}

fn default_max_competitors() -> u64 {
    5
}

fn default_hours_threshold() -> u32 {
    24
}

fn default_true() -> bool {
    true
}

fn default_ttl_hours() -> i64 {
    24
}

fn default_cache_path() -> String {
    "./cache/keyword_cache.json".to_string()
}

fn default_rank_a_ttl() -> i64 {
    24
}

fn default_rank_b_ttl() -> i64 {
    48
}

fn default_rank_c_ttl() -> i64 {
    168
}

fn default_checkpoint_interval() -> u32 {
    100
}

fn default_csv_dir() -> String {
    "./output".to_string()
}

fn default_suggest_url() -> String {
    "https://suggestqueries.google.com/complete/search".to_string()
}

fn default_search_url() -> String {
    "https://www.googleapis.com/customsearch/v1".to_string()
}

fn default_trends_url() -> String {
    "https://trends.google.com/trends/api/dailytrends".to_string()
}

fn default_language() -> String {
    "ja".to_string()
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            wait_seconds: default_wait_seconds(),
        }
    }
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            suggest_api: default_suggest_timeout(),
            count_api: default_search_timeout(),
            window_api: default_search_timeout(),
            trends_api: default_trends_timeout(),
        }
    }
}

impl Default for MiningConfig {
    fn default() -> Self {
        Self {
            max_recursion_depth: default_max_depth(),
        }
    }
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            rank_s_days: default_rank_s_days(),
            rank_a_days: default_rank_a_days(),
            rank_b_days: default_rank_b_days(),
        }
    }
}

impl Default for SniperConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            max_competitors: default_max_competitors(),
            hours_threshold: default_hours_threshold(),
            target_domains: Vec::new(),
        }
    }
}

impl Default for FilteringConfig {
    fn default() -> Self {
        Self {
            max_allintitle_results: 0,
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            ttl_hours: default_ttl_hours(),
            path: default_cache_path(),
            smart_ttl: SmartTtlConfig::default(),
        }
    }
}

impl Default for SmartTtlConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            rank_ss_ttl_hours: 0,
            rank_s_ttl_hours: 0,
            rank_a_ttl_hours: default_rank_a_ttl(),
            rank_b_ttl_hours: default_rank_b_ttl(),
            rank_c_ttl_hours: default_rank_c_ttl(),
        }
    }
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            checkpoint_interval: default_checkpoint_interval(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            csv_dir: default_csv_dir(),
        }
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            suggest_url: default_suggest_url(),
            search_url: default_search_url(),
            trends_url: default_trends_url(),
            api_key: String::new(),
            search_engine_id: String::new(),
            language: default_language(),
        }
    }
}
