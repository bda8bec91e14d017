use crate::config::types::{Config, PatternConfig, WordGroup};
use crate::ConfigError;
use std::collections::HashSet;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_rate_limit(config)?;
    validate_mining(config)?;
    validate_ranking(config)?;
    validate_sniper(config)?;
    validate_cache(config)?;
    validate_output(config)?;
    validate_providers(config)?;
    validate_word_groups(&config.word_groups)?;
    validate_patterns(config)?;
    Ok(())
}

fn validate_rate_limit(config: &Config) -> Result<(), ConfigError> {
    let wait = config.rate_limit.wait_seconds;
    if !wait.is_finite() || wait < 0.0 {
        return Err(ConfigError::Validation(format!(
            "rate-limit.wait-seconds must be a non-negative number, got {}",
            wait
        )));
    }
    Ok(())
}

fn validate_mining(config: &Config) -> Result<(), ConfigError> {
    if config.mining.max_recursion_depth < 1 {
        return Err(ConfigError::Validation(format!(
            "mining.max-recursion-depth must be >= 1, got {}",
            config.mining.max_recursion_depth
        )));
    }
    Ok(())
}

fn validate_ranking(config: &Config) -> Result<(), ConfigError> {
    for (key, value) in [
        ("rank-s-days", config.ranking.rank_s_days),
        ("rank-a-days", config.ranking.rank_a_days),
        ("rank-b-days", config.ranking.rank_b_days),
    ] {
        if value < 1 {
            return Err(ConfigError::Validation(format!(
                "ranking.{} must be a positive integer, got {}",
                key, value
            )));
        }
    }
    Ok(())
}

fn validate_sniper(config: &Config) -> Result<(), ConfigError> {
    if config.sniper.max_competitors < 1 {
        return Err(ConfigError::Validation(format!(
            "sniper.max-competitors must be >= 1, got {}",
            config.sniper.max_competitors
        )));
    }
    if config.sniper.hours_threshold < 1 {
        return Err(ConfigError::Validation(format!(
            "sniper.hours-threshold must be >= 1, got {}",
            config.sniper.hours_threshold
        )));
    }
    Ok(())
}

fn validate_cache(config: &Config) -> Result<(), ConfigError> {
    if config.cache.path.is_empty() {
        return Err(ConfigError::Validation(
            "cache.path cannot be empty".to_string(),
        ));
    }
    let ttl = &config.cache.smart_ttl;
    for (key, value) in [
        ("ttl-hours", config.cache.ttl_hours),
        ("smart-ttl.rank-ss-ttl-hours", ttl.rank_ss_ttl_hours),
        ("smart-ttl.rank-s-ttl-hours", ttl.rank_s_ttl_hours),
        ("smart-ttl.rank-a-ttl-hours", ttl.rank_a_ttl_hours),
        ("smart-ttl.rank-b-ttl-hours", ttl.rank_b_ttl_hours),
        ("smart-ttl.rank-c-ttl-hours", ttl.rank_c_ttl_hours),
    ] {
        if value < 0 {
            return Err(ConfigError::Validation(format!(
                "cache.{} must be >= 0 hours, got {}",
                key, value
            )));
        }
    }
    Ok(())
}

fn validate_output(config: &Config) -> Result<(), ConfigError> {
    if config.output.csv_dir.is_empty() {
        return Err(ConfigError::Validation(
            "output.csv-dir cannot be empty".to_string(),
        ));
    }
    Ok(())
}

fn validate_providers(config: &Config) -> Result<(), ConfigError> {
    for (key, value) in [
        ("suggest-url", &config.providers.suggest_url),
        ("search-url", &config.providers.search_url),
    ] {
        Url::parse(value).map_err(|e| {
            ConfigError::InvalidUrl(format!("providers.{} '{}': {}", key, value, e))
        })?;
    }
    // Empty trends-url disables the provider, anything else must parse
    if !config.providers.trends_url.is_empty() {
        Url::parse(&config.providers.trends_url).map_err(|e| {
            ConfigError::InvalidUrl(format!(
                "providers.trends-url '{}': {}",
                config.providers.trends_url, e
            ))
        })?;
    }
    Ok(())
}

fn validate_word_groups(groups: &[WordGroup]) -> Result<(), ConfigError> {
    let mut ids = HashSet::new();
    for group in groups {
        if group.id.is_empty() {
            return Err(ConfigError::Validation(
                "word-group id cannot be empty".to_string(),
            ));
        }
        if !ids.insert(group.id.as_str()) {
            return Err(ConfigError::Validation(format!(
                "duplicate word-group id '{}'",
                group.id
            )));
        }
        if group.words.iter().all(|w| w.trim().is_empty()) {
            return Err(ConfigError::Validation(format!(
                "word-group '{}' has no words",
                group.id
            )));
        }
    }
    Ok(())
}

fn validate_patterns(config: &Config) -> Result<(), ConfigError> {
    let mut ids = HashSet::new();
    for pattern in &config.patterns {
        if pattern.id.is_empty() {
            return Err(ConfigError::Validation(
                "pattern id cannot be empty".to_string(),
            ));
        }
        if !ids.insert(pattern.id.as_str()) {
            return Err(ConfigError::Validation(format!(
                "duplicate pattern id '{}'",
                pattern.id
            )));
        }
        validate_pattern(pattern, config)?;
    }
    Ok(())
}

fn validate_pattern(pattern: &PatternConfig, config: &Config) -> Result<(), ConfigError> {
    if !pattern.run_multiple.is_empty() {
        for ref_id in &pattern.run_multiple {
            let referenced = config.pattern(ref_id).ok_or_else(|| {
                ConfigError::Validation(format!(
                    "pattern '{}' references unknown pattern '{}'",
                    pattern.id, ref_id
                ))
            })?;
            if !referenced.run_multiple.is_empty() {
                return Err(ConfigError::Validation(format!(
                    "pattern '{}' references composite pattern '{}'; \
                     run-multiple cannot nest",
                    pattern.id, ref_id
                )));
            }
        }
        return Ok(());
    }

    match pattern.mining_mode.as_deref() {
        Some("smart-recursive") => {
            for (key, value) in [("root", &pattern.root), ("filter", &pattern.filter)] {
                let group_id = value.as_deref().ok_or_else(|| {
                    ConfigError::Validation(format!(
                        "pattern '{}' (smart-recursive) is missing '{}'",
                        pattern.id, key
                    ))
                })?;
                if config.word_group(group_id).is_none() {
                    return Err(ConfigError::Validation(format!(
                        "pattern '{}' {} '{}' is not a word-group id",
                        pattern.id, key, group_id
                    )));
                }
            }
            Ok(())
        }
        Some("brute-force") => {
            if pattern.combination.is_empty() {
                return Err(ConfigError::Validation(format!(
                    "pattern '{}' (brute-force) has an empty combination",
                    pattern.id
                )));
            }
            for group_id in &pattern.combination {
                if config.word_group(group_id).is_none() {
                    return Err(ConfigError::Validation(format!(
                        "pattern '{}' combination '{}' is not a word-group id",
                        pattern.id, group_id
                    )));
                }
            }
            Ok(())
        }
        other => Err(ConfigError::Validation(format!(
            "pattern '{}' has invalid mining-mode: {:?}",
            pattern.id, other
        ))),
    }
}
