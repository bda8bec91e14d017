//! Shared minimum-interval rate limiter
//!
//! Every external call acquires the limiter before sending, so the rate
//! seen by third-party services never exceeds one call per configured
//! interval regardless of how callers are structured.

use crate::config::RateLimitConfig;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

/// Minimum-interval limiter shared by all provider clients
///
/// The slot is claimed while the internal lock is held, so concurrent
/// callers queue up and each waits out the full interval from the previous
/// caller's claim.
#[derive(Debug)]
pub struct RateLimiter {
    interval: Duration,
    last_call: Mutex<Option<Instant>>,
}

impl RateLimiter {
    /// Creates a limiter with the given minimum interval between calls
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_call: Mutex::new(None),
        }
    }

    /// Creates a limiter from the configured wait-seconds value
    pub fn from_config(config: &RateLimitConfig) -> Self {
        Self::new(Duration::from_secs_f64(config.wait_seconds))
    }

    /// Waits until the configured interval has elapsed since the previous
    /// call, then claims the slot
    pub async fn acquire(&self) {
        let mut last_call = self.last_call.lock().await;
        if let Some(previous) = *last_call {
            let elapsed = previous.elapsed();
            if elapsed < self.interval {
                tokio::time::sleep(self.interval - elapsed).await;
            }
        }
        *last_call = Some(Instant::now());
    }
}
