//! Randomized request pacing
//!
//! A jittered pause before every outbound request keeps the crawler from
//! hammering the target host at a fixed, easily throttled rhythm.

use crate::config::PolitenessConfig;
use crate::ConfigError;
use rand::Rng;
use std::time::Duration;

/// Draws a delay uniformly from `[min, max]` before each request
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RateLimiter {
    min: Duration,
    max: Duration,
}

impl RateLimiter {
    /// Creates a limiter; bounds given in the wrong order are swapped
    pub fn new(min: Duration, max: Duration) -> Self {
        if min <= max {
            Self { min, max }
        } else {
            Self { min: max, max: min }
        }
    }

    /// Builds a limiter from delay bounds in seconds
    ///
    /// Fails on negative, non-finite, or out-of-range bounds.
    pub fn from_config(config: &PolitenessConfig) -> Result<Self, ConfigError> {
        Ok(Self::new(
            seconds("min_delay", config.min_delay)?,
            seconds("max_delay", config.max_delay)?,
        ))
    }

    /// A limiter that never waits
    pub fn disabled() -> Self {
        Self::new(Duration::ZERO, Duration::ZERO)
    }

    pub fn min(&self) -> Duration {
        self.min
    }

    pub fn max(&self) -> Duration {
        self.max
    }

    /// Draws the next delay without sleeping
    pub fn next_delay(&self) -> Duration {
        if self.min == self.max {
            return self.min;
        }
        let secs = rand::rng().random_range(self.min.as_secs_f64()..=self.max.as_secs_f64());
        Duration::try_from_secs_f64(secs)
            .unwrap_or(self.max)
            .clamp(self.min, self.max)
    }

    /// Sleeps for a freshly drawn delay
    pub async fn delay(&self) {
        let delay = self.next_delay();
        if delay.is_zero() {
            return;
        }
        tracing::trace!("Sleeping {:.2}s before next request", delay.as_secs_f64());
        tokio::time::sleep(delay).await;
    }
}

fn seconds(name: &str, value: f64) -> Result<Duration, ConfigError> {
    Duration::try_from_secs_f64(value).map_err(|e| {
        ConfigError::Validation(format!("{} of {} seconds is not usable: {}", name, value, e))
    })
}
