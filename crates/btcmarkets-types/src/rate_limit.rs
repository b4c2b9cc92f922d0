//! Client-side rate limit settings for BTC Markets
//!
//! BTC Markets publishes two call-rate classes: most endpoints allow 10 calls
//! per 10 seconds, a handful of cheap order endpoints allow 25 calls per 10
//! seconds. Each class is paced by its own rate gate, configured here as a
//! steady-state permit interval plus a burst capacity.

use std::fmt;
use std::time::Duration;

/// Configuration for a single rate gate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateGateConfig {
    /// Minimum time between two permits
    pub interval: Duration,
    /// Maximum number of permits that can be banked
    pub burst: u32,
}

impl RateGateConfig {
    /// Create a new rate gate configuration
    pub const fn new(interval: Duration, burst: u32) -> Self {
        Self { interval, burst }
    }

    /// Configuration allowing `calls` calls per `window`, with a burst of `calls`
    pub fn per_window(calls: u32, window: Duration) -> Self {
        let interval = if calls == 0 { window } else { window / calls };
        Self::new(interval, calls)
    }

    /// Long-run average calls per second
    pub fn calls_per_second(&self) -> f64 {
        if self.interval.is_zero() {
            return f64::INFINITY;
        }
        1.0 / self.interval.as_secs_f64()
    }
}

/// Rate class an endpoint belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RateClass {
    /// 10 calls per 10 seconds
    Restricted,
    /// 25 calls per 10 seconds
    Frequent,
}

impl RateClass {
    /// Both classes
    pub const ALL: [RateClass; 2] = [Self::Restricted, Self::Frequent];

    /// Get the configuration for this class from the rate limit config
    pub fn get_config(self, config: &RateLimitConfig) -> RateGateConfig {
        match self {
            Self::Restricted => config.restricted,
            Self::Frequent => config.frequent,
        }
    }

    /// Short name used in logs
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Restricted => "restricted",
            Self::Frequent => "frequent",
        }
    }
}

impl fmt::Display for RateClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rate limit configuration for both BTC Markets rate classes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimitConfig {
    /// 10 calls / 10 seconds endpoints
    pub restricted: RateGateConfig,
    /// 25 calls / 10 seconds endpoints
    pub frequent: RateGateConfig,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self::btcmarkets_defaults()
    }
}

impl RateLimitConfig {
    /// Window over which BTC Markets counts calls
    pub const WINDOW: Duration = Duration::from_secs(10);

    /// Limits as documented by BTC Markets
    pub fn btcmarkets_defaults() -> Self {
        Self {
            // 1 permit per second, up to 10 banked
            restricted: RateGateConfig::per_window(10, Self::WINDOW),
            // 1 permit per 400ms, up to 25 banked
            frequent: RateGateConfig::per_window(25, Self::WINDOW),
        }
    }

    /// Create a very permissive configuration (for testing)
    pub fn permissive() -> Self {
        Self {
            restricted: RateGateConfig::new(Duration::from_millis(1), 1000),
            frequent: RateGateConfig::new(Duration::from_millis(1), 1000),
        }
    }

    /// Replace the configuration of one class
    pub fn with_class(mut self, class: RateClass, config: RateGateConfig) -> Self {
        match class {
            RateClass::Restricted => self.restricted = config,
            RateClass::Frequent => self.frequent = config,
        }
        self
    }
}
