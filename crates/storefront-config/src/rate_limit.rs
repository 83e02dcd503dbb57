//! Rate limiting configuration for API endpoints.
//!
//! Requests are limited per client IP with a token bucket (Governor):
//! tokens are replenished at `per_second`, at most `burst_size` accumulate,
//! and a request that finds the bucket empty gets `429 Too Many Requests`.
//!
//! # Configuration
//!
//! - `RATE_LIMIT_ENABLED`: `false` disables the layer entirely (default: true)
//! - `RATE_LIMIT_PER_SECOND`: Seconds between token replenishments (default: 1)
//! - `RATE_LIMIT_BURST_SIZE`: Maximum bucket size (default: 100)
//!
//! The client IP is taken from `X-Forwarded-For`, `X-Real-Ip` or `Forwarded`
//! when present, then from the peer address, so the server must be started
//! with connect info.

use governor::middleware::NoOpMiddleware;
use tower_governor::governor::{GovernorConfig, GovernorConfigBuilder};
use tower_governor::key_extractor::SmartIpKeyExtractor;

use crate::env_parse;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RateLimitConfig {
    pub enabled: bool,

    /// Interval, in seconds, at which one token is added back to the bucket.
    pub per_second: u64,

    /// Maximum number of tokens that can accumulate.
    pub burst_size: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            per_second: 1,
            burst_size: 100,
        }
    }
}

impl RateLimitConfig {
    /// Falls back to defaults for unset or unparsable variables.
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            enabled: env_parse("RATE_LIMIT_ENABLED").unwrap_or(defaults.enabled),
            per_second: env_parse("RATE_LIMIT_PER_SECOND").unwrap_or(defaults.per_second),
            burst_size: env_parse("RATE_LIMIT_BURST_SIZE").unwrap_or(defaults.burst_size),
        }
    }

    #[must_use]
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    /// Builds the Governor config keyed by client IP.
    ///
    /// Returns `None` when the limiter is disabled or the values are rejected
    /// by Governor (a zero period or burst size).
    #[must_use]
    pub fn governor_config(&self) -> Option<GovernorConfig<SmartIpKeyExtractor, NoOpMiddleware>> {
        if !self.enabled {
            return None;
        }

        GovernorConfigBuilder::default()
            .key_extractor(SmartIpKeyExtractor)
            .per_second(self.per_second)
            .burst_size(self.burst_size)
            .finish()
    }
}
