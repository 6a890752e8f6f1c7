//! Per-client rate limiting.

use std::time::Duration;

use governor::{clock::QuantaInstant, middleware::NoOpMiddleware};
use tower_governor::{
    governor::{GovernorConfig, GovernorConfigBuilder},
    key_extractor::SmartIpKeyExtractor,
};

use crate::config::ServerConfig;

/// Limiter keyed by client IP (`X-Forwarded-For`, `X-Real-IP`, `Forwarded`,
/// then the peer address).
pub type RateLimitConfig = GovernorConfig<SmartIpKeyExtractor, NoOpMiddleware<QuantaInstant>>;

/// Interval after which one request of the quota is replenished.
pub fn replenish_period(requests_per_second: u32) -> Duration {
    Duration::from_secs(1) / requests_per_second.max(1)
}

/// Build the limiter from `RATE_LIMIT_REQUESTS_PER_SECOND` and
/// `RATE_LIMIT_BURST_SIZE`. Returns `None` when the burst size is zero.
pub fn rate_limit_config(config: &ServerConfig) -> Option<RateLimitConfig> {
    GovernorConfigBuilder::default()
        .period(replenish_period(config.rate_limit_requests_per_second))
        .burst_size(config.rate_limit_burst_size)
        .key_extractor(SmartIpKeyExtractor)
        .finish()
}
