//! Rate limiting for the login endpoint.
//!
//! # Environment Variables
//!
//! - `RATE_LIMIT_AUTH_PER_SECOND`: replenish rate (default 10)
//! - `RATE_LIMIT_AUTH_BURST_SIZE`: requests allowed at once (default 5)
//! - `RATE_LIMIT_TRUST_PROXY`: key clients on `X-Forwarded-For` / `X-Real-IP`
//!   instead of the socket peer (default `false`). Only enable behind a
//!   reverse proxy that overwrites those headers.

use governor::middleware::NoOpMiddleware;
use tower_governor::governor::{GovernorConfig, GovernorConfigBuilder};
use tower_governor::key_extractor::{PeerIpKeyExtractor, SmartIpKeyExtractor};

use crate::{env_flag, env_or};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RateLimitConfig {
    /// Requests per second for auth endpoints
    pub auth_per_second: u32,
    /// Burst size for auth endpoints
    pub auth_burst_size: u32,
    /// Whether forwarding headers identify the client
    pub trust_proxy: bool,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            auth_per_second: 10,
            auth_burst_size: 5,
            trust_proxy: false,
        }
    }
}

impl RateLimitConfig {
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            auth_per_second: env_or("RATE_LIMIT_AUTH_PER_SECOND", defaults.auth_per_second),
            auth_burst_size: env_or("RATE_LIMIT_AUTH_BURST_SIZE", defaults.auth_burst_size),
            trust_proxy: env_flag("RATE_LIMIT_TRUST_PROXY", defaults.trust_proxy),
        }
    }

    /// Milliseconds between replenished requests. Zero rates count as one per second.
    fn replenish_ms(&self) -> u64 {
        (1000 / u64::from(self.auth_per_second.max(1))).max(1)
    }

    fn burst(&self) -> u32 {
        self.auth_burst_size.max(1)
    }

    /// Login limiter keyed on the socket peer address.
    #[must_use]
    pub fn auth_governor_config(&self) -> Option<GovernorConfig<PeerIpKeyExtractor, NoOpMiddleware>> {
        GovernorConfigBuilder::default()
            .per_millisecond(self.replenish_ms())
            .burst_size(self.burst())
            .key_extractor(PeerIpKeyExtractor)
            .finish()
    }

    /// Login limiter keyed on forwarding headers, falling back to the peer.
    #[must_use]
    pub fn proxied_auth_governor_config(
        &self,
    ) -> Option<GovernorConfig<SmartIpKeyExtractor, NoOpMiddleware>> {
        GovernorConfigBuilder::default()
            .per_millisecond(self.replenish_ms())
            .burst_size(self.burst())
            .key_extractor(SmartIpKeyExtractor)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RateLimitConfig::default();
        assert_eq!(config.auth_per_second, 10);
        assert_eq!(config.auth_burst_size, 5);
        assert!(!config.trust_proxy);
    }

    #[test]
    fn test_replenish_interval() {
        let config = RateLimitConfig {
            auth_per_second: 4,
            ..RateLimitConfig::default()
        };
        assert_eq!(config.replenish_ms(), 250);

        let fast = RateLimitConfig {
            auth_per_second: 5000,
            ..RateLimitConfig::default()
        };
        assert_eq!(fast.replenish_ms(), 1);
    }

    #[test]
    fn test_zero_values_still_build() {
        let config = RateLimitConfig {
            auth_per_second: 0,
            auth_burst_size: 0,
            trust_proxy: false,
        };
        assert_eq!(config.replenish_ms(), 1000);
        assert_eq!(config.burst(), 1);
        assert!(config.auth_governor_config().is_some());
        assert!(config.proxied_auth_governor_config().is_some());
    }
}
