//! Application configuration.
//!
//! Aggregates the per-concern settings from `portal-config`, all loaded from
//! environment variables (and `.env` via `dotenvy`). See each type for
//! variable names and defaults.

use anyhow::anyhow;
use portal_config::{
    CorsConfig, DatabaseConfig, GateConfig, JwtConfig, RateLimitConfig, ServerConfig,
};

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    pub cors: CorsConfig,
    pub rate_limit: RateLimitConfig,
    pub gate: GateConfig,
}

impl AppConfig {
    /// # Errors
    ///
    /// Fails when `DATABASE_URL` is missing or the gate settings are malformed.
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            server: ServerConfig::from_env(),
            database: DatabaseConfig::from_env().map_err(|e| anyhow!(e))?,
            jwt: JwtConfig::from_env(),
            cors: CorsConfig::from_env(),
            rate_limit: RateLimitConfig::from_env(),
            gate: GateConfig::from_env().map_err(|e| anyhow!(e))?,
        })
    }
}
