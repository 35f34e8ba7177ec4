//! # Portal Config
//!
//! Configuration structures loaded from environment variables:
//!
//! - [`jwt`]: token signing secret, expiry and leeway
//! - [`database`]: PostgreSQL connection settings
//! - [`cors`]: allowed browser origins
//! - [`rate_limit`]: login rate limiting
//! - [`gate`]: feature access gate mode and route table
//! - [`server`]: listen address
//!
//! # Example
//!
//! ```ignore
//! use portal_config::{GateConfig, JwtConfig};
//!
//! let jwt_config = JwtConfig::from_env();
//! let gate_config = GateConfig::from_env();
//! ```

pub mod cors;
pub mod database;
pub mod gate;
pub mod jwt;
pub mod rate_limit;
pub mod server;

pub use cors::CorsConfig;
pub use database::DatabaseConfig;
pub use gate::{GateConfig, GateMode};
pub use jwt::JwtConfig;
pub use rate_limit::RateLimitConfig;
pub use server::ServerConfig;

/// Reads an environment variable and parses it, falling back to `default`
/// when it is unset or unparseable.
pub(crate) fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

/// Reads a boolean flag; accepts `true`/`1` and `false`/`0` in any case.
pub(crate) fn env_flag(key: &str, default: bool) -> bool {
    match std::env::var(key) {
        Ok(v) if v.eq_ignore_ascii_case("true") || v == "1" => true,
        Ok(v) if v.eq_ignore_ascii_case("false") || v == "0" => false,
        _ => default,
    }
}
