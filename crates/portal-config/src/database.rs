//! PostgreSQL connection settings.
//!
//! - `DATABASE_URL`: connection string (required)
//! - `DATABASE_MAX_CONNECTIONS`: pool size (default 10)
//! - `DATABASE_ACQUIRE_TIMEOUT_SECS`: wait for a free connection (default 5)
//! - `DATABASE_RUN_MIGRATIONS`: apply `migrations/` on startup (default true)

use std::env;
use std::time::Duration;

use crate::{env_flag, env_or};

#[derive(Clone, Debug)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub acquire_timeout: Duration,
    pub run_migrations: bool,
}

impl DatabaseConfig {
    /// # Errors
    ///
    /// Returns an error message when `DATABASE_URL` is not set.
    pub fn from_env() -> Result<Self, String> {
        let url = env::var("DATABASE_URL").map_err(|_| "DATABASE_URL must be set".to_string())?;

        Ok(Self {
            url,
            max_connections: env_or("DATABASE_MAX_CONNECTIONS", 10),
            acquire_timeout: Duration::from_secs(env_or("DATABASE_ACQUIRE_TIMEOUT_SECS", 5)),
            run_migrations: env_flag("DATABASE_RUN_MIGRATIONS", true),
        })
    }
}
