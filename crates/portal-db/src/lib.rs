//! # Portal DB
//!
//! Database pool, schema migrations and the access-control data accessors.
//!
//! # Example
//!
//! ```ignore
//! use portal_config::DatabaseConfig;
//! use portal_db::{init_db_pool, run_migrations};
//!
//! let config = DatabaseConfig::from_env()?;
//! let pool = init_db_pool(&config).await?;
//! run_migrations(&pool).await?;
//! ```

pub mod store;

use portal_config::DatabaseConfig;
use sqlx::migrate::MigrateError;
use sqlx::postgres::PgPoolOptions;

pub use sqlx::PgPool;
pub use store::{
    AccessControlStore, InMemoryAccessControlStore, InMemoryStudentDirectory,
    PgAccessControlStore, PgStudentDirectory, StoreError, StoreResult, StudentDirectory,
    insert_access_control,
};

/// Connects a PostgreSQL pool sized from `config`.
///
/// The pool is owned by the application state and closed explicitly on shutdown.
pub async fn init_db_pool(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(config.acquire_timeout)
        .connect(&config.url)
        .await
}

/// Builds a pool that only connects on first use.
///
/// Used by tests and tooling that never touch the database.
pub fn lazy_db_pool(url: &str) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new().max_connections(1).connect_lazy(url)
}

/// Applies the SQL files under `migrations/`.
pub async fn run_migrations(pool: &PgPool) -> Result<(), MigrateError> {
    sqlx::migrate!("../../migrations").run(pool).await
}

fn has_sqlstate(err: &sqlx::Error, sqlstate: &str) -> bool {
    if let sqlx::Error::Database(db_err) = err {
        return db_err.code().map(|code| code == sqlstate).unwrap_or(false);
    }
    false
}

/// True for PostgreSQL `unique_violation` (SQLSTATE 23505).
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    has_sqlstate(err, "23505")
}

/// True for PostgreSQL `foreign_key_violation` (SQLSTATE 23503).
pub fn is_foreign_key_violation(err: &sqlx::Error) -> bool {
    has_sqlstate(err, "23503")
}
