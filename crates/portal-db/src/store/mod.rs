//! Access-control data accessors.
//!
//! The gate and the admin handlers read and write access records only through
//! these traits, so the policy can be exercised against [`memory`] stores in
//! tests and against [`postgres`] in production.

use async_trait::async_trait;
use portal_models::{AccessControlRecord, NewAccessControl, UpdateAccessControl};
use thiserror::Error;

pub mod memory;
pub mod postgres;

pub use memory::{InMemoryAccessControlStore, InMemoryStudentDirectory};
pub use postgres::{PgAccessControlStore, PgStudentDirectory, insert_access_control};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Database(#[from] sqlx::Error),
    #[error("store unavailable: {0}")]
    Unavailable(String),
    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait AccessControlStore: Send + Sync {
    /// The record for `student_id`, if one exists.
    async fn fetch_by_student_id(&self, student_id: i64)
    -> StoreResult<Option<AccessControlRecord>>;

    /// Applies a partial update in one step. `None` when no record has `update.id`.
    async fn update(&self, update: &UpdateAccessControl) -> StoreResult<Option<AccessControlRecord>>;

    /// Returns the student's record, creating it from `defaults` when missing.
    /// An existing record is returned unchanged.
    async fn ensure_for_student(
        &self,
        student_id: i64,
        defaults: NewAccessControl,
    ) -> StoreResult<AccessControlRecord>;
}

/// Resolves the account in a token to the student it belongs to.
#[async_trait]
pub trait StudentDirectory: Send + Sync {
    async fn student_id_for_user(&self, user_id: i64) -> StoreResult<Option<i64>>;
}
