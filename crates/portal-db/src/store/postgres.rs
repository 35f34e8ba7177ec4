//! PostgreSQL-backed stores.

use async_trait::async_trait;
use portal_models::{AccessControlRecord, NewAccessControl, UpdateAccessControl};
use sqlx::{PgExecutor, PgPool};
use tracing::instrument;

use super::{AccessControlStore, StoreResult, StudentDirectory};

const RECORD_COLUMNS: &str = "id, student_id, status, access_course, access_library, \
                              access_exams, created_at, updated_at";

/// Inserts the access record for `student_id` unless one already exists, and
/// returns whichever record is stored afterwards.
///
/// Takes any executor so admission acceptance can call it inside its transaction.
pub async fn insert_access_control<'e, E>(
    executor: E,
    student_id: i64,
    defaults: NewAccessControl,
) -> Result<AccessControlRecord, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    let sql = format!(
        "WITH inserted AS ( \
             INSERT INTO access_control (student_id, status, access_course, access_library, access_exams) \
             VALUES ($1, $2, $3, $4, $5) \
             ON CONFLICT (student_id) DO NOTHING \
             RETURNING {cols} \
         ) \
         SELECT {cols} FROM inserted \
         UNION ALL \
         SELECT {cols} FROM access_control \
         WHERE student_id = $1 AND NOT EXISTS (SELECT 1 FROM inserted)",
        cols = RECORD_COLUMNS
    );

    sqlx::query_as::<_, AccessControlRecord>(&sql)
        .bind(student_id)
        .bind(defaults.status)
        .bind(defaults.access_course)
        .bind(defaults.access_library)
        .bind(defaults.access_exams)
        .fetch_one(executor)
        .await
}

#[derive(Clone, Debug)]
pub struct PgAccessControlStore {
    pool: PgPool,
}

impl PgAccessControlStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AccessControlStore for PgAccessControlStore {
    #[instrument(skip(self))]
    async fn fetch_by_student_id(
        &self,
        student_id: i64,
    ) -> StoreResult<Option<AccessControlRecord>> {
        let sql = format!(
            "SELECT {} FROM access_control WHERE student_id = $1",
            RECORD_COLUMNS
        );
        let record = sqlx::query_as::<_, AccessControlRecord>(&sql)
            .bind(student_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(record)
    }

    #[instrument(skip(self))]
    async fn update(&self, update: &UpdateAccessControl) -> StoreResult<Option<AccessControlRecord>> {
        // $2 says whether status was sent at all, so an explicit null clears it.
        let sql = format!(
            "UPDATE access_control SET \
                 status = CASE WHEN $2 THEN $3 ELSE status END, \
                 access_course = COALESCE($4, access_course), \
                 access_library = COALESCE($5, access_library), \
                 access_exams = COALESCE($6, access_exams), \
                 updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {}",
            RECORD_COLUMNS
        );
        let record = sqlx::query_as::<_, AccessControlRecord>(&sql)
            .bind(update.id)
            .bind(update.status.is_some())
            .bind(update.status.flatten())
            .bind(update.access_course)
            .bind(update.access_library)
            .bind(update.access_exams)
            .fetch_optional(&self.pool)
            .await?;

        Ok(record)
    }

    #[instrument(skip(self))]
    async fn ensure_for_student(
        &self,
        student_id: i64,
        defaults: NewAccessControl,
    ) -> StoreResult<AccessControlRecord> {
        Ok(insert_access_control(&self.pool, student_id, defaults).await?)
    }
}

#[derive(Clone, Debug)]
pub struct PgStudentDirectory {
    pool: PgPool,
}

impl PgStudentDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl StudentDirectory for PgStudentDirectory {
    #[instrument(skip(self))]
    async fn student_id_for_user(&self, user_id: i64) -> StoreResult<Option<i64>> {
        let student_id =
            sqlx::query_scalar::<_, i64>("SELECT id FROM students WHERE user_id = $1")
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(student_id)
    }
}
