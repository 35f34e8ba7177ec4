//! Reads and administrative updates of access-control records.
//!
//! Records are never deleted here; access is revoked by clearing flags or
//! setting a terminal status.

use anyhow::anyhow;
use portal_core::AppError;
use portal_db::AccessControlStore;
use portal_models::{AccessControlRecord, UpdateAccessControl, UpdateAccessControlDto};
use portal_observability::track_access_control_update;
use tracing::instrument;

pub struct AccessControlService;

impl AccessControlService {
    #[instrument(skip(store))]
    pub async fn get_for_student(
        store: &dyn AccessControlStore,
        student_id: i64,
    ) -> Result<AccessControlRecord, AppError> {
        store
            .fetch_by_student_id(student_id)
            .await
            .map_err(AppError::database)?
            .ok_or_else(|| AppError::not_found(anyhow!("Access control record not found")))
    }

    /// Applies a partial update to record `id` in a single statement.
    #[instrument(skip(store))]
    pub async fn update(
        store: &dyn AccessControlStore,
        id: i64,
        dto: UpdateAccessControlDto,
    ) -> Result<AccessControlRecord, AppError> {
        if dto.is_empty() {
            return Err(AppError::unprocessable(anyhow!(
                "At least one field must be provided"
            )));
        }

        let updated = store
            .update(&UpdateAccessControl::new(id, dto))
            .await
            .map_err(AppError::database)?;
        track_access_control_update(updated.is_some());

        let record =
            updated.ok_or_else(|| AppError::not_found(anyhow!("Access control record not found")))?;

        tracing::info!(
            id = record.id,
            student_id = record.student_id,
            status = ?record.status,
            access_course = record.access_course,
            access_library = record.access_library,
            access_exams = record.access_exams,
            "access control updated"
        );

        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use portal_db::InMemoryAccessControlStore;
    use portal_models::StudentStatus;

    fn record() -> AccessControlRecord {
        AccessControlRecord {
            id: 3,
            student_id: 42,
            status: Some(StudentStatus::Active),
            access_course: true,
            access_library: false,
            access_exams: false,
            created_at: chrono::Utc::now(),
            updated_at: None,
        }
    }

    #[tokio::test]
    async fn test_get_missing_record_is_not_found() {
        let store = InMemoryAccessControlStore::new();
        let err = AccessControlService::get_for_student(&store, 42)
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_empty_update_is_rejected() {
        let store = InMemoryAccessControlStore::with_records([record()]);
        let err = AccessControlService::update(&store, 3, UpdateAccessControlDto::default())
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_update_suspends_student() {
        let store = InMemoryAccessControlStore::with_records([record()]);
        let dto = UpdateAccessControlDto {
            status: Some(Some(StudentStatus::Suspended)),
            ..Default::default()
        };

        let updated = AccessControlService::update(&store, 3, dto).await.unwrap();
        assert_eq!(updated.status, Some(StudentStatus::Suspended));
        assert!(updated.access_course);
        assert!(updated.is_terminal());
    }

    #[tokio::test]
    async fn test_update_unknown_record_is_not_found() {
        let store = InMemoryAccessControlStore::with_records([record()]);
        let dto = UpdateAccessControlDto {
            access_exams: Some(true),
            ..Default::default()
        };
        let err = AccessControlService::update(&store, 99, dto).await.unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_store_failure_is_internal_error() {
        let store = InMemoryAccessControlStore::with_records([record()]);
        store.set_failing(true);
        let err = AccessControlService::get_for_student(&store, 42)
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
    }
}
