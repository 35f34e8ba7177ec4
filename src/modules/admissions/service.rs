//! Admission applications and their decisions.
//!
//! Accepting an application enrols the applicant: the student row, its
//! access-control record and the decision are written in one transaction.

use anyhow::{Context, anyhow};
use chrono::Datelike;
use portal_core::{AppError, PaginationMeta};
use portal_db::{insert_access_control, is_foreign_key_violation, is_unique_violation};
use portal_models::{
    Admission, AdmissionFilterParams, AdmissionStatus, CreateAdmissionDto, NewAccessControl,
    PaginatedAdmissionsResponse,
};
use portal_observability::track_admission_decided;
use sqlx::PgPool;
use tracing::instrument;

const ADMISSION_COLUMNS: &str = "id, degree_id, first_name, last_name, email, phone, status, \
                                 student_id, submitted_at, decided_at";

pub struct AdmissionService;

impl AdmissionService {
    #[instrument(skip(db, dto), fields(email = %dto.email))]
    pub async fn create_admission(
        db: &PgPool,
        dto: CreateAdmissionDto,
    ) -> Result<Admission, AppError> {
        let result = sqlx::query_as::<_, Admission>(&format!(
            "INSERT INTO admissions (degree_id, first_name, last_name, email, phone) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {ADMISSION_COLUMNS}"
        ))
        .bind(dto.degree_id)
        .bind(&dto.first_name)
        .bind(&dto.last_name)
        .bind(&dto.email)
        .bind(&dto.phone)
        .fetch_one(db)
        .await;

        match result {
            Ok(admission) => Ok(admission),
            Err(e) if is_foreign_key_violation(&e) => {
                Err(AppError::unprocessable(anyhow!("Degree not found")))
            }
            Err(e) => Err(AppError::database(
                anyhow::Error::new(e).context("Failed to create admission"),
            )),
        }
    }

    #[instrument(skip(db))]
    pub async fn get_admissions(
        db: &PgPool,
        filters: AdmissionFilterParams,
    ) -> Result<PaginatedAdmissionsResponse, AppError> {
        let total = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM admissions WHERE ($1::admission_status IS NULL OR status = $1)",
        )
        .bind(filters.status)
        .fetch_one(db)
        .await
        .context("Failed to count admissions")
        .map_err(AppError::database)?;

        let admissions = sqlx::query_as::<_, Admission>(&format!(
            "SELECT {ADMISSION_COLUMNS} FROM admissions \
             WHERE ($1::admission_status IS NULL OR status = $1) \
             ORDER BY submitted_at DESC, id DESC \
             LIMIT $2 OFFSET $3"
        ))
        .bind(filters.status)
        .bind(filters.pagination.limit())
        .bind(filters.pagination.offset())
        .fetch_all(db)
        .await
        .context("Failed to fetch admissions")
        .map_err(AppError::database)?;

        Ok(PaginatedAdmissionsResponse {
            data: admissions,
            meta: PaginationMeta::new(&filters.pagination, total),
        })
    }

    /// Records the decision on a pending application.
    ///
    /// Accepting creates the student and grants the admitted defaults. Decided
    /// applications are final.
    #[instrument(skip(db))]
    pub async fn decide_admission(
        db: &PgPool,
        id: i64,
        status: AdmissionStatus,
    ) -> Result<Admission, AppError> {
        if status == AdmissionStatus::Pending {
            return Err(AppError::unprocessable(anyhow!(
                "status must be accepted or rejected"
            )));
        }

        let mut tx = db
            .begin()
            .await
            .context("Failed to begin transaction")
            .map_err(AppError::database)?;

        let admission = sqlx::query_as::<_, Admission>(&format!(
            "SELECT {ADMISSION_COLUMNS} FROM admissions WHERE id = $1 FOR UPDATE"
        ))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await
        .context("Failed to fetch admission")
        .map_err(AppError::database)?
        .ok_or_else(|| AppError::not_found(anyhow!("Admission not found")))?;

        if !admission.status.can_transition_to(status) {
            return Err(AppError::conflict(anyhow!(
                "Admission has already been decided"
            )));
        }

        let student_id = if status == AdmissionStatus::Accepted {
            let inserted = sqlx::query_scalar::<_, i64>(
                r#"INSERT INTO students (degree_id, first_name, last_name, email, phone, enrollment_year)
                   VALUES ($1, $2, $3, $4, $5, $6)
                   RETURNING id"#,
            )
            .bind(admission.degree_id)
            .bind(&admission.first_name)
            .bind(&admission.last_name)
            .bind(&admission.email)
            .bind(&admission.phone)
            .bind(chrono::Utc::now().year())
            .fetch_one(&mut *tx)
            .await;

            let student_id = match inserted {
                Ok(student_id) => student_id,
                Err(e) if is_unique_violation(&e) => {
                    return Err(AppError::conflict(anyhow!(
                        "A student with this email already exists"
                    )));
                }
                Err(e) => {
                    return Err(AppError::database(
                        anyhow::Error::new(e).context("Failed to create student"),
                    ));
                }
            };

            insert_access_control(&mut *tx, student_id, NewAccessControl::admitted())
                .await
                .context("Failed to create access control record")
                .map_err(AppError::database)?;

            Some(student_id)
        } else {
            None
        };

        let decided = sqlx::query_as::<_, Admission>(&format!(
            "UPDATE admissions SET status = $2, student_id = $3, decided_at = NOW() \
             WHERE id = $1 \
             RETURNING {ADMISSION_COLUMNS}"
        ))
        .bind(id)
        .bind(status)
        .bind(student_id)
        .fetch_one(&mut *tx)
        .await
        .context("Failed to update admission")
        .map_err(AppError::database)?;

        tx.commit()
            .await
            .context("Failed to commit admission decision")
            .map_err(AppError::database)?;

        track_admission_decided(if status == AdmissionStatus::Accepted {
            "accepted"
        } else {
            "rejected"
        });
        tracing::info!(admission_id = id, ?status, ?student_id, "admission decided");

        Ok(decided)
    }
}
