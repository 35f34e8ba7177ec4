use anyhow::{Context, anyhow};
use portal_core::{AppError, PaginationMeta};
use portal_db::{is_foreign_key_violation, is_unique_violation};
use portal_models::{PaginatedStudentsResponse, Student, StudentFilterParams, UpdateStudentDto};
use sqlx::PgPool;
use tracing::instrument;

const STUDENT_COLUMNS: &str = "s.id, s.user_id, s.degree_id, s.first_name, s.last_name, s.email, \
                               s.phone, s.enrollment_year, s.created_at, s.updated_at";

pub struct StudentService;

impl StudentService {
    #[instrument(skip(db))]
    pub async fn get_students(
        db: &PgPool,
        filters: StudentFilterParams,
    ) -> Result<PaginatedStudentsResponse, AppError> {
        let limit = filters.pagination.limit();
        let offset = filters.pagination.offset();

        const FILTER: &str = "FROM students s \
                              LEFT JOIN access_control ac ON ac.student_id = s.id \
                              WHERE ($1::student_status IS NULL OR ac.status = $1) \
                                AND ($2::BIGINT IS NULL OR s.degree_id = $2)";

        let total = sqlx::query_scalar::<_, i64>(&format!("SELECT COUNT(*) {FILTER}"))
            .bind(filters.status)
            .bind(filters.degree_id)
            .fetch_one(db)
            .await
            .context("Failed to count students")
            .map_err(AppError::database)?;

        let students = sqlx::query_as::<_, Student>(&format!(
            "SELECT {STUDENT_COLUMNS} {FILTER} ORDER BY s.last_name, s.first_name, s.id \
             LIMIT $3 OFFSET $4"
        ))
        .bind(filters.status)
        .bind(filters.degree_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(db)
        .await
        .context("Failed to fetch students")
        .map_err(AppError::database)?;

        Ok(PaginatedStudentsResponse {
            data: students,
            meta: PaginationMeta::new(&filters.pagination, total),
        })
    }

    #[instrument(skip(db))]
    pub async fn get_student_by_id(db: &PgPool, id: i64) -> Result<Student, AppError> {
        sqlx::query_as::<_, Student>(&format!(
            "SELECT {STUDENT_COLUMNS} FROM students s WHERE s.id = $1"
        ))
        .bind(id)
        .fetch_optional(db)
        .await
        .context("Failed to fetch student")
        .map_err(AppError::database)?
        .ok_or_else(|| AppError::not_found(anyhow!("Student not found")))
    }

    #[instrument(skip(db, dto))]
    pub async fn update_student(
        db: &PgPool,
        id: i64,
        dto: UpdateStudentDto,
    ) -> Result<Student, AppError> {
        let result = sqlx::query_as::<_, Student>(&format!(
            "UPDATE students s SET \
                first_name = COALESCE($2, s.first_name), \
                last_name = COALESCE($3, s.last_name), \
                email = COALESCE($4, s.email), \
                phone = COALESCE($5, s.phone), \
                updated_at = NOW() \
             WHERE s.id = $1 \
             RETURNING {STUDENT_COLUMNS}"
        ))
        .bind(id)
        .bind(dto.first_name)
        .bind(dto.last_name)
        .bind(dto.email)
        .bind(dto.phone)
        .fetch_optional(db)
        .await;

        match result {
            Ok(Some(student)) => Ok(student),
            Ok(None) => Err(AppError::not_found(anyhow!("Student not found"))),
            Err(e) if is_unique_violation(&e) => Err(AppError::conflict(anyhow!(
                "A student with this email already exists"
            ))),
            Err(e) => Err(AppError::database(
                anyhow::Error::new(e).context("Failed to update student"),
            )),
        }
    }

    /// Points the student record at `user_id`, replacing any earlier link.
    ///
    /// An account can back at most one student record.
    #[instrument(skip(db))]
    pub async fn link_account(db: &PgPool, id: i64, user_id: i64) -> Result<Student, AppError> {
        let result = sqlx::query_as::<_, Student>(&format!(
            "UPDATE students s SET user_id = $2, updated_at = NOW() \
             WHERE s.id = $1 \
             RETURNING {STUDENT_COLUMNS}"
        ))
        .bind(id)
        .bind(user_id)
        .fetch_optional(db)
        .await;

        match result {
            Ok(Some(student)) => Ok(student),
            Ok(None) => Err(AppError::not_found(anyhow!("Student not found"))),
            Err(e) if is_foreign_key_violation(&e) => {
                Err(AppError::not_found(anyhow!("User not found")))
            }
            Err(e) if is_unique_violation(&e) => Err(AppError::conflict(anyhow!(
                "This account is already linked to another student"
            ))),
            Err(e) => Err(AppError::database(
                anyhow::Error::new(e).context("Failed to link student account"),
            )),
        }
    }
}
