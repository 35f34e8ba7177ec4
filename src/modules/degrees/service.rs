use anyhow::{Context, anyhow};
use portal_core::AppError;
use portal_models::{Course, Degree, Exam};
use sqlx::PgPool;
use tracing::instrument;

pub struct DegreeService;

impl DegreeService {
    #[instrument(skip(db))]
    pub async fn get_degrees(db: &PgPool) -> Result<Vec<Degree>, AppError> {
        sqlx::query_as::<_, Degree>(
            "SELECT id, code, name, duration_years, created_at FROM degrees ORDER BY name",
        )
        .fetch_all(db)
        .await
        .context("Failed to fetch degrees")
        .map_err(AppError::database)
    }

    #[instrument(skip(db))]
    pub async fn get_degree_by_id(db: &PgPool, id: i64) -> Result<Degree, AppError> {
        sqlx::query_as::<_, Degree>(
            "SELECT id, code, name, duration_years, created_at FROM degrees WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(db)
        .await
        .context("Failed to fetch degree")
        .map_err(AppError::database)?
        .ok_or_else(|| AppError::not_found(anyhow!("Degree not found")))
    }

    /// Courses of one degree, in semester order. An unknown degree yields an empty list.
    #[instrument(skip(db))]
    pub async fn get_courses_for_degree(
        db: &PgPool,
        degree_id: i64,
    ) -> Result<Vec<Course>, AppError> {
        sqlx::query_as::<_, Course>(
            r#"SELECT id, degree_id, code, title, credits, semester, created_at
               FROM courses
               WHERE degree_id = $1
               ORDER BY semester, code"#,
        )
        .bind(degree_id)
        .fetch_all(db)
        .await
        .context("Failed to fetch courses")
        .map_err(AppError::database)
    }

    #[instrument(skip(db))]
    pub async fn get_course_by_id(db: &PgPool, id: i64) -> Result<Course, AppError> {
        sqlx::query_as::<_, Course>(
            r#"SELECT id, degree_id, code, title, credits, semester, created_at
               FROM courses
               WHERE id = $1"#,
        )
        .bind(id)
        .fetch_optional(db)
        .await
        .context("Failed to fetch course")
        .map_err(AppError::database)?
        .ok_or_else(|| AppError::not_found(anyhow!("Course not found")))
    }

    #[instrument(skip(db))]
    pub async fn get_exams_for_course(db: &PgPool, course_id: i64) -> Result<Vec<Exam>, AppError> {
        sqlx::query_as::<_, Exam>(
            r#"SELECT id, course_id, title, exam_date, max_marks, created_at
               FROM exams
               WHERE course_id = $1
               ORDER BY exam_date"#,
        )
        .bind(course_id)
        .fetch_all(db)
        .await
        .context("Failed to fetch exams")
        .map_err(AppError::database)
    }
}
