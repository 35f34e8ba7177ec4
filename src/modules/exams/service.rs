use anyhow::{Context, anyhow};
use portal_core::AppError;
use portal_models::{Exam, ExamResult, StudentExamResult};
use sqlx::PgPool;
use tracing::instrument;

pub struct ExamService;

impl ExamService {
    #[instrument(skip(db))]
    pub async fn get_exam_by_id(db: &PgPool, id: i64) -> Result<Exam, AppError> {
        sqlx::query_as::<_, Exam>(
            "SELECT id, course_id, title, exam_date, max_marks, created_at FROM exams WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(db)
        .await
        .context("Failed to fetch exam")
        .map_err(AppError::database)?
        .ok_or_else(|| AppError::not_found(anyhow!("Exam not found")))
    }

    #[instrument(skip(db))]
    pub async fn get_results_for_exam(
        db: &PgPool,
        exam_id: i64,
    ) -> Result<Vec<ExamResult>, AppError> {
        sqlx::query_as::<_, ExamResult>(
            r#"SELECT id, exam_id, student_id, marks, grade, published_at
               FROM exam_results
               WHERE exam_id = $1
               ORDER BY student_id"#,
        )
        .bind(exam_id)
        .fetch_all(db)
        .await
        .context("Failed to fetch exam results")
        .map_err(AppError::database)
    }

    /// Published results of one student, most recent exam first.
    #[instrument(skip(db))]
    pub async fn get_results_for_student(
        db: &PgPool,
        student_id: i64,
    ) -> Result<Vec<StudentExamResult>, AppError> {
        sqlx::query_as::<_, StudentExamResult>(
            r#"SELECT e.id AS exam_id, e.title AS exam_title, c.code AS course_code,
                      e.exam_date, r.marks, e.max_marks, r.grade, r.published_at
               FROM exam_results r
               JOIN exams e ON e.id = r.exam_id
               JOIN courses c ON c.id = e.course_id
               WHERE r.student_id = $1
               ORDER BY e.exam_date DESC, e.id"#,
        )
        .bind(student_id)
        .fetch_all(db)
        .await
        .context("Failed to fetch student exam results")
        .map_err(AppError::database)
    }
}
