//! Exam and exam result models.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Exam {
    pub id: i64,
    pub course_id: i64,
    pub title: String,
    pub exam_date: chrono::NaiveDate,
    pub max_marks: i32,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// A published result for one student in one exam.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct ExamResult {
    pub id: i64,
    pub exam_id: i64,
    pub student_id: i64,
    pub marks: i32,
    pub grade: Option<String>,
    pub published_at: chrono::DateTime<chrono::Utc>,
}

/// A result joined with its exam and course, as shown to the student.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct StudentExamResult {
    pub exam_id: i64,
    pub exam_title: String,
    pub course_code: String,
    pub exam_date: chrono::NaiveDate,
    pub marks: i32,
    pub max_marks: i32,
    pub grade: Option<String>,
    pub published_at: chrono::DateTime<chrono::Utc>,
}
