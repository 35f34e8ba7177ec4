//! Documents issued to a student (transcripts, certificates, letters).

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Document {
    pub id: i64,
    pub student_id: i64,
    pub title: String,
    #[schema(example = "transcript")]
    pub kind: String,
    pub url: String,
    pub issued_at: chrono::DateTime<chrono::Utc>,
}
