//! Degree and course models.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Degree {
    pub id: i64,
    #[schema(example = "BSC-CS")]
    pub code: String,
    pub name: String,
    pub duration_years: i32,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// A course taught as part of a degree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Course {
    pub id: i64,
    pub degree_id: i64,
    #[schema(example = "CS101")]
    pub code: String,
    pub title: String,
    pub credits: i32,
    pub semester: i32,
    pub created_at: chrono::DateTime<chrono::Utc>,
}
