//! Student domain models and DTOs.

use portal_core::serde::deserialize_optional_i64;
use portal_core::{PaginationMeta, PaginationParams};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::access_control::StudentStatus;

/// A student in the system.
///
/// `user_id` links the record to the account the student signs in with; it
/// is the key the access gate resolves tokens through.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Student {
    pub id: i64,
    pub user_id: Option<i64>,
    pub degree_id: Option<i64>,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub enrollment_year: i32,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// Query parameters for listing students.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct StudentFilterParams {
    /// Only students whose access record has this status
    pub status: Option<StudentStatus>,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub degree_id: Option<i64>,
    #[serde(flatten)]
    pub pagination: PaginationParams,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PaginatedStudentsResponse {
    pub data: Vec<Student>,
    pub meta: PaginationMeta,
}

/// DTO for updating a student's contact details.
///
/// All fields are optional; only provided fields are updated.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateStudentDto {
    #[validate(length(min = 1, max = 100))]
    pub first_name: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub last_name: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(min = 5, max = 32))]
    pub phone: Option<String>,
}

/// DTO for linking a student record to the account it signs in with.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct LinkAccountDto {
    #[validate(range(min = 1))]
    pub user_id: i64,
}
