//! Admission application models.
//!
//! An application starts `pending` and is decided once: `accepted` or
//! `rejected`. Both decisions are final.

use portal_core::{PaginationMeta, PaginationParams};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema,
)]
#[sqlx(type_name = "admission_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum AdmissionStatus {
    Pending,
    Accepted,
    Rejected,
}

impl AdmissionStatus {
    #[must_use]
    pub fn can_transition_to(self, next: AdmissionStatus) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Accepted) | (Self::Pending, Self::Rejected)
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Admission {
    pub id: i64,
    pub degree_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub status: AdmissionStatus,
    /// Set once the application is accepted and the student record exists.
    pub student_id: Option<i64>,
    pub submitted_at: chrono::DateTime<chrono::Utc>,
    pub decided_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// Public application form.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateAdmissionDto {
    #[validate(range(min = 1))]
    pub degree_id: i64,
    #[validate(length(min = 1, max = 100))]
    pub first_name: String,
    #[validate(length(min = 1, max = 100))]
    pub last_name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 5, max = 32))]
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateAdmissionStatusDto {
    pub status: AdmissionStatus,
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AdmissionFilterParams {
    pub status: Option<AdmissionStatus>,
    #[serde(flatten)]
    pub pagination: PaginationParams,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PaginatedAdmissionsResponse {
    pub data: Vec<Admission>,
    pub meta: PaginationMeta,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decisions_are_final() {
        use AdmissionStatus::*;

        assert!(Pending.can_transition_to(Accepted));
        assert!(Pending.can_transition_to(Rejected));
        assert!(!Pending.can_transition_to(Pending));
        assert!(!Accepted.can_transition_to(Rejected));
        assert!(!Rejected.can_transition_to(Accepted));
        assert!(!Accepted.can_transition_to(Pending));
    }

    #[test]
    fn test_application_validation() {
        let dto = CreateAdmissionDto {
            degree_id: 2,
            first_name: "Grace".into(),
            last_name: "Hopper".into(),
            email: "grace@example.com".into(),
            phone: None,
        };
        assert!(dto.validate().is_ok());

        let dto = CreateAdmissionDto {
            degree_id: 0,
            ..dto
        };
        assert!(dto.validate().is_err());
    }
}
