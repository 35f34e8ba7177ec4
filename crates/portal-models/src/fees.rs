//! Fee models and DTOs.
//!
//! Amounts are stored in minor units (`amount_cents`) to avoid floating point.

use portal_core::serde::deserialize_optional_i64;
use portal_core::{PaginationMeta, PaginationParams};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema,
)]
#[sqlx(type_name = "fee_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum FeeStatus {
    Pending,
    Paid,
    Waived,
}

impl FeeStatus {
    /// Whether the fee still expects a payment.
    #[must_use]
    pub fn is_payable(self) -> bool {
        matches!(self, Self::Pending)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Fee {
    pub id: i64,
    pub student_id: i64,
    pub description: String,
    pub amount_cents: i64,
    pub due_date: chrono::NaiveDate,
    pub status: FeeStatus,
    pub paid_at: Option<chrono::DateTime<chrono::Utc>>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// DTO for charging a fee to a student.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateFeeDto {
    #[validate(range(min = 1))]
    pub student_id: i64,
    #[validate(length(min = 1, max = 200))]
    #[schema(example = "Tuition, semester 1")]
    pub description: String,
    #[validate(range(min = 1))]
    #[schema(example = 250000)]
    pub amount_cents: i64,
    pub due_date: chrono::NaiveDate,
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct FeeQueryParams {
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub student_id: Option<i64>,
    pub status: Option<FeeStatus>,
    #[serde(flatten)]
    pub pagination: PaginationParams,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PaginatedFeesResponse {
    pub data: Vec<Fee>,
    pub meta: PaginationMeta,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_pending_fees_are_payable() {
        assert!(FeeStatus::Pending.is_payable());
        assert!(!FeeStatus::Paid.is_payable());
        assert!(!FeeStatus::Waived.is_payable());
    }

    #[test]
    fn test_create_fee_rejects_non_positive_amount() {
        let dto = CreateFeeDto {
            student_id: 1,
            description: "Library fine".into(),
            amount_cents: 0,
            due_date: chrono::NaiveDate::from_ymd_opt(2026, 9, 1).unwrap(),
        };
        assert!(dto.validate().is_err());

        let dto = CreateFeeDto {
            amount_cents: 500,
            ..dto
        };
        assert!(dto.validate().is_ok());
    }
}
