//! Library books and loans.

use portal_core::serde::{deserialize_optional_i64, deserialize_optional_string};
use portal_core::{PaginationMeta, PaginationParams};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

pub const DEFAULT_LOAN_DAYS: i64 = 14;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Book {
    pub id: i64,
    pub isbn: String,
    pub title: String,
    pub author: String,
    pub total_copies: i32,
    pub available_copies: i32,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Loan {
    pub id: i64,
    pub book_id: i64,
    pub student_id: i64,
    pub borrowed_at: chrono::DateTime<chrono::Utc>,
    pub due_at: chrono::DateTime<chrono::Utc>,
    pub returned_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// A loan with the borrowed book's title, as listed to the student.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct LoanWithBook {
    pub id: i64,
    pub book_id: i64,
    pub title: String,
    pub author: String,
    pub borrowed_at: chrono::DateTime<chrono::Utc>,
    pub due_at: chrono::DateTime<chrono::Utc>,
    pub returned_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// Catalogue search; `q` matches titles case-insensitively.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct BookSearchParams {
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub q: Option<String>,
    #[serde(flatten)]
    pub pagination: PaginationParams,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PaginatedBooksResponse {
    pub data: Vec<Book>,
    pub meta: PaginationMeta,
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct LoanQueryParams {
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub student_id: Option<i64>,
}

/// DTO for checking a book out to a student.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CheckoutDto {
    #[validate(range(min = 1))]
    pub book_id: i64,
    #[validate(range(min = 1))]
    pub student_id: i64,
    /// Loan period in days (1-60, default: 14)
    #[validate(range(min = 1, max = 60))]
    pub loan_days: Option<i64>,
}

impl CheckoutDto {
    #[must_use]
    pub fn loan_days(&self) -> i64 {
        self.loan_days.unwrap_or(DEFAULT_LOAN_DAYS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checkout_defaults_and_bounds() {
        let dto = CheckoutDto {
            book_id: 1,
            student_id: 2,
            loan_days: None,
        };
        assert!(dto.validate().is_ok());
        assert_eq!(dto.loan_days(), 14);

        let dto = CheckoutDto {
            loan_days: Some(90),
            ..dto
        };
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_blank_search_is_ignored() {
        let params: BookSearchParams = serde_json::from_str(r#"{"q":"  "}"#).unwrap();
        assert_eq!(params.q, None);
    }
}
