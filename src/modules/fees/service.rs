use anyhow::{Context, anyhow};
use portal_core::{AppError, PaginationMeta};
use portal_db::is_foreign_key_violation;
use portal_models::{CreateFeeDto, Fee, FeeQueryParams, FeeStatus, PaginatedFeesResponse};
use sqlx::PgPool;
use tracing::instrument;

const FEE_COLUMNS: &str = "id, student_id, description, amount_cents, due_date, status, paid_at, created_at";

pub struct FeeService;

impl FeeService {
    #[instrument(skip(db))]
    pub async fn get_fees_for_student(db: &PgPool, student_id: i64) -> Result<Vec<Fee>, AppError> {
        sqlx::query_as::<_, Fee>(&format!(
            "SELECT {FEE_COLUMNS} FROM fees WHERE student_id = $1 ORDER BY due_date, id"
        ))
        .bind(student_id)
        .fetch_all(db)
        .await
        .context("Failed to fetch student fees")
        .map_err(AppError::database)
    }

    #[instrument(skip(db))]
    pub async fn get_fees(
        db: &PgPool,
        params: FeeQueryParams,
    ) -> Result<PaginatedFeesResponse, AppError> {
        const FILTER: &str = "FROM fees \
                              WHERE ($1::BIGINT IS NULL OR student_id = $1) \
                                AND ($2::fee_status IS NULL OR status = $2)";

        let total = sqlx::query_scalar::<_, i64>(&format!("SELECT COUNT(*) {FILTER}"))
            .bind(params.student_id)
            .bind(params.status)
            .fetch_one(db)
            .await
            .context("Failed to count fees")
            .map_err(AppError::database)?;

        let fees = sqlx::query_as::<_, Fee>(&format!(
            "SELECT {FEE_COLUMNS} {FILTER} ORDER BY due_date, id LIMIT $3 OFFSET $4"
        ))
        .bind(params.student_id)
        .bind(params.status)
        .bind(params.pagination.limit())
        .bind(params.pagination.offset())
        .fetch_all(db)
        .await
        .context("Failed to fetch fees")
        .map_err(AppError::database)?;

        Ok(PaginatedFeesResponse {
            data: fees,
            meta: PaginationMeta::new(&params.pagination, total),
        })
    }

    #[instrument(skip(db))]
    pub async fn create_fee(db: &PgPool, dto: CreateFeeDto) -> Result<Fee, AppError> {
        let result = sqlx::query_as::<_, Fee>(&format!(
            "INSERT INTO fees (student_id, description, amount_cents, due_date) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {FEE_COLUMNS}"
        ))
        .bind(dto.student_id)
        .bind(&dto.description)
        .bind(dto.amount_cents)
        .bind(dto.due_date)
        .fetch_one(db)
        .await;

        match result {
            Ok(fee) => Ok(fee),
            Err(e) if is_foreign_key_violation(&e) => {
                Err(AppError::not_found(anyhow!("Student not found")))
            }
            Err(e) => Err(AppError::database(
                anyhow::Error::new(e).context("Failed to create fee"),
            )),
        }
    }

    /// Marks a pending fee as paid. Fees already paid or waived are a conflict.
    #[instrument(skip(db))]
    pub async fn pay_fee(db: &PgPool, id: i64) -> Result<Fee, AppError> {
        let paid = sqlx::query_as::<_, Fee>(&format!(
            "UPDATE fees SET status = 'paid', paid_at = NOW() \
             WHERE id = $1 AND status = 'pending' \
             RETURNING {FEE_COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(db)
        .await
        .context("Failed to mark fee as paid")
        .map_err(AppError::database)?;

        if let Some(fee) = paid {
            tracing::info!(fee_id = fee.id, student_id = fee.student_id, "fee paid");
            return Ok(fee);
        }

        let status = sqlx::query_scalar::<_, FeeStatus>("SELECT status FROM fees WHERE id = $1")
            .bind(id)
            .fetch_optional(db)
            .await
            .context("Failed to fetch fee status")
            .map_err(AppError::database)?;

        match status {
            None => Err(AppError::not_found(anyhow!("Fee not found"))),
            Some(status) => Err(AppError::conflict(anyhow!(
                "Fee cannot be paid in its current state: {:?}",
                status
            ))),
        }
    }
}
