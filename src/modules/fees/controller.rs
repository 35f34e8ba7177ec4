use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use portal_core::{AppError, ErrorResponse};
use portal_models::{CreateFeeDto, Fee, FeeQueryParams, PaginatedFeesResponse};
use tracing::instrument;

use super::service::FeeService;
use crate::middleware::auth::{AuthUser, RequireAdmin};
use crate::state::AppState;
use crate::validator::ValidatedJson;

#[utoipa::path(
    get,
    path = "/api/fees/me",
    responses(
        (status = 200, description = "The caller's fees", body = Vec<Fee>),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "No student record for this account", body = ErrorResponse)
    ),
    tag = "Fees",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user), fields(user_id = auth_user.user_id()))]
pub async fn get_my_fees(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<Vec<Fee>>, AppError> {
    let student_id = auth_user.student_id(&state).await?;
    Ok(Json(
        FeeService::get_fees_for_student(&state.db, student_id).await?,
    ))
}

#[utoipa::path(
    get,
    path = "/api/fees",
    params(FeeQueryParams),
    responses(
        (status = 200, description = "Fees", body = PaginatedFeesResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - admin only", body = ErrorResponse)
    ),
    tag = "Fees",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _admin))]
pub async fn get_fees(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Query(params): Query<FeeQueryParams>,
) -> Result<Json<PaginatedFeesResponse>, AppError> {
    Ok(Json(FeeService::get_fees(&state.db, params).await?))
}

#[utoipa::path(
    post,
    path = "/api/fees",
    request_body = CreateFeeDto,
    responses(
        (status = 201, description = "Fee created", body = Fee),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - admin only", body = ErrorResponse),
        (status = 404, description = "Student not found", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    tag = "Fees",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _admin))]
pub async fn create_fee(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    ValidatedJson(dto): ValidatedJson<CreateFeeDto>,
) -> Result<(StatusCode, Json<Fee>), AppError> {
    let fee = FeeService::create_fee(&state.db, dto).await?;
    Ok((StatusCode::CREATED, Json(fee)))
}

#[utoipa::path(
    post,
    path = "/api/fees/{id}/pay",
    params(
        ("id" = i64, Path, description = "Fee ID")
    ),
    responses(
        (status = 200, description = "Fee marked as paid", body = Fee),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - admin only", body = ErrorResponse),
        (status = 404, description = "Fee not found", body = ErrorResponse),
        (status = 409, description = "Fee already paid or waived", body = ErrorResponse)
    ),
    tag = "Fees",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _admin))]
pub async fn pay_fee(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Path(id): Path<i64>,
) -> Result<Json<Fee>, AppError> {
    Ok(Json(FeeService::pay_fee(&state.db, id).await?))
}
