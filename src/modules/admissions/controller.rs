use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use portal_core::{AppError, ErrorResponse};
use portal_models::{
    Admission, AdmissionFilterParams, CreateAdmissionDto, PaginatedAdmissionsResponse,
    UpdateAdmissionStatusDto,
};
use tracing::instrument;

use super::service::AdmissionService;
use crate::middleware::auth::RequireAdmin;
use crate::state::AppState;
use crate::validator::ValidatedJson;

/// Submit an admission application
#[utoipa::path(
    post,
    path = "/api/admissions",
    request_body = CreateAdmissionDto,
    responses(
        (status = 201, description = "Application submitted", body = Admission),
        (status = 400, description = "Malformed body", body = ErrorResponse),
        (status = 422, description = "Validation error or unknown degree", body = ErrorResponse)
    ),
    tag = "Admissions"
)]
#[instrument(skip(state, dto))]
pub async fn create_admission(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<CreateAdmissionDto>,
) -> Result<(StatusCode, Json<Admission>), AppError> {
    let admission = AdmissionService::create_admission(&state.db, dto).await?;
    Ok((StatusCode::CREATED, Json(admission)))
}

#[utoipa::path(
    get,
    path = "/api/admissions",
    params(AdmissionFilterParams),
    responses(
        (status = 200, description = "Applications", body = PaginatedAdmissionsResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - admin only", body = ErrorResponse)
    ),
    tag = "Admissions",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _admin))]
pub async fn get_admissions(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Query(filters): Query<AdmissionFilterParams>,
) -> Result<Json<PaginatedAdmissionsResponse>, AppError> {
    Ok(Json(AdmissionService::get_admissions(&state.db, filters).await?))
}

/// Accept or reject an application
///
/// Accepting enrols the applicant as a student with full feature access.
#[utoipa::path(
    patch,
    path = "/api/admissions/{id}",
    params(
        ("id" = i64, Path, description = "Admission ID")
    ),
    request_body = UpdateAdmissionStatusDto,
    responses(
        (status = 200, description = "Decision recorded", body = Admission),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - admin only", body = ErrorResponse),
        (status = 404, description = "Admission not found", body = ErrorResponse),
        (status = 409, description = "Already decided, or student email taken", body = ErrorResponse),
        (status = 422, description = "Invalid target status", body = ErrorResponse)
    ),
    tag = "Admissions",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _admin))]
pub async fn decide_admission(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Path(id): Path<i64>,
    ValidatedJson(dto): ValidatedJson<UpdateAdmissionStatusDto>,
) -> Result<Json<Admission>, AppError> {
    Ok(Json(
        AdmissionService::decide_admission(&state.db, id, dto.status).await?,
    ))
}
