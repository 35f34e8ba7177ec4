use axum::{
    Json,
    extract::{Path, State},
};
use portal_core::{AppError, ErrorResponse};
use portal_models::{AccessControlRecord, UpdateAccessControlDto};
use tracing::instrument;

use super::service::AccessControlService;
use crate::middleware::auth::{AuthUser, RequireAdmin};
use crate::state::AppState;
use crate::validator::ValidatedJson;

/// The caller's own access-control record
#[utoipa::path(
    get,
    path = "/api/access-control/me",
    responses(
        (status = 200, description = "Access control record", body = AccessControlRecord),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "No student or access record", body = ErrorResponse)
    ),
    tag = "Access Control",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user), fields(user_id = auth_user.user_id()))]
pub async fn get_my_access(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<AccessControlRecord>, AppError> {
    let student_id = auth_user.student_id(&state).await?;
    let record =
        AccessControlService::get_for_student(state.access_control.as_ref(), student_id).await?;
    Ok(Json(record))
}

#[utoipa::path(
    get,
    path = "/api/access-control/students/{student_id}",
    params(
        ("student_id" = i64, Path, description = "Student ID")
    ),
    responses(
        (status = 200, description = "Access control record", body = AccessControlRecord),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - admin only", body = ErrorResponse),
        (status = 404, description = "Access record not found", body = ErrorResponse)
    ),
    tag = "Access Control",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _admin))]
pub async fn get_student_access(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Path(student_id): Path<i64>,
) -> Result<Json<AccessControlRecord>, AppError> {
    let record =
        AccessControlService::get_for_student(state.access_control.as_ref(), student_id).await?;
    Ok(Json(record))
}

/// Partially update an access-control record
///
/// Omitted fields are unchanged; `status: null` clears the status.
#[utoipa::path(
    patch,
    path = "/api/access-control/{id}",
    params(
        ("id" = i64, Path, description = "Access control record ID")
    ),
    request_body = UpdateAccessControlDto,
    responses(
        (status = 200, description = "Updated record", body = AccessControlRecord),
        (status = 400, description = "Malformed body", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - admin only", body = ErrorResponse),
        (status = 404, description = "Access record not found", body = ErrorResponse),
        (status = 422, description = "No fields to update", body = ErrorResponse)
    ),
    tag = "Access Control",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, admin, dto), fields(admin_id = admin.0.user_id()))]
pub async fn update_access(
    State(state): State<AppState>,
    admin: RequireAdmin,
    Path(id): Path<i64>,
    ValidatedJson(dto): ValidatedJson<UpdateAccessControlDto>,
) -> Result<Json<AccessControlRecord>, AppError> {
    let record = AccessControlService::update(state.access_control.as_ref(), id, dto).await?;
    Ok(Json(record))
}
