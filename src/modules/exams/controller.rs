use axum::{
    Json,
    extract::{Path, State},
};
use portal_core::{AppError, ErrorResponse};
use portal_models::{Exam, ExamResult, StudentExamResult};
use tracing::instrument;

use super::service::ExamService;
use crate::middleware::auth::{AuthUser, RequireAdmin};
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/api/exams/{id}",
    params(
        ("id" = i64, Path, description = "Exam ID")
    ),
    responses(
        (status = 200, description = "Exam details", body = Exam),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Exam not found", body = ErrorResponse)
    ),
    tag = "Exams",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _auth_user))]
pub async fn get_exam_by_id(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<Exam>, AppError> {
    Ok(Json(ExamService::get_exam_by_id(&state.db, id).await?))
}

#[utoipa::path(
    get,
    path = "/api/exams/{id}/results",
    params(
        ("id" = i64, Path, description = "Exam ID")
    ),
    responses(
        (status = 200, description = "All results for the exam", body = Vec<ExamResult>),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - admin only", body = ErrorResponse)
    ),
    tag = "Exams",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _admin))]
pub async fn get_exam_results(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Path(id): Path<i64>,
) -> Result<Json<Vec<ExamResult>>, AppError> {
    Ok(Json(ExamService::get_results_for_exam(&state.db, id).await?))
}

#[utoipa::path(
    get,
    path = "/api/exams/results/me",
    responses(
        (status = 200, description = "The caller's exam results", body = Vec<StudentExamResult>),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "No student record for this account", body = ErrorResponse)
    ),
    tag = "Exams",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user), fields(user_id = auth_user.user_id()))]
pub async fn get_my_results(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<Vec<StudentExamResult>>, AppError> {
    let student_id = auth_user.student_id(&state).await?;
    Ok(Json(
        ExamService::get_results_for_student(&state.db, student_id).await?,
    ))
}
