use axum::{
    Json,
    extract::{Path, Query, State},
};
use portal_core::{AppError, ErrorResponse};
use portal_models::{
    LinkAccountDto, PaginatedStudentsResponse, Student, StudentFilterParams, UpdateStudentDto,
};
use tracing::instrument;

use super::service::StudentService;
use crate::middleware::auth::{AuthUser, RequireAdmin};
use crate::state::AppState;
use crate::validator::ValidatedJson;

#[utoipa::path(
    get,
    path = "/api/students",
    params(StudentFilterParams),
    responses(
        (status = 200, description = "List of students", body = PaginatedStudentsResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - admin only", body = ErrorResponse)
    ),
    tag = "Students",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _admin))]
pub async fn get_students(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Query(filters): Query<StudentFilterParams>,
) -> Result<Json<PaginatedStudentsResponse>, AppError> {
    let students = StudentService::get_students(&state.db, filters).await?;
    Ok(Json(students))
}

#[utoipa::path(
    get,
    path = "/api/students/me",
    responses(
        (status = 200, description = "The caller's student record", body = Student),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "No student record for this account", body = ErrorResponse)
    ),
    tag = "Students",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user), fields(user_id = auth_user.user_id()))]
pub async fn get_my_student(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<Student>, AppError> {
    let student_id = auth_user.student_id(&state).await?;
    let student = StudentService::get_student_by_id(&state.db, student_id).await?;
    Ok(Json(student))
}

#[utoipa::path(
    get,
    path = "/api/students/{id}",
    params(
        ("id" = i64, Path, description = "Student ID")
    ),
    responses(
        (status = 200, description = "Student details", body = Student),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - admin or the student only", body = ErrorResponse),
        (status = 404, description = "Student not found", body = ErrorResponse)
    ),
    tag = "Students",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user), fields(user_id = auth_user.user_id()))]
pub async fn get_student_by_id(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<Student>, AppError> {
    auth_user.ensure_admin_or_self(&state, id).await?;
    let student = StudentService::get_student_by_id(&state.db, id).await?;
    Ok(Json(student))
}

#[utoipa::path(
    patch,
    path = "/api/students/{id}",
    params(
        ("id" = i64, Path, description = "Student ID")
    ),
    request_body = UpdateStudentDto,
    responses(
        (status = 200, description = "Student updated", body = Student),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - admin only", body = ErrorResponse),
        (status = 404, description = "Student not found", body = ErrorResponse),
        (status = 409, description = "Email already in use", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    tag = "Students",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _admin, dto))]
pub async fn update_student(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Path(id): Path<i64>,
    ValidatedJson(dto): ValidatedJson<UpdateStudentDto>,
) -> Result<Json<Student>, AppError> {
    let student = StudentService::update_student(&state.db, id, dto).await?;
    Ok(Json(student))
}

#[utoipa::path(
    put,
    path = "/api/students/{id}/account",
    params(
        ("id" = i64, Path, description = "Student ID")
    ),
    request_body = LinkAccountDto,
    responses(
        (status = 200, description = "Student linked to the account", body = Student),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - admin only", body = ErrorResponse),
        (status = 404, description = "Student or user not found", body = ErrorResponse),
        (status = 409, description = "Account already linked to another student", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    tag = "Students",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _admin, dto))]
pub async fn link_student_account(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Path(id): Path<i64>,
    ValidatedJson(dto): ValidatedJson<LinkAccountDto>,
) -> Result<Json<Student>, AppError> {
    let student = StudentService::link_account(&state.db, id, dto.user_id).await?;
    Ok(Json(student))
}
