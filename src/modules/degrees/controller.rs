use axum::{
    Json,
    extract::{Path, State},
};
use portal_core::{AppError, ErrorResponse};
use portal_models::{Course, Degree, Exam};
use tracing::instrument;

use super::service::DegreeService;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/api/degrees",
    responses(
        (status = 200, description = "All degrees", body = Vec<Degree>),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    tag = "Degrees",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _auth_user))]
pub async fn get_degrees(
    State(state): State<AppState>,
    _auth_user: AuthUser,
) -> Result<Json<Vec<Degree>>, AppError> {
    Ok(Json(DegreeService::get_degrees(&state.db).await?))
}

#[utoipa::path(
    get,
    path = "/api/degrees/{id}",
    params(
        ("id" = i64, Path, description = "Degree ID")
    ),
    responses(
        (status = 200, description = "Degree details", body = Degree),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Degree not found", body = ErrorResponse)
    ),
    tag = "Degrees",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _auth_user))]
pub async fn get_degree_by_id(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<Degree>, AppError> {
    Ok(Json(DegreeService::get_degree_by_id(&state.db, id).await?))
}

#[utoipa::path(
    get,
    path = "/api/degrees/{id}/courses",
    params(
        ("id" = i64, Path, description = "Degree ID")
    ),
    responses(
        (status = 200, description = "Courses of the degree", body = Vec<Course>),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    tag = "Degrees",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _auth_user))]
pub async fn get_degree_courses(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<Vec<Course>>, AppError> {
    Ok(Json(DegreeService::get_courses_for_degree(&state.db, id).await?))
}

#[utoipa::path(
    get,
    path = "/api/courses/{id}",
    params(
        ("id" = i64, Path, description = "Course ID")
    ),
    responses(
        (status = 200, description = "Course details", body = Course),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Course not found", body = ErrorResponse)
    ),
    tag = "Courses",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _auth_user))]
pub async fn get_course_by_id(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<Course>, AppError> {
    Ok(Json(DegreeService::get_course_by_id(&state.db, id).await?))
}

#[utoipa::path(
    get,
    path = "/api/courses/{id}/exams",
    params(
        ("id" = i64, Path, description = "Course ID")
    ),
    responses(
        (status = 200, description = "Exams scheduled for the course", body = Vec<Exam>),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    tag = "Courses",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _auth_user))]
pub async fn get_course_exams(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<Vec<Exam>>, AppError> {
    Ok(Json(DegreeService::get_exams_for_course(&state.db, id).await?))
}
