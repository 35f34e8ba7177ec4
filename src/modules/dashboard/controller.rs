use axum::{Json, extract::State};
use portal_core::{AppError, ErrorResponse};
use tracing::instrument;

use super::model::{
    CourseCataloguePage, DashboardOverview, DocumentsPage, ExamsPage, LibraryCatalogPage,
    LibraryPage, SettingsPage,
};
use super::service::DashboardService;
use crate::middleware::auth::AuthUser;
use crate::modules::exams::service::ExamService;
use crate::modules::library::service::LibraryService;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/dashboard",
    responses(
        (status = 200, description = "Overview with effective feature access", body = DashboardOverview),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    tag = "Dashboard",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user), fields(user_id = auth_user.user_id()))]
pub async fn overview(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<DashboardOverview>, AppError> {
    let overview = DashboardService::overview(
        state.students.as_ref(),
        state.access_control.as_ref(),
        &auth_user.0,
    )
    .await?;
    Ok(Json(overview))
}

#[utoipa::path(
    get,
    path = "/dashboard/course-catalogue",
    responses(
        (status = 200, description = "Courses of the student's degree", body = CourseCataloguePage),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Access denied", body = ErrorResponse)
    ),
    tag = "Dashboard",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user), fields(user_id = auth_user.user_id()))]
pub async fn course_catalogue(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<CourseCataloguePage>, AppError> {
    let student_id = auth_user.student_id(&state).await?;
    Ok(Json(
        DashboardService::course_catalogue(&state.db, student_id).await?,
    ))
}

#[utoipa::path(
    get,
    path = "/dashboard/library",
    responses(
        (status = 200, description = "The student's loans", body = LibraryPage),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Access denied", body = ErrorResponse)
    ),
    tag = "Dashboard",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user), fields(user_id = auth_user.user_id()))]
pub async fn library(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<LibraryPage>, AppError> {
    let student_id = auth_user.student_id(&state).await?;
    let loans = LibraryService::get_loans_for_student(&state.db, student_id).await?;
    Ok(Json(LibraryPage { loans }))
}

#[utoipa::path(
    get,
    path = "/dashboard/library/catalog",
    responses(
        (status = 200, description = "First catalogue page", body = LibraryCatalogPage),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Access denied", body = ErrorResponse)
    ),
    tag = "Dashboard",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _auth_user))]
pub async fn library_catalog(
    State(state): State<AppState>,
    _auth_user: AuthUser,
) -> Result<Json<LibraryCatalogPage>, AppError> {
    let books = LibraryService::catalogue(&state.db).await?;
    Ok(Json(LibraryCatalogPage { books }))
}

#[utoipa::path(
    get,
    path = "/dashboard/exams",
    responses(
        (status = 200, description = "The student's exam results", body = ExamsPage),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Access denied", body = ErrorResponse)
    ),
    tag = "Dashboard",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user), fields(user_id = auth_user.user_id()))]
pub async fn exams(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<ExamsPage>, AppError> {
    let student_id = auth_user.student_id(&state).await?;
    let results = ExamService::get_results_for_student(&state.db, student_id).await?;
    Ok(Json(ExamsPage { results }))
}

#[utoipa::path(
    get,
    path = "/dashboard/documents",
    responses(
        (status = 200, description = "The student's documents", body = DocumentsPage),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Access denied", body = ErrorResponse)
    ),
    tag = "Dashboard",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user), fields(user_id = auth_user.user_id()))]
pub async fn documents(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<DocumentsPage>, AppError> {
    let student_id = auth_user.student_id(&state).await?;
    let documents = DashboardService::documents(&state.db, student_id).await?;
    Ok(Json(DocumentsPage { documents }))
}

#[utoipa::path(
    get,
    path = "/dashboard/settings",
    responses(
        (status = 200, description = "Account settings", body = SettingsPage),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    tag = "Dashboard",
    security(("bearer_auth" = []))
)]
pub async fn settings(AuthUser(claims): AuthUser) -> Json<SettingsPage> {
    let is_admin = claims.is_admin();
    Json(SettingsPage {
        name: claims.name,
        email: claims.email,
        uid: claims.uid,
        is_admin,
    })
}
