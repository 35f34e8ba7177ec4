use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use portal_core::{AppError, ErrorResponse};
use portal_models::{
    BookSearchParams, CheckoutDto, Loan, LoanQueryParams, LoanWithBook, PaginatedBooksResponse,
};
use tracing::instrument;

use super::service::LibraryService;
use crate::middleware::auth::{AuthUser, RequireAdmin};
use crate::state::AppState;
use crate::validator::ValidatedJson;

#[utoipa::path(
    get,
    path = "/api/library/books",
    params(BookSearchParams),
    responses(
        (status = 200, description = "Catalogue page", body = PaginatedBooksResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    tag = "Library",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _auth_user))]
pub async fn search_books(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Query(params): Query<BookSearchParams>,
) -> Result<Json<PaginatedBooksResponse>, AppError> {
    Ok(Json(LibraryService::search_books(&state.db, params).await?))
}

#[utoipa::path(
    get,
    path = "/api/library/loans/me",
    responses(
        (status = 200, description = "The caller's loans, open loans first", body = Vec<LoanWithBook>),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "No student record for this account", body = ErrorResponse)
    ),
    tag = "Library",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user), fields(user_id = auth_user.user_id()))]
pub async fn get_my_loans(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<Vec<LoanWithBook>>, AppError> {
    let student_id = auth_user.student_id(&state).await?;
    Ok(Json(
        LibraryService::get_loans_for_student(&state.db, student_id).await?,
    ))
}

#[utoipa::path(
    get,
    path = "/api/library/loans",
    params(LoanQueryParams),
    responses(
        (status = 200, description = "Loans", body = Vec<Loan>),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - admin only", body = ErrorResponse)
    ),
    tag = "Library",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _admin))]
pub async fn get_loans(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Query(params): Query<LoanQueryParams>,
) -> Result<Json<Vec<Loan>>, AppError> {
    Ok(Json(
        LibraryService::get_loans(&state.db, params.student_id).await?,
    ))
}

#[utoipa::path(
    post,
    path = "/api/library/loans",
    request_body = CheckoutDto,
    responses(
        (status = 201, description = "Book checked out", body = Loan),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - admin only", body = ErrorResponse),
        (status = 404, description = "Book or student not found", body = ErrorResponse),
        (status = 409, description = "No copies available", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    tag = "Library",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _admin))]
pub async fn checkout_book(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    ValidatedJson(dto): ValidatedJson<CheckoutDto>,
) -> Result<(StatusCode, Json<Loan>), AppError> {
    let loan = LibraryService::checkout(&state.db, dto).await?;
    Ok((StatusCode::CREATED, Json(loan)))
}

#[utoipa::path(
    post,
    path = "/api/library/loans/{id}/return",
    params(
        ("id" = i64, Path, description = "Loan ID")
    ),
    responses(
        (status = 200, description = "Loan closed", body = Loan),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - admin only", body = ErrorResponse),
        (status = 404, description = "Loan not found", body = ErrorResponse),
        (status = 409, description = "Loan already returned", body = ErrorResponse)
    ),
    tag = "Library",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _admin))]
pub async fn return_loan(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Path(id): Path<i64>,
) -> Result<Json<Loan>, AppError> {
    Ok(Json(LibraryService::return_loan(&state.db, id).await?))
}
