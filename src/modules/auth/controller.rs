use axum::Json;
use axum::extract::State;
use axum_extra::extract::CookieJar;
use axum_extra::extract::cookie::{Cookie, SameSite};
use portal_auth::TokenClaims;
use portal_core::{AppError, ErrorResponse};
use portal_models::{LoginRequest, LoginResponse, MessageResponse};
use tracing::instrument;

use super::service::AuthService;
use crate::middleware::auth::{ACCESS_TOKEN_COOKIE, AuthUser};
use crate::state::AppState;
use crate::validator::ValidatedJson;

fn access_token_cookie(token: String) -> Cookie<'static> {
    Cookie::build((ACCESS_TOKEN_COOKIE, token))
        .http_only(true)
        .same_site(SameSite::Lax)
        .path("/")
        .build()
}

/// Login and receive an access token
///
/// The token is returned in the body and also set as the `accessToken` cookie.
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 400, description = "Bad request - malformed body", body = ErrorResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse),
        (status = 429, description = "Too many login attempts", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
#[instrument(skip(state, jar, dto))]
pub async fn login_user(
    State(state): State<AppState>,
    jar: CookieJar,
    ValidatedJson(dto): ValidatedJson<LoginRequest>,
) -> Result<(CookieJar, Json<LoginResponse>), AppError> {
    let response = AuthService::login_user(&state.db, dto, &state.jwt_config).await?;
    let jar = jar.add(access_token_cookie(response.access_token.clone()));
    Ok((jar, Json(response)))
}

/// Clear the access token cookie
#[utoipa::path(
    post,
    path = "/api/auth/logout",
    responses(
        (status = 200, description = "Logged out", body = MessageResponse)
    ),
    tag = "Authentication"
)]
pub async fn logout_user(jar: CookieJar) -> (CookieJar, Json<MessageResponse>) {
    let jar = jar.remove(Cookie::build(ACCESS_TOKEN_COOKIE).path("/"));
    (jar, Json(MessageResponse::new("Logged out")))
}

/// Claims of the current access token
#[utoipa::path(
    get,
    path = "/api/auth/me",
    responses(
        (status = 200, description = "Current identity", body = TokenClaims),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    tag = "Authentication",
    security(("bearer_auth" = []))
)]
pub async fn get_current_user(AuthUser(claims): AuthUser) -> Json<TokenClaims> {
    Json(claims)
}
