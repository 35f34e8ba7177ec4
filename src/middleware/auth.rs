use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, request::Parts},
};
use axum_extra::extract::CookieJar;
use axum_extra::headers::{Authorization, HeaderMapExt, authorization::Bearer};
use portal_auth::{TokenClaims, is_absent_token};
use portal_core::AppError;
use portal_observability::track_jwt_validation;

use crate::state::AppState;

/// Cookie carrying the access token for browser clients.
pub const ACCESS_TOKEN_COOKIE: &str = "accessToken";

/// The caller's token: the bearer header if present, otherwise the cookie.
///
/// Placeholder values (`undefined`, `null`, blank) count as absent, so a
/// placeholder header does not hide a real cookie.
pub fn extract_token(headers: &HeaderMap) -> Option<String> {
    let bearer = headers
        .typed_get::<Authorization<Bearer>>()
        .map(|Authorization(bearer)| bearer.token().to_string())
        .filter(|token| !is_absent_token(token));
    if bearer.is_some() {
        return bearer;
    }

    CookieJar::from_headers(headers)
        .get(ACCESS_TOKEN_COOKIE)
        .map(|cookie| cookie.value().to_string())
        .filter(|token| !is_absent_token(token))
}

fn authentication_required() -> AppError {
    AppError::unauthorized("Authentication required".to_string())
}

/// Extractor that validates the access token and provides the caller's claims.
#[derive(Debug, Clone)]
pub struct AuthUser(pub TokenClaims);

impl AuthUser {
    pub fn user_id(&self) -> i64 {
        self.0.user_id
    }

    pub fn is_admin(&self) -> bool {
        self.0.is_admin()
    }

    /// Resolves the caller's student record id.
    ///
    /// Accounts without a student record get `404`.
    pub async fn student_id(&self, state: &AppState) -> Result<i64, AppError> {
        state
            .students
            .student_id_for_user(self.user_id())
            .await
            .map_err(AppError::database)?
            .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Student record not found")))
    }

    /// Passes for admins and for the student owning `student_id`.
    pub async fn ensure_admin_or_self(
        &self,
        state: &AppState,
        student_id: i64,
    ) -> Result<(), AppError> {
        if self.is_admin() {
            return Ok(());
        }

        let own = state
            .students
            .student_id_for_user(self.user_id())
            .await
            .map_err(AppError::database)?;

        if own == Some(student_id) {
            Ok(())
        } else {
            Err(AppError::forbidden("Access denied".to_string()))
        }
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = extract_token(&parts.headers).ok_or_else(authentication_required)?;

        match state.verifier.verify(&token) {
            Ok(claims) => {
                track_jwt_validation(true);
                Ok(AuthUser(claims))
            }
            Err(_) => {
                track_jwt_validation(false);
                Err(authentication_required())
            }
        }
    }
}

/// [`AuthUser`] whose token carries `isAdmin: true`.
#[derive(Debug, Clone)]
pub struct RequireAdmin(pub AuthUser);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_user = AuthUser::from_request_parts(parts, state).await?;

        if !auth_user.is_admin() {
            return Err(AppError::forbidden("Admin access required".to_string()));
        }

        Ok(RequireAdmin(auth_user))
    }
}
