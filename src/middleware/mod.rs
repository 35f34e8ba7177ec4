//! Middleware modules for request processing.
//!
//! - [`auth`]: credential extraction and the [`auth::AuthUser`] / [`auth::RequireAdmin`] extractors
//! - [`gate`]: the feature access gate as an axum middleware
//! - [`rate_limit`]: per-client limiting of login attempts
//!
//! # Authentication Flow
//!
//! 1. Client sends `Authorization: Bearer <token>` or the `accessToken` cookie
//! 2. [`gate::feature_gate`] decides restricted dashboard paths before routing
//! 3. Handlers that need an identity take [`auth::AuthUser`]; admin-only ones
//!    take [`auth::RequireAdmin`]
//!
//! # Example
//!
//! ```ignore
//! use crate::middleware::auth::{AuthUser, RequireAdmin};
//!
//! async fn me(auth_user: AuthUser) -> impl IntoResponse {
//!     Json(auth_user.0)
//! }
//!
//! async fn update(RequireAdmin(admin): RequireAdmin) -> impl IntoResponse {
//!     // Only executes for tokens with `isAdmin: true`
//! }
//! ```

pub mod auth;
pub mod gate;
pub mod rate_limit;
