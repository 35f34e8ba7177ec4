use axum::{
    Router,
    routing::{get, post},
};

use super::controller::{get_current_user, login_user, logout_user};
use crate::middleware::rate_limit::limit_login;
use crate::state::AppState;

pub fn init_auth_router(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/login", limit_login(post(login_user), &state.rate_limit_config))
        .route("/logout", post(logout_user))
        .route("/me", get(get_current_user))
}
