use axum::{
    Router,
    routing::{get, patch},
};

use super::controller::{get_my_access, get_student_access, update_access};
use crate::state::AppState;

pub fn init_access_control_router() -> Router<AppState> {
    Router::new()
        .route("/me", get(get_my_access))
        .route("/students/{student_id}", get(get_student_access))
        .route("/{id}", patch(update_access))
}
