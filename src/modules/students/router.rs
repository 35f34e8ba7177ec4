use axum::{
    Router,
    routing::{get, put},
};

use super::controller::{
    get_my_student, get_student_by_id, get_students, link_student_account, update_student,
};
use crate::state::AppState;

pub fn init_students_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_students))
        .route("/me", get(get_my_student))
        .route("/{id}", get(get_student_by_id).patch(update_student))
        .route("/{id}/account", put(link_student_account))
}
