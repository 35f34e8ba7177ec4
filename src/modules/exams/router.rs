use axum::{Router, routing::get};

use super::controller::{get_exam_by_id, get_exam_results, get_my_results};
use crate::state::AppState;

pub fn init_exams_router() -> Router<AppState> {
    Router::new()
        .route("/results/me", get(get_my_results))
        .route("/{id}", get(get_exam_by_id))
        .route("/{id}/results", get(get_exam_results))
}
