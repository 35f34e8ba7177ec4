use axum::{Router, routing::get};

use super::controller::{
    get_course_by_id, get_course_exams, get_degree_by_id, get_degree_courses, get_degrees,
};
use crate::state::AppState;

pub fn init_degrees_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_degrees))
        .route("/{id}", get(get_degree_by_id))
        .route("/{id}/courses", get(get_degree_courses))
}

pub fn init_courses_router() -> Router<AppState> {
    Router::new()
        .route("/{id}", get(get_course_by_id))
        .route("/{id}/exams", get(get_course_exams))
}
