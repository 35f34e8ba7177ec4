use axum::{Router, routing::get};

use super::controller::{
    course_catalogue, documents, exams, library, library_catalog, overview, settings,
};
use crate::state::AppState;

/// Routes carry their full `/dashboard` paths so the gate sees what the client sent.
pub fn init_dashboard_router() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(overview))
        .route("/dashboard/course-catalogue", get(course_catalogue))
        .route("/dashboard/library", get(library))
        .route("/dashboard/library/catalog", get(library_catalog))
        .route("/dashboard/exams", get(exams))
        .route("/dashboard/documents", get(documents))
        .route("/dashboard/settings", get(settings))
}
