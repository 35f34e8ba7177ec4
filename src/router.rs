use axum::http::{HeaderName, HeaderValue, Method, header};
use axum::{Router, middleware, routing::get};
use portal_observability::{REQUEST_ID_HEADER, logging_middleware, metrics_middleware};
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable as _};

use crate::docs::ApiDoc;
use crate::middleware::gate::feature_gate;
use crate::modules::access_control::init_access_control_router;
use crate::modules::admissions::init_admissions_router;
use crate::modules::auth::init_auth_router;
use crate::modules::dashboard::init_dashboard_router;
use crate::modules::degrees::{init_courses_router, init_degrees_router};
use crate::modules::exams::init_exams_router;
use crate::modules::fees::init_fees_router;
use crate::modules::health::health_check;
use crate::modules::library::init_library_router;
use crate::modules::students::init_students_router;
use crate::state::AppState;

pub fn init_router(state: AppState) -> Router {
    Router::new()
        .merge(Scalar::with_url("/scalar", ApiDoc::openapi()))
        .route("/health", get(health_check))
        .nest(
            "/api",
            Router::new()
                .nest("/auth", init_auth_router(&state))
                .nest("/access-control", init_access_control_router())
                .nest("/students", init_students_router())
                .nest("/degrees", init_degrees_router())
                .nest("/courses", init_courses_router())
                .nest("/exams", init_exams_router())
                .nest("/fees", init_fees_router())
                .nest("/admissions", init_admissions_router())
                .nest("/library", init_library_router()),
        )
        .merge(init_dashboard_router())
        .with_state(state.clone())
        .layer(middleware::from_fn_with_state(state.clone(), feature_gate))
        .layer(cors_layer(&state.cors_config.allowed_origins))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(middleware::from_fn(logging_middleware))
}

/// Credentialed CORS for the configured dashboard origins. Unparseable
/// origins are skipped.
fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();
    let request_id = HeaderName::from_static(REQUEST_ID_HEADER);

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::OPTIONS])
        .allow_headers([
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            header::ACCEPT,
            request_id.clone(),
        ])
        .expose_headers([request_id])
        .allow_credentials(true)
}
