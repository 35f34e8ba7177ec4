//! Student Portal Observability
//!
//! - Tracing to console, rolling files and OpenTelemetry (OTLP)
//! - Prometheus metrics for HTTP traffic and access-control events
//! - Per-request logging middleware, tagging each request with an `x-request-id`
//!
//! Compiled in with the `observability` feature (default). At runtime it can be
//! switched off with `OBSERVABILITY_ENABLED=false`, which leaves console logging only.
//!
//! # Examples
//!
//! ```no_run
//! use portal_observability::{init_tracing, shutdown_tracer};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     init_tracing()?;
//!     // ... application code ...
//!     shutdown_tracer().await;
//!     Ok(())
//! }
//! ```

pub mod basic_logging;

#[cfg(feature = "observability")]
pub mod logging;
#[cfg(feature = "observability")]
pub mod metrics;

pub use basic_logging::init_basic_console_logging;

#[cfg(feature = "observability")]
pub use metrics_exporter_prometheus::PrometheusHandle as MetricsHandle;

#[cfg(feature = "observability")]
pub use logging::{init_tracing, logging_middleware, shutdown_tracer};
#[cfg(feature = "observability")]
pub use metrics::{
    init_metrics, metrics_app, metrics_middleware, track_access_control_update,
    track_admission_decided, track_gate_decision, track_jwt_issued, track_jwt_validation,
    track_user_login_failure, track_user_login_success,
};

/// Header carrying the request id in both directions.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Filter applied when `RUST_LOG` is unset: our crates at `level`, noisy
/// dependencies at `warn`.
pub fn default_filter(level: &str) -> String {
    format!(
        "studentportal={level},portal_auth={level},portal_db={level},portal_core={level},\
         portal_observability={level},tower_http=warn,hyper=warn,tonic=warn,h2=warn,sqlx=warn"
    )
}

/// Whether `OBSERVABILITY_ENABLED` allows full tracing and metrics. Defaults to on.
#[cfg(feature = "observability")]
pub fn is_observability_enabled() -> bool {
    use std::sync::OnceLock;

    static OBSERVABILITY_ENABLED: OnceLock<bool> = OnceLock::new();
    *OBSERVABILITY_ENABLED.get_or_init(|| {
        std::env::var("OBSERVABILITY_ENABLED")
            .map(|v| !v.eq_ignore_ascii_case("false") && v != "0")
            .unwrap_or(true)
    })
}

// No-op stubs when observability is disabled
#[cfg(not(feature = "observability"))]
pub mod stubs {
    use axum::{Router, extract::Request, middleware::Next, response::Response};

    #[derive(Clone, Debug)]
    pub struct MetricsHandle;

    pub fn is_observability_enabled() -> bool {
        false
    }

    pub async fn logging_middleware(req: Request, next: Next) -> Response {
        next.run(req).await
    }

    pub async fn metrics_middleware(req: Request, next: Next) -> Response {
        next.run(req).await
    }

    pub fn init_tracing() -> anyhow::Result<()> {
        super::init_basic_console_logging();
        Ok(())
    }

    pub async fn shutdown_tracer() {}

    pub fn init_metrics() -> Option<MetricsHandle> {
        None
    }

    pub fn metrics_app(_handle: MetricsHandle) -> Router {
        Router::new()
    }

    pub fn track_user_login_success(_role: &str) {}
    pub fn track_user_login_failure(_reason: &str) {}
    pub fn track_jwt_issued() {}
    pub fn track_jwt_validation(_success: bool) {}
    pub fn track_gate_decision(_feature: &str, _decision: &str, _reason: &str) {}
    pub fn track_access_control_update(_found: bool) {}
    pub fn track_admission_decided(_status: &str) {}
}

#[cfg(not(feature = "observability"))]
pub use stubs::*;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter_parses() {
        let filter = default_filter("debug");
        assert!(filter.starts_with("studentportal=debug"));
        assert!(tracing_subscriber::EnvFilter::try_new(filter).is_ok());
    }
}
