//! Subscriber setup and per-request logging.
//!
//! Settings come from the environment:
//!
//! - `LOG_DIR`: directory for rolling log files (default `storage/logs`)
//! - `OTEL_EXPORTER_OTLP_ENDPOINT`: collector address (default `http://localhost:4317`)
//! - `OTEL_SERVICE_NAME`: reported service name (default `studentportal`)
//! - `ENVIRONMENT`: deployment label attached to traces (default `development`)

use std::time::Instant;

use axum::{
    extract::{MatchedPath, Request},
    http::{HeaderMap, HeaderValue},
    middleware::Next,
    response::Response,
};
use opentelemetry::{KeyValue, global, trace::TraceError};
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::{
    Resource,
    propagation::TraceContextPropagator,
    runtime,
    trace::{self as sdktrace, RandomIdGenerator, Sampler, Tracer},
};
use opentelemetry_semantic_conventions::resource::{SERVICE_NAME, SERVICE_VERSION};
use tracing::{Instrument, Level, info, info_span, warn};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, Layer, Registry, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::{REQUEST_ID_HEADER, default_filter, init_basic_console_logging, is_observability_enabled};

struct LogSettings {
    log_dir: String,
    otlp_endpoint: String,
    service_name: String,
    environment: String,
}

impl LogSettings {
    fn from_env() -> Self {
        let var = |key: &str, default: &str| std::env::var(key).unwrap_or_else(|_| default.to_string());
        Self {
            log_dir: var("LOG_DIR", "storage/logs"),
            otlp_endpoint: var("OTEL_EXPORTER_OTLP_ENDPOINT", "http://localhost:4317"),
            service_name: var("OTEL_SERVICE_NAME", "studentportal"),
            environment: var("ENVIRONMENT", "development"),
        }
    }
}

/// Reuses a caller-supplied request id when it is short printable ASCII,
/// otherwise mints a fresh one.
pub fn request_id(headers: &HeaderMap) -> String {
    headers
        .get(REQUEST_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|id| !id.is_empty() && id.len() <= 128 && id.bytes().all(|b| b.is_ascii_graphic()))
        .map(str::to_owned)
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string())
}

/// Logs each request inside a span carrying its id, and echoes the id back
/// in the `x-request-id` response header.
pub async fn logging_middleware(req: Request, next: Next) -> Response {
    let started = Instant::now();
    let id = request_id(req.headers());
    let method = req.method().clone();
    let route = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_owned())
        .unwrap_or_else(|| req.uri().path().to_owned());

    let span = info_span!("request", request_id = %id, method = %method, route = %route);

    let mut response = async move {
        tracing::debug!("request started");
        let response = next.run(req).await;

        let status = response.status();
        let latency_ms = started.elapsed().as_millis() as u64;
        if status.is_server_error() {
            tracing::event!(Level::ERROR, status = status.as_u16(), latency_ms, "request failed");
        } else if status.is_client_error() {
            tracing::event!(Level::WARN, status = status.as_u16(), latency_ms, "request rejected");
        } else {
            tracing::event!(Level::INFO, status = status.as_u16(), latency_ms, "request served");
        }

        response
    }
    .instrument(span)
    .await;

    if let Ok(value) = HeaderValue::from_str(&id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response
}

fn build_tracer(settings: &LogSettings) -> Result<Tracer, TraceError> {
    global::set_text_map_propagator(TraceContextPropagator::new());

    let resource = Resource::new([
        KeyValue::new(SERVICE_NAME, settings.service_name.clone()),
        KeyValue::new(SERVICE_VERSION, env!("CARGO_PKG_VERSION")),
        KeyValue::new("deployment.environment", settings.environment.clone()),
    ]);

    opentelemetry_otlp::new_pipeline()
        .tracing()
        .with_exporter(
            opentelemetry_otlp::new_exporter()
                .tonic()
                .with_endpoint(settings.otlp_endpoint.clone()),
        )
        .with_trace_config(
            sdktrace::Config::default()
                .with_sampler(Sampler::AlwaysOn)
                .with_id_generator(RandomIdGenerator::default())
                .with_resource(resource),
        )
        .install_batch(runtime::Tokio)
}

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Console, `portal-errors.log` (errors only) and `portal.json` (structured,
/// `info` and up). Files rotate daily.
fn local_layers(log_dir: &str) -> Vec<BoxedLayer> {
    let console_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter("info")));

    let console = fmt::layer()
        .compact()
        .with_target(false)
        .with_file(true)
        .with_line_number(true)
        .with_filter(console_filter)
        .boxed();

    let errors = fmt::layer()
        .with_writer(RollingFileAppender::new(Rotation::DAILY, log_dir, "portal-errors.log"))
        .with_ansi(false)
        .with_file(true)
        .with_line_number(true)
        .with_filter(EnvFilter::new("error"))
        .boxed();

    let structured = fmt::layer()
        .json()
        .with_writer(RollingFileAppender::new(Rotation::DAILY, log_dir, "portal.json"))
        .with_current_span(true)
        .with_span_list(true)
        .with_filter(EnvFilter::new(default_filter("info")))
        .boxed();

    vec![console, errors, structured]
}

/// Installs the global subscriber.
///
/// Falls back to console-only output when observability is switched off.
/// The OpenTelemetry layer is added only when the OTLP pipeline builds.
///
/// # Errors
///
/// Fails when the log directory cannot be created.
pub fn init_tracing() -> anyhow::Result<()> {
    if !is_observability_enabled() {
        init_basic_console_logging();
        return Ok(());
    }

    let settings = LogSettings::from_env();
    std::fs::create_dir_all(&settings.log_dir)
        .map_err(|e| anyhow::anyhow!("Failed to create log directory {}: {}", settings.log_dir, e))?;

    let mut layers = local_layers(&settings.log_dir);
    let otel_error = match build_tracer(&settings) {
        Ok(tracer) => {
            layers.push(tracing_opentelemetry::layer().with_tracer(tracer).boxed());
            None
        }
        Err(e) => Some(e),
    };

    tracing_subscriber::registry().with(layers).init();

    match otel_error {
        None => info!(endpoint = %settings.otlp_endpoint, "tracing initialized with OTLP export"),
        Some(e) => warn!(error = %e, "OTLP export unavailable, logging locally only"),
    }

    Ok(())
}

/// Flushes pending spans. A no-op when observability is off.
pub async fn shutdown_tracer() {
    if !is_observability_enabled() {
        return;
    }

    info!("flushing traces");
    global::shutdown_tracer_provider();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_id_reuses_caller_value() {
        let mut headers = HeaderMap::new();
        headers.insert(REQUEST_ID_HEADER, HeaderValue::from_static("abc-123"));
        assert_eq!(request_id(&headers), "abc-123");
    }

    #[test]
    fn test_request_id_replaces_unusable_values() {
        let mut headers = HeaderMap::new();
        headers.insert(REQUEST_ID_HEADER, HeaderValue::from_static("has space"));
        let id = request_id(&headers);
        assert_ne!(id, "has space");
        assert!(uuid::Uuid::parse_str(&id).is_ok());

        let minted = request_id(&HeaderMap::new());
        assert!(uuid::Uuid::parse_str(&minted).is_ok());
    }

    #[test]
    fn test_request_id_rejects_oversized_values() {
        let mut headers = HeaderMap::new();
        let long = "a".repeat(200);
        headers.insert(REQUEST_ID_HEADER, HeaderValue::from_str(&long).unwrap());
        assert_ne!(request_id(&headers), long);
    }
}
