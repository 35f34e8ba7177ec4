//! Prometheus metrics.
//!
//! HTTP traffic is recorded by [`metrics_middleware`]; domain events by the
//! `track_*` functions. Every recorder call is skipped when observability is
//! switched off at runtime, so nothing accumulates without an exporter.

use std::time::{Duration, Instant};

use axum::{
    Router,
    extract::{MatchedPath, Request},
    middleware::Next,
    response::Response,
    routing::get,
};
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};

use crate::is_observability_enabled;

const REQUEST_DURATION: &str = "portal_http_request_duration_seconds";
const REQUESTS_TOTAL: &str = "portal_http_requests_total";
const REQUESTS_IN_FLIGHT: &str = "portal_http_requests_in_flight";

/// Latency buckets, 2ms to 5s.
const DURATION_BUCKETS: [f64; 11] = [0.002, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0];

const UPKEEP_INTERVAL: Duration = Duration::from_secs(10);

/// Installs the Prometheus recorder and starts its upkeep task.
///
/// `None` when observability is off or a recorder is already installed.
pub fn init_metrics() -> Option<PrometheusHandle> {
    if !is_observability_enabled() {
        return None;
    }

    let handle = match PrometheusBuilder::new()
        .set_buckets_for_metric(Matcher::Full(REQUEST_DURATION.to_string()), &DURATION_BUCKETS)
        .and_then(PrometheusBuilder::install_recorder)
    {
        Ok(handle) => handle,
        Err(e) => {
            tracing::error!(error = %e, "prometheus recorder not installed");
            return None;
        }
    };

    let upkeep = handle.clone();
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(UPKEEP_INTERVAL);
        loop {
            ticker.tick().await;
            upkeep.run_upkeep();
        }
    });

    Some(handle)
}

/// `"2xx"`, `"4xx"` and so on.
pub fn status_class(status: u16) -> &'static str {
    match status {
        100..=199 => "1xx",
        200..=299 => "2xx",
        300..=399 => "3xx",
        400..=499 => "4xx",
        500..=599 => "5xx",
        _ => "other",
    }
}

/// Counts requests and records latency, labelled by route template rather
/// than raw path so ids do not explode label cardinality.
pub async fn metrics_middleware(req: Request, next: Next) -> Response {
    if !is_observability_enabled() {
        return next.run(req).await;
    }

    let started = Instant::now();
    let method = req.method().to_string();
    let route = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_owned())
        .unwrap_or_else(|| "unmatched".to_owned());

    gauge!(REQUESTS_IN_FLIGHT).increment(1.0);
    let response = next.run(req).await;
    gauge!(REQUESTS_IN_FLIGHT).decrement(1.0);

    let status = response.status().as_u16();
    counter!(
        REQUESTS_TOTAL,
        "method" => method.clone(),
        "route" => route.clone(),
        "status" => status_class(status)
    )
    .increment(1);
    histogram!(REQUEST_DURATION, "method" => method, "route" => route)
        .record(started.elapsed().as_secs_f64());

    response
}

/// Router serving `GET /metrics` in the Prometheus text format.
pub fn metrics_app(handle: PrometheusHandle) -> Router {
    Router::new().route("/metrics", get(move || std::future::ready(handle.render())))
}

pub fn track_user_login_success(role: &str) {
    if is_observability_enabled() {
        counter!("portal_logins_total", "outcome" => "success", "role" => role.to_owned())
            .increment(1);
    }
}

pub fn track_user_login_failure(reason: &str) {
    if is_observability_enabled() {
        counter!("portal_logins_total", "outcome" => "failure", "reason" => reason.to_owned())
            .increment(1);
    }
}

pub fn track_jwt_issued() {
    if is_observability_enabled() {
        counter!("portal_tokens_issued_total").increment(1);
    }
}

pub fn track_jwt_validation(success: bool) {
    if is_observability_enabled() {
        let outcome = if success { "valid" } else { "invalid" };
        counter!("portal_token_checks_total", "outcome" => outcome).increment(1);
    }
}

/// One gate decision. `reason` is `"none"` unless the request was denied.
pub fn track_gate_decision(feature: &str, decision: &str, reason: &str) {
    if is_observability_enabled() {
        counter!(
            "portal_gate_decisions_total",
            "feature" => feature.to_owned(),
            "decision" => decision.to_owned(),
            "reason" => reason.to_owned()
        )
        .increment(1);
    }
}

pub fn track_access_control_update(found: bool) {
    if is_observability_enabled() {
        let outcome = if found { "updated" } else { "not_found" };
        counter!("portal_access_control_updates_total", "outcome" => outcome).increment(1);
    }
}

pub fn track_admission_decided(status: &str) {
    if is_observability_enabled() {
        counter!("portal_admissions_decided_total", "status" => status.to_owned()).increment(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_class() {
        assert_eq!(status_class(200), "2xx");
        assert_eq!(status_class(204), "2xx");
        assert_eq!(status_class(401), "4xx");
        assert_eq!(status_class(503), "5xx");
        assert_eq!(status_class(42), "other");
    }

    #[test]
    fn test_buckets_are_increasing() {
        assert!(DURATION_BUCKETS.windows(2).all(|w| w[0] < w[1]));
    }
}
