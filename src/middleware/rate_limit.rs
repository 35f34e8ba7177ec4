//! Per-client rate limiting for the login endpoint.
//!
//! Clients are keyed on the socket peer address unless
//! [`RateLimitConfig::trust_proxy`] is set, in which case forwarding headers
//! written by the proxy are used. Idle client entries are pruned periodically.

use std::net::IpAddr;
use std::sync::{Arc, Weak};
use std::time::Duration;

use axum::{
    http::{HeaderName, StatusCode, header},
    middleware,
    response::{IntoResponse, Response},
    routing::MethodRouter,
};
use governor::DefaultKeyedRateLimiter;
use portal_config::RateLimitConfig;
use portal_core::AppError;
use tower_governor::GovernorLayer;

use crate::state::AppState;

const PRUNE_INTERVAL: Duration = Duration::from_secs(60);

/// Wraps the login route in the configured limiter. Rejections are rendered
/// as the usual JSON error body.
pub fn limit_login(route: MethodRouter<AppState>, config: &RateLimitConfig) -> MethodRouter<AppState> {
    let limited = if config.trust_proxy {
        match config.proxied_auth_governor_config() {
            Some(governor) => {
                spawn_pruning(Arc::downgrade(governor.limiter()));
                route.route_layer(GovernorLayer::new(governor))
            }
            None => return unlimited(route),
        }
    } else {
        match config.auth_governor_config() {
            Some(governor) => {
                spawn_pruning(Arc::downgrade(governor.limiter()));
                route.route_layer(GovernorLayer::new(governor))
            }
            None => return unlimited(route),
        }
    };

    limited.route_layer(middleware::map_response(rate_limited_body))
}

fn unlimited(route: MethodRouter<AppState>) -> MethodRouter<AppState> {
    tracing::error!("login rate limiter could not be built, login is unlimited");
    route
}

/// Drops idle client entries until the limiter itself is dropped.
fn spawn_pruning(limiter: Weak<DefaultKeyedRateLimiter<IpAddr>>) {
    let Ok(runtime) = tokio::runtime::Handle::try_current() else {
        return;
    };

    runtime.spawn(async move {
        let mut ticker = tokio::time::interval(PRUNE_INTERVAL);
        ticker.tick().await;
        loop {
            ticker.tick().await;
            let Some(limiter) = limiter.upgrade() else {
                break;
            };
            limiter.retain_recent();
            tracing::debug!(clients = limiter.len(), "pruned login rate limiter");
        }
    });
}

/// Replaces the limiter's plain-text 429 with the JSON error body, keeping
/// its retry headers.
async fn rate_limited_body(response: Response) -> Response {
    if response.status() != StatusCode::TOO_MANY_REQUESTS {
        return response;
    }

    tracing::warn!("login rate limit exceeded");
    let mut rendered = AppError::too_many_requests(
        "Too many login attempts, please try again later".to_string(),
    )
    .into_response();

    let retry_headers = [header::RETRY_AFTER, HeaderName::from_static("x-ratelimit-after")];
    for name in retry_headers {
        if let Some(value) = response.headers().get(&name) {
            rendered.headers_mut().insert(name, value.clone());
        }
    }
    rendered
}
