//! HTTP adapter for [`FeatureAccessGate`](portal_auth::FeatureAccessGate).
//!
//! Runs before routing on every request. Paths outside the route map pass
//! straight through. Deny responses carry fixed bodies so a caller cannot
//! tell an unknown student from an inactive one or a missing flag.

use axum::{
    extract::{OriginalUri, Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use portal_auth::{Decision, DenyReason};
use portal_core::AppError;
use portal_observability::track_gate_decision;

use crate::middleware::auth::extract_token;
use crate::state::AppState;

/// The response for a denied request. `401` when the caller could not be
/// authenticated, otherwise one uniform `403`.
pub fn deny_response(reason: DenyReason) -> Response {
    if reason.is_authentication() {
        AppError::unauthorized("Authentication required".to_string()).into_response()
    } else {
        AppError::forbidden("Access denied".to_string()).into_response()
    }
}

pub async fn feature_gate(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let path = req
        .extensions()
        .get::<OriginalUri>()
        .map(|uri| uri.path().to_owned())
        .unwrap_or_else(|| req.uri().path().to_owned());

    let Some(feature) = state.gate.feature_for(&path) else {
        return next.run(req).await;
    };

    let token = extract_token(req.headers());
    let decision = state.gate.authorize(&path, token.as_deref()).await;

    match decision {
        Decision::Deny(reason) => {
            track_gate_decision(feature.as_str(), decision.as_str(), reason.as_str());
            tracing::info!(path = %path, feature = %feature, reason = %reason, "feature access denied");
            deny_response(reason)
        }
        Decision::Allow | Decision::PassThrough => {
            track_gate_decision(feature.as_str(), decision.as_str(), "none");
            next.run(req).await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use http_body_util::BodyExt;

    async fn body_bytes(response: Response) -> Vec<u8> {
        response.into_body().collect().await.unwrap().to_bytes().to_vec()
    }

    #[tokio::test]
    async fn test_authentication_failures_are_401() {
        for reason in [DenyReason::MissingCredential, DenyReason::InvalidCredential] {
            let response = deny_response(reason);
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        }
    }

    #[tokio::test]
    async fn test_permission_failures_share_one_body() {
        let reasons = [
            DenyReason::StudentNotFound,
            DenyReason::RecordNotFound,
            DenyReason::InactiveStatus,
            DenyReason::FeatureNotGranted,
            DenyReason::LookupFailed,
        ];

        let mut bodies = Vec::new();
        for reason in reasons {
            let response = deny_response(reason);
            assert_eq!(response.status(), StatusCode::FORBIDDEN);
            bodies.push(body_bytes(response).await);
        }

        assert!(bodies.windows(2).all(|pair| pair[0] == pair[1]));
        let body: serde_json::Value = serde_json::from_slice(&bodies[0]).unwrap();
        assert_eq!(body["error"], "Access denied");
        assert_eq!(body["code"], "access_denied");
    }
}
