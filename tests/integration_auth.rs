mod common;

use axum::http::{Request, StatusCode, header};
use serde_json::json;
use tower::ServiceExt;

use common::{
    admin_token, body_json, default_app, empty, from_peer, get, json_body, student_token,
    with_bearer, with_cookie,
};

fn post(uri: &str) -> axum::http::request::Builder {
    Request::builder().method("POST").uri(uri)
}

#[tokio::test]
async fn test_me_returns_claims() {
    let app = default_app();

    let response = app
        .router
        .oneshot(empty(with_bearer(get("/api/auth/me"), &admin_token(12))))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["userId"], 12);
    assert_eq!(body["isAdmin"], true);
    assert_eq!(body["email"], "user12@example.edu");
}

#[tokio::test]
async fn test_me_accepts_cookie() {
    let app = default_app();

    let response = app
        .router
        .oneshot(empty(with_cookie(get("/api/auth/me"), &student_token(8))))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["userId"], 8);
    assert!(body.get("isAdmin").is_none());
}

#[tokio::test]
async fn test_me_ignores_placeholder_bearer_when_cookie_is_set() {
    let app = default_app();

    let request = with_cookie(
        with_bearer(get("/api/auth/me"), "undefined"),
        &student_token(9),
    );
    let response = app.router.oneshot(empty(request)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["userId"], 9);
}

#[tokio::test]
async fn test_me_without_token_is_unauthorized() {
    let app = default_app();

    let response = app.router.oneshot(empty(get("/api/auth/me"))).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["code"], "unauthenticated");
}

#[tokio::test]
async fn test_logout_expires_cookie() {
    let app = default_app();

    let response = app
        .router
        .oneshot(empty(with_cookie(post("/api/auth/logout"), "anything")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|value| value.to_str().ok())
        .unwrap()
        .to_string();
    assert!(set_cookie.starts_with("accessToken="));
    assert!(set_cookie.contains("Max-Age=0"));
}

#[tokio::test]
async fn test_login_rejects_malformed_body() {
    let app = default_app();

    let response = app
        .router
        .oneshot(json_body(
            from_peer(post("/api/auth/login"), [198, 51, 100, 1]),
            json!({"email": "a@example.edu"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "password is required");
}

#[tokio::test]
async fn test_login_rejects_invalid_email() {
    let app = default_app();

    let response = app
        .router
        .oneshot(json_body(
            from_peer(post("/api/auth/login"), [198, 51, 100, 2]),
            json!({"email": "not-an-email", "password": "secret"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_admin_routes_reject_students() {
    let app = default_app();

    for uri in ["/api/students", "/api/fees", "/api/admissions", "/api/library/loans"] {
        let response = app
            .router
            .clone()
            .oneshot(empty(with_bearer(get(uri), &student_token(5))))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN, "{uri}");
    }
}

fn link_account(token: &str, body: serde_json::Value) -> Request<axum::body::Body> {
    let builder = Request::builder().method("PUT").uri("/api/students/5/account");
    json_body(with_bearer(builder, token), body)
}

#[tokio::test]
async fn test_link_account_is_admin_only() {
    let app = default_app();

    let response = app
        .router
        .oneshot(link_account(&student_token(5), json!({"user_id": 5})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_link_account_validates_user_id() {
    let app = default_app();

    let response = app
        .router
        .oneshot(link_account(&admin_token(1), json!({"user_id": 0})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_health_is_public() {
    let app = default_app();

    let response = app.router.oneshot(empty(get("/health"))).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["status"], "ok");
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let app = default_app();

    let response = app
        .router
        .oneshot(empty(get("/health").header("x-request-id", "trace-me-42")))
        .await
        .unwrap();

    assert_eq!(
        response.headers().get("x-request-id").unwrap(),
        "trace-me-42"
    );
}
