mod common;

use axum::http::StatusCode;
use portal_config::GateMode;
use portal_models::StudentStatus;
use serde_json::json;
use tower::ServiceExt;

use common::{
    access_record, body_bytes, body_json, config_with_gate, default_app, empty, expired_token,
    get, spawn_app, student_token, with_bearer, with_cookie,
};

const STUDENT_USER: i64 = 5;
const STUDENT_ID: i64 = 42;

/// Gates `/dashboard` itself as `library`, so an allowed request reaches the
/// overview handler, which needs only the in-memory stores.
fn overview_gated_as_library() -> common::TestApp {
    spawn_app(config_with_gate(
        GateMode::Lenient,
        &[("/dashboard", "library")],
    ))
}

#[tokio::test]
async fn test_allowed_student_reaches_handler() {
    let app = overview_gated_as_library();
    app.students.link(STUDENT_USER, STUDENT_ID).await;
    app.access
        .put(access_record(1, STUDENT_ID, Some(StudentStatus::Active), (false, true, false)))
        .await;

    let response = app
        .router
        .oneshot(empty(with_bearer(get("/dashboard"), &student_token(STUDENT_USER))))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["student_id"], STUDENT_ID);
    assert_eq!(body["status"], "active");
}

#[tokio::test]
async fn test_flipping_the_flag_denies() {
    let app = overview_gated_as_library();
    app.students.link(STUDENT_USER, STUDENT_ID).await;
    app.access
        .put(access_record(1, STUDENT_ID, Some(StudentStatus::Active), (true, false, true)))
        .await;

    let response = app
        .router
        .oneshot(empty(with_bearer(get("/dashboard"), &student_token(STUDENT_USER))))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_library_catalog_denied_without_library_flag() {
    let app = default_app();
    app.students.link(STUDENT_USER, STUDENT_ID).await;
    app.access
        .put(access_record(1, STUDENT_ID, Some(StudentStatus::Active), (true, false, true)))
        .await;

    let response = app
        .router
        .oneshot(empty(with_bearer(
            get("/dashboard/library/catalog"),
            &student_token(STUDENT_USER),
        )))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body = body_json(response).await;
    assert_eq!(body, json!({"error": "Access denied", "code": "access_denied"}));
}

#[tokio::test]
async fn test_every_permission_denial_has_identical_body() {
    let app = default_app();
    // user 1: no student record
    // user 2: student without access record
    app.students.link(2, 20).await;
    // user 3: suspended with every flag set
    app.students.link(3, 30).await;
    app.access
        .put(access_record(1, 30, Some(StudentStatus::Suspended), (true, true, true)))
        .await;
    // user 4: active, exams flag off
    app.students.link(4, 40).await;
    app.access
        .put(access_record(2, 40, Some(StudentStatus::Active), (true, true, false)))
        .await;
    // user 6: dropped out
    app.students.link(6, 60).await;
    app.access
        .put(access_record(3, 60, Some(StudentStatus::DroppedOut), (true, true, true)))
        .await;

    let cases = [
        (1, "/dashboard/library"),
        (2, "/dashboard/library"),
        (3, "/dashboard/course-catalogue"),
        (4, "/dashboard/exams"),
        (6, "/dashboard/exams"),
        // documents has no flag and is never granted
        (4, "/dashboard/documents"),
    ];

    let mut bodies = Vec::new();
    for (user_id, path) in cases {
        let response = app
            .router
            .clone()
            .oneshot(empty(with_bearer(get(path), &student_token(user_id))))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN, "user {user_id} on {path}");
        bodies.push(body_bytes(response).await);
    }

    assert!(bodies.windows(2).all(|pair| pair[0] == pair[1]));
}

#[tokio::test]
async fn test_store_failure_denies() {
    let app = default_app();
    app.students.link(STUDENT_USER, STUDENT_ID).await;
    app.access
        .put(access_record(1, STUDENT_ID, Some(StudentStatus::Active), (true, true, true)))
        .await;
    app.access.set_failing(true);

    let response = app
        .router
        .oneshot(empty(with_bearer(
            get("/dashboard/library"),
            &student_token(STUDENT_USER),
        )))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Access denied");
}

#[tokio::test]
async fn test_invalid_tokens_are_unauthenticated() {
    let app = default_app();

    for token in ["garbage".to_string(), expired_token(STUDENT_USER)] {
        let response = app
            .router
            .clone()
            .oneshot(empty(with_bearer(get("/dashboard/exams"), &token)))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body = body_json(response).await;
        assert_eq!(
            body,
            json!({"error": "Authentication required", "code": "unauthenticated"})
        );
    }
}

#[tokio::test]
async fn test_anonymous_request_passes_gate_in_lenient_mode() {
    // /health is normally public; gating it shows the gate itself lets the
    // anonymous request through.
    let app = spawn_app(config_with_gate(GateMode::Lenient, &[("/health", "library")]));

    let response = app.router.oneshot(empty(get("/health"))).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_anonymous_request_denied_in_strict_mode() {
    let app = spawn_app(config_with_gate(GateMode::Strict, &[("/health", "library")]));

    let response = app.router.oneshot(empty(get("/health"))).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_anonymous_dashboard_request_still_needs_login() {
    let app = default_app();

    for token in [None, Some("undefined"), Some("null")] {
        let mut builder = get("/dashboard/library");
        if let Some(token) = token {
            builder = with_bearer(builder, token);
        }
        let response = app.router.clone().oneshot(empty(builder)).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}

#[tokio::test]
async fn test_cookie_credential_is_honoured() {
    let app = default_app();
    app.students.link(STUDENT_USER, STUDENT_ID).await;
    app.access
        .put(access_record(1, STUDENT_ID, Some(StudentStatus::Active), (false, false, false)))
        .await;

    let response = app
        .router
        .oneshot(empty(with_cookie(
            get("/dashboard/exams"),
            &student_token(STUDENT_USER),
        )))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_header_wins_over_cookie() {
    let app = overview_gated_as_library();
    app.students.link(STUDENT_USER, STUDENT_ID).await;
    app.access
        .put(access_record(1, STUDENT_ID, Some(StudentStatus::Active), (false, true, false)))
        .await;

    // invalid header, valid cookie: header decides
    let response = app
        .router
        .clone()
        .oneshot(empty(with_cookie(
            with_bearer(get("/dashboard"), "garbage"),
            &student_token(STUDENT_USER),
        )))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // valid header, invalid cookie: header decides
    let response = app
        .router
        .oneshot(empty(with_cookie(
            with_bearer(get("/dashboard"), &student_token(STUDENT_USER)),
            "garbage",
        )))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_settings_is_not_gated() {
    let app = default_app();

    // no student record and no access record: still reachable
    let response = app
        .router
        .clone()
        .oneshot(empty(with_bearer(get("/dashboard/settings"), &student_token(99))))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["name"], "User 99");
    assert_eq!(body["is_admin"], false);

    let response = app
        .router
        .oneshot(empty(get("/dashboard/settings")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_repeated_requests_get_the_same_decision() {
    let app = default_app();
    app.students.link(STUDENT_USER, STUDENT_ID).await;
    app.access
        .put(access_record(1, STUDENT_ID, Some(StudentStatus::Alumni), (false, false, true)))
        .await;

    let token = student_token(STUDENT_USER);
    let mut statuses = Vec::new();
    for _ in 0..3 {
        let response = app
            .router
            .clone()
            .oneshot(empty(with_bearer(get("/dashboard/library"), &token)))
            .await
            .unwrap();
        statuses.push(response.status());
    }

    assert_eq!(statuses, vec![StatusCode::FORBIDDEN; 3]);
}
