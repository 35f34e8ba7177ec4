mod common;

use axum::http::StatusCode;
use portal_config::GateMode;
use portal_models::StudentStatus;
use serde_json::json;
use tower::ServiceExt;

use common::{
    access_record, admin_token, body_json, config_with_gate, default_app, empty, get, json_body,
    spawn_app, student_token, with_bearer,
};

fn patch(uri: &str) -> axum::http::request::Builder {
    axum::http::Request::builder().method("PATCH").uri(uri)
}

#[tokio::test]
async fn test_admin_updates_flags_partially() {
    let app = default_app();
    app.access
        .put(access_record(7, 42, Some(StudentStatus::Active), (true, false, false)))
        .await;

    let response = app
        .router
        .oneshot(json_body(
            with_bearer(patch("/api/access-control/7"), &admin_token(1)),
            json!({"access_library": true}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["id"], 7);
    assert_eq!(body["access_library"], true);
    assert_eq!(body["access_course"], true);
    assert_eq!(body["access_exams"], false);
    assert_eq!(body["status"], "active");
    assert!(!body["updated_at"].is_null());
}

#[tokio::test]
async fn test_admin_can_clear_status() {
    let app = default_app();
    app.access
        .put(access_record(7, 42, Some(StudentStatus::Suspended), (true, true, true)))
        .await;

    let response = app
        .router
        .oneshot(json_body(
            with_bearer(patch("/api/access-control/7"), &admin_token(1)),
            json!({"status": null}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_json(response).await["status"].is_null());
}

#[tokio::test]
async fn test_empty_update_is_rejected() {
    let app = default_app();
    app.access
        .put(access_record(7, 42, Some(StudentStatus::Active), (true, true, true)))
        .await;

    let response = app
        .router
        .oneshot(json_body(
            with_bearer(patch("/api/access-control/7"), &admin_token(1)),
            json!({}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_unknown_record_is_not_found() {
    let app = default_app();

    let response = app
        .router
        .oneshot(json_body(
            with_bearer(patch("/api/access-control/999"), &admin_token(1)),
            json!({"access_exams": true}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_students_cannot_update_access() {
    let app = default_app();
    app.students.link(5, 42).await;
    app.access
        .put(access_record(7, 42, Some(StudentStatus::Active), (false, false, false)))
        .await;

    let response = app
        .router
        .oneshot(json_body(
            with_bearer(patch("/api/access-control/7"), &student_token(5)),
            json!({"access_library": true}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_update_takes_effect_at_the_gate() {
    let app = spawn_app(config_with_gate(
        GateMode::Lenient,
        &[("/dashboard", "exams")],
    ));
    app.students.link(5, 42).await;
    app.access
        .put(access_record(7, 42, Some(StudentStatus::Active), (true, true, true)))
        .await;

    let token = student_token(5);
    let before = app
        .router
        .clone()
        .oneshot(empty(with_bearer(get("/dashboard"), &token)))
        .await
        .unwrap();
    assert_eq!(before.status(), StatusCode::OK);

    let update = app
        .router
        .clone()
        .oneshot(json_body(
            with_bearer(patch("/api/access-control/7"), &admin_token(1)),
            json!({"status": "suspended"}),
        ))
        .await
        .unwrap();
    assert_eq!(update.status(), StatusCode::OK);

    let after = app
        .router
        .oneshot(empty(with_bearer(get("/dashboard"), &token)))
        .await
        .unwrap();
    assert_eq!(after.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_student_reads_own_record() {
    let app = default_app();
    app.students.link(5, 42).await;
    app.access
        .put(access_record(7, 42, Some(StudentStatus::Supplementary), (true, false, true)))
        .await;

    let response = app
        .router
        .oneshot(empty(with_bearer(get("/api/access-control/me"), &student_token(5))))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["student_id"], 42);
    assert_eq!(body["status"], "supplementary");
}

#[tokio::test]
async fn test_account_without_student_record_gets_not_found() {
    let app = default_app();

    let response = app
        .router
        .oneshot(empty(with_bearer(get("/api/access-control/me"), &student_token(5))))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_admin_reads_any_student_record() {
    let app = default_app();
    app.access
        .put(access_record(7, 42, Some(StudentStatus::Alumni), (false, true, false)))
        .await;

    let found = app
        .router
        .clone()
        .oneshot(empty(with_bearer(
            get("/api/access-control/students/42"),
            &admin_token(1),
        )))
        .await
        .unwrap();
    assert_eq!(found.status(), StatusCode::OK);

    let missing = app
        .router
        .clone()
        .oneshot(empty(with_bearer(
            get("/api/access-control/students/43"),
            &admin_token(1),
        )))
        .await
        .unwrap();
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);

    let forbidden = app
        .router
        .oneshot(empty(with_bearer(
            get("/api/access-control/students/42"),
            &student_token(5),
        )))
        .await
        .unwrap();
    assert_eq!(forbidden.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_store_failure_is_masked() {
    let app = default_app();
    app.access.set_failing(true);

    let response = app
        .router
        .oneshot(empty(with_bearer(
            get("/api/access-control/students/42"),
            &admin_token(1),
        )))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body_json(response).await,
        json!({"error": "Internal server error", "code": "internal_error"})
    );
}
