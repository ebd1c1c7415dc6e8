mod common;

use axum::http::StatusCode;
use common::{body_json, TestApp};
use serde_json::json;
use std::time::Duration;
use tokio::time::Instant;

#[tokio::test(start_paused = true)]
async fn test_long_waits_for_duration() {
    let app = TestApp::new();

    let started = Instant::now();
    let response = app.get("/long?duration=1500").await;

    assert!(started.elapsed() >= Duration::from_millis(1500));
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({ "message": "OK" }));
}

#[tokio::test(start_paused = true)]
async fn test_long_defaults_to_three_seconds() {
    let app = TestApp::new();

    let started = Instant::now();
    let response = app.get("/long?duration=nope").await;

    assert!(started.elapsed() >= Duration::from_millis(3000));
    assert_eq!(body_json(response).await, json!({ "message": "OK" }));
}

#[tokio::test(start_paused = true)]
async fn test_long_reads_duration_from_body() {
    let app = TestApp::new();

    let started = Instant::now();
    let response = app.post_json("/long", json!({ "duration": 250 })).await;

    let elapsed = started.elapsed();
    assert!(elapsed >= Duration::from_millis(250));
    assert!(elapsed < Duration::from_millis(3000));
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_long_does_not_block_other_requests() {
    let app = TestApp::new();

    let router = app.router.clone();
    let slow = tokio::spawn(async move {
        use tower::ServiceExt;
        let request = axum::http::Request::get("/long?duration=400")
            .body(axum::body::Body::empty())
            .unwrap();
        router.oneshot(request).await.unwrap()
    });

    tokio::task::yield_now().await;
    let fast = app.get("/export?count=1").await;

    assert_eq!(fast.status(), StatusCode::OK);
    assert!(!slow.is_finished());
    assert_eq!(slow.await.unwrap().status(), StatusCode::OK);
}
