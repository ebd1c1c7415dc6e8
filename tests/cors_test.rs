mod common;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use common::{header, TestApp};

#[tokio::test]
async fn test_bare_options_is_no_content() {
    let app = TestApp::new();

    let response = app
        .send(
            Request::builder()
                .method(Method::OPTIONS)
                .uri("/export")
                .body(Body::empty())
                .unwrap(),
        )
        .await;

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert_eq!(header(&response, "access-control-allow-origin"), Some("*"));
}

#[tokio::test]
async fn test_preflight_lists_methods_and_mirrors_headers() {
    let app = TestApp::new();

    let response = app
        .send(
            Request::builder()
                .method(Method::OPTIONS)
                .uri("/upload-single")
                .header("origin", "https://app.example")
                .header("access-control-request-method", "POST")
                .header("access-control-request-headers", "x-custom, content-type")
                .body(Body::empty())
                .unwrap(),
        )
        .await;

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert_eq!(
        header(&response, "access-control-allow-headers"),
        Some("x-custom, content-type")
    );

    let methods = header(&response, "access-control-allow-methods").unwrap();
    for method in ["GET", "HEAD", "PUT", "PATCH", "POST", "DELETE"] {
        assert!(methods.contains(method), "{method} missing from {methods}");
    }
}

#[tokio::test]
async fn test_static_files_carry_cors_headers() {
    let app = TestApp::new();
    app.write_file("static/a.txt", b"a");

    let response = app.get("/static/a.txt").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(header(&response, "access-control-allow-origin"), Some("*"));
    assert_eq!(
        header(&response, "access-control-expose-headers"),
        Some("content-disposition")
    );
}
