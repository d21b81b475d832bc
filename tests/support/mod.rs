#![allow(dead_code)]

use axum::body::Body;
use axum::http::response::Parts;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use std::sync::Arc;
use tower::ServiceExt;
use volunteer_hub::{build_router, AppConfig, AppState, MemoryStore, Repositories, RuntimeMode};

/// Memory-backed application with production defaults; the store handle is
/// returned for seeding and failure injection.
pub fn test_app() -> (Router, Arc<MemoryStore>) {
    test_app_with_mode(RuntimeMode::Production)
}

pub fn test_app_with_mode(runtime_mode: RuntimeMode) -> (Router, Arc<MemoryStore>) {
    let (repos, store) = Repositories::in_memory();
    let config = AppConfig {
        runtime_mode,
        ..AppConfig::default()
    };
    let app = build_router(AppState { repos, config });
    (app, store)
}

pub async fn send(app: &Router, request: Request<Body>) -> (Parts, String) {
    let response = app
        .clone()
        .oneshot(request)
        .await
        .expect("router is infallible");
    let (parts, body) = response.into_parts();
    let bytes = body.collect().await.expect("read body").to_bytes();
    (parts, String::from_utf8(bytes.to_vec()).expect("utf8 body"))
}

pub async fn get(app: &Router, path: &str) -> (Parts, String) {
    let request = Request::builder()
        .uri(path)
        .body(Body::empty())
        .expect("build request");
    send(app, request).await
}

pub async fn get_with_cookie(app: &Router, path: &str, cookie: &str) -> (Parts, String) {
    let request = Request::builder()
        .uri(path)
        .header(header::COOKIE, cookie)
        .body(Body::empty())
        .expect("build request");
    send(app, request).await
}

pub async fn post_form(app: &Router, path: &str, form: &str) -> (Parts, String) {
    let request = Request::builder()
        .method("POST")
        .uri(path)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(form.to_string()))
        .expect("build request");
    send(app, request).await
}

pub fn location(parts: &Parts) -> &str {
    parts
        .headers
        .get(header::LOCATION)
        .expect("location header")
        .to_str()
        .expect("ascii location")
}

pub fn assert_html_error(parts: &Parts, body: &str, status: StatusCode) {
    assert_eq!(parts.status, status);
    assert!(
        body.contains(&format!("Error {}", status.as_u16())),
        "expected error view for {status}, got: {body}"
    );
}
