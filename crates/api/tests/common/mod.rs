//! Shared helpers for the HTTP integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use dashlens_db::store::MemoryStore;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use dashlens_api::config::ServerConfig;
use dashlens_api::router::build_app_router;
use dashlens_api::state::AppState;

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
    }
}

/// Build the full application router over the given store. Clones of one
/// `MemoryStore` share data, so a test can build several apps against it.
pub fn build_test_app(store: MemoryStore) -> Router {
    let config = test_config();
    let state = AppState::new(Arc::new(store), config.clone());
    build_app_router(state, &config)
}

pub async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(app, request).await
}

pub async fn delete(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::DELETE)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

async fn with_json(app: Router, method: Method, uri: &str, body: Value) -> Response<Body> {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

/// POST a body that is sent as JSON but is not necessarily valid JSON.
pub async fn post_raw(app: Router, uri: &str, body: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

pub async fn post_json(app: Router, uri: &str, body: Value) -> Response<Body> {
    with_json(app, Method::POST, uri, body).await
}

pub async fn put_json(app: Router, uri: &str, body: Value) -> Response<Body> {
    with_json(app, Method::PUT, uri, body).await
}

/// Collect and parse a JSON response body.
pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Create a dashboard through the API and return its id.
pub async fn create_dashboard(store: &MemoryStore, name: &str) -> String {
    let response = post_json(
        build_test_app(store.clone()),
        "/api/v1/dashboards",
        serde_json::json!({ "name": name }),
    )
    .await;
    body_json(response).await["data"]
        .as_str()
        .unwrap()
        .to_string()
}

/// Add a component through the API and return its id.
pub async fn add_component(store: &MemoryStore, dashboard_id: &str, name: &str, kind: &str) -> String {
    let response = post_json(
        build_test_app(store.clone()),
        &format!("/api/v1/dashboards/{dashboard_id}/components"),
        serde_json::json!({ "name": name, "component_type": kind }),
    )
    .await;
    body_json(response).await["data"]
        .as_str()
        .unwrap()
        .to_string()
}
