#![allow(clippy::unwrap_used, clippy::panic, clippy::missing_panics_doc, unreachable_pub)]
use axum::http::StatusCode;

mod common;

#[tokio::test]
async fn test_health_ok() {
    let app = common::TestApp::spawn().await;

    let resp = app.client.get(format!("{}/health", app.server_url)).send().await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);

    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_health_store_failure() {
    let app = common::TestApp::spawn().await;
    app.store.set_healthy(false);

    let resp = app.client.get(format!("{}/health", app.server_url)).send().await.unwrap();

    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["status"], "error");
}

#[tokio::test]
async fn test_health_recovers_after_store_comes_back() {
    let app = common::TestApp::spawn().await;

    app.store.set_healthy(false);
    let resp = app.client.get(format!("{}/health", app.server_url)).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

    app.store.set_healthy(true);
    let resp = app.client.get(format!("{}/health", app.server_url)).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["status"], "ok");
}
