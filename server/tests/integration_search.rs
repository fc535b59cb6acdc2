use axum::body::{Body, Bytes};
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use hybrid_core::corpus::demo_essays;
use hybrid_core::encoder::Bm25Encoder;
use hybrid_core::persist::{save_encoder, StatePaths};
use serde_json::Value;
use tempfile::tempdir;
use tower::ServiceExt;

fn save_fitted_state(dir: &std::path::Path) {
    let essays = demo_essays();
    let contents: Vec<&str> = essays.iter().map(|d| d.content.as_str()).collect();
    let mut enc = Bm25Encoder::default();
    enc.fit(&contents).unwrap();
    save_encoder(&StatePaths::new(dir), &enc, "2026-01-01T00:00:00Z").unwrap();
}

async fn call(app: Router, uri: &str) -> (StatusCode, Bytes) {
    let resp = app.oneshot(Request::get(uri).body(Body::empty()).unwrap()).await.unwrap();
    let status = resp.status();
    let body = resp.into_body().collect().await.unwrap().to_bytes();
    (status, body)
}

#[tokio::test]
async fn health_is_ok() {
    let dir = tempdir().unwrap();
    save_fitted_state(dir.path());
    let app = hybrid_server::build_app(dir.path().to_str().unwrap(), None).unwrap();

    let (status, body) = call(app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(&body[..], b"ok");
}

#[tokio::test]
async fn encode_returns_sparse_vector_for_seen_terms() {
    let dir = tempdir().unwrap();
    save_fitted_state(dir.path());
    let app = hybrid_server::build_app(dir.path().to_str().unwrap(), None).unwrap();

    let (status, body) = call(app, "/encode?q=climate%20change").await;
    assert_eq!(status, StatusCode::OK);
    let json: Value = serde_json::from_slice(&body).unwrap();
    let indices = json["indices"].as_array().unwrap();
    let values = json["values"].as_array().unwrap();
    assert!(!indices.is_empty());
    assert_eq!(indices.len(), values.len());
}

#[tokio::test]
async fn encode_drops_unknown_terms() {
    let dir = tempdir().unwrap();
    save_fitted_state(dir.path());
    let app = hybrid_server::build_app(dir.path().to_str().unwrap(), None).unwrap();

    let (status, body) = call(app, "/encode?q=zzzznotaword").await;
    assert_eq!(status, StatusCode::OK);
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert!(json["indices"].as_array().unwrap().is_empty());
    assert!(json["values"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn search_without_backend_is_unavailable() {
    let dir = tempdir().unwrap();
    save_fitted_state(dir.path());
    let app = hybrid_server::build_app(dir.path().to_str().unwrap(), None).unwrap();

    let (status, _) = call(app, "/search?q=climate").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn build_app_requires_fitted_state() {
    let dir = tempdir().unwrap();
    assert!(hybrid_server::build_app(dir.path().to_str().unwrap(), None).is_err());
}
