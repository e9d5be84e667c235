//! HTTP tests for the upload API
//!
//! Requests go through the full router, middleware included, against
//! in-memory storage.

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use hypothesis_lab_api_rest::{create_app, AppState, ReadinessProbe};
use hypothesis_lab_application::{AnalysisService, HypothesisEngine, ServiceConfig};
use hypothesis_lab_common::AppConfig;
use hypothesis_lab_infrastructure::{
    CsvDatasetCodec, HealthStatus, InfrastructureHealth, StorageHealthStatus,
};
use hypothesis_lab_testing::{
    fixtures::{three_group_csv, two_group_csv},
    mocks::{InMemoryAnalysisRepository, InMemoryDatasetStore},
};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

const BOUNDARY: &str = "hypothesis-lab-test-boundary";

struct StaticProbe {
    healthy: bool,
}

#[async_trait]
impl ReadinessProbe for StaticProbe {
    async fn check(&self) -> InfrastructureHealth {
        InfrastructureHealth::new()
            .with_database(HealthStatus {
                healthy: self.healthy,
                latency: Duration::from_millis(1),
                pool_size: 1,
                idle_connections: 1,
                error: None,
            })
            .with_storage(StorageHealthStatus {
                healthy: true,
                root: std::env::temp_dir(),
                error: None,
            })
    }
}

fn app_with(config: AppConfig, healthy: bool) -> Router {
    let service = AnalysisService::new(
        Arc::new(InMemoryAnalysisRepository::new()),
        Arc::new(InMemoryDatasetStore::new()),
        Arc::new(CsvDatasetCodec::new()),
        Arc::new(HypothesisEngine::default()),
        ServiceConfig::default(),
    );
    create_app(AppState::with_services(
        config,
        service,
        StaticProbe { healthy },
    ))
}

fn app() -> Router {
    app_with(AppConfig::development(), true)
}

/// Hand-built `multipart/form-data` body
fn multipart(fields: &[(&str, &str)], file: Option<(&str, &[u8])>) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    if let Some((filename, content)) = file {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\nContent-Type: text/csv\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(content);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

fn upload_request(body: Vec<u8>) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri("/upload")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .header(header::CONTENT_LENGTH, body.len())
        .body(Body::from(body))
        .unwrap()
}

fn empty_request(method: Method, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

async fn upload(app: &Router, test_type: &str, confidence: &str, csv: &[u8]) -> (StatusCode, Value) {
    let body = multipart(
        &[("test_type", test_type), ("confidence_level", confidence)],
        Some(("data.csv", csv)),
    );
    send(app, upload_request(body)).await
}

#[tokio::test]
async fn test_root_greeting() {
    let (status, body) = send(&app(), empty_request(Method::GET, "/")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Hypothesis Testing API");
}

#[tokio::test]
async fn test_health() {
    let (status, body) = send(&app(), empty_request(Method::GET, "/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_ready_reports_dependencies() {
    let (status, body) = send(&app(), empty_request(Method::GET, "/ready")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ready"], true);

    let unhealthy = app_with(AppConfig::development(), false);
    let (status, body) = send(&unhealthy, empty_request(Method::GET, "/ready")).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["ready"], false);
    assert_eq!(body["checks"]["database"], false);
    assert_eq!(body["checks"]["storage"], true);
}

#[tokio::test]
async fn test_list_test_kinds() {
    let (status, body) = send(&app(), empty_request(Method::GET, "/test-kinds")).await;
    assert_eq!(status, StatusCode::OK);

    let names: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|k| k["name"].as_str().unwrap())
        .collect();
    assert_eq!(names.len(), 6);
    assert!(names.contains(&"t-test"));
    assert!(names.contains(&"kruskal-wallis"));
}

#[tokio::test]
async fn test_upload_runs_test() {
    let app = app();
    let (status, body) = upload(&app, "t-test", "0.95", &two_group_csv()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["filename"], "data.csv");
    assert_eq!(body["test_type"], "t-test");
    assert_eq!(body["median"], 6.0);
    assert_eq!(body["result"], "reject null");
    assert_eq!(body["decision"], "reject");
    assert_eq!(body["groups"]["A"], serde_json::json!([1.0, 2.0]));
    assert_eq!(body["data"].as_array().unwrap().len(), 4);
    assert!(body["p_value"].as_f64().unwrap() < 0.05);
}

#[tokio::test]
async fn test_upload_accepts_display_names() {
    let (status, body) = upload(&app(), "Mann-Whitney U", "0.95", &two_group_csv()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["test_type"], "mann-whitney-u");
    assert_eq!(body["test_name"], "Mann-Whitney U");
}

#[tokio::test]
async fn test_upload_without_confidence_uses_default() {
    let body = multipart(&[("test_type", "anova")], Some(("data.csv", &three_group_csv())));
    let (status, body) = send(&app(), upload_request(body)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["confidence_level"], 0.95);
}

#[tokio::test]
async fn test_upload_structural_error_is_returned() {
    let (status, body) = upload(&app(), "t-test", "0.95", &three_group_csv()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["decision"], "structural_error");
    assert!(body["p_value"].is_null());
    assert_eq!(body["result"], "t-test requires exactly 2 groups");
    assert_eq!(body["groups"].as_object().unwrap().len(), 3);
}

#[tokio::test]
async fn test_upload_rejects_bad_input() {
    let app = app();

    let (status, body) = upload(&app, "bogus", "0.95", &two_group_csv()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["detail"].as_str().unwrap().contains("Unknown test type"));

    let (status, _) = upload(&app, "t-test", "abc", &two_group_csv()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = upload(&app, "t-test", "1.5", &two_group_csv()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "INVALID_CONFIDENCE_LEVEL");

    let (status, _) = upload(&app, "t-test", "0.95", b"name,score\nA,1\n").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let body = multipart(&[("test_type", "t-test")], None);
    let (status, body) = send(&app, upload_request(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "Missing form field 'file'");

    let (status, body) = send(&app, empty_request(Method::GET, "/history")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_upload_too_large() {
    let mut config = AppConfig::development();
    config.server.max_upload_bytes = 64;
    let app = app_with(config, true);

    let csv = "group,value\n".to_string() + &"A,1\nB,2\n".repeat(64);
    let (status, _) = upload(&app, "t-test", "0.95", csv.as_bytes()).await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn test_upload_within_limit_passes_middleware() {
    let mut config = AppConfig::development();
    config.server.max_upload_bytes = 4096;
    let app = app_with(config, true);

    let (status, body) = upload(&app, "t-test", "0.95", &two_group_csv()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["result"], "reject null");
}

#[tokio::test]
async fn test_history_newest_first() {
    let app = app();
    let (_, first) = upload(&app, "t-test", "0.95", &two_group_csv()).await;
    let (_, second) = upload(&app, "kruskal-wallis", "0.95", &three_group_csv()).await;

    let (status, body) = send(&app, empty_request(Method::GET, "/history")).await;
    assert_eq!(status, StatusCode::OK);

    let ids: Vec<i64> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["id"].as_i64().unwrap())
        .collect();
    assert_eq!(
        ids,
        vec![second["id"].as_i64().unwrap(), first["id"].as_i64().unwrap()]
    );
}

#[tokio::test]
async fn test_rerun_reproduces_results() {
    let app = app();
    let (_, original) = upload(&app, "wilcoxon", "0.95", &two_group_csv()).await;
    let id = original["id"].as_i64().unwrap();

    let (status, rerun) = send(&app, empty_request(Method::POST, &format!("/rerun/{id}"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(rerun["id"], original["id"]);
    assert_eq!(rerun["p_value"], original["p_value"]);
    assert_eq!(rerun["statistic"], original["statistic"]);
    assert_eq!(rerun["created_at"], original["created_at"]);

    let (status, body) = send(&app, empty_request(Method::POST, "/rerun/999")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "Analysis not found");
}

#[tokio::test]
async fn test_delete_removes_analysis() {
    let app = app();
    let (_, original) = upload(&app, "chi-square", "0.95", &two_group_csv()).await;
    let id = original["id"].as_i64().unwrap();

    let (status, body) =
        send(&app, empty_request(Method::DELETE, &format!("/delete/{id}"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["detail"], "Deleted");

    let (status, _) = send(&app, empty_request(Method::DELETE, &format!("/delete/{id}"))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, empty_request(Method::POST, &format!("/rerun/{id}"))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let request = Request::builder()
        .uri("/health")
        .header("x-request-id", "req-abc-123")
        .body(Body::empty())
        .unwrap();
    let response = app().oneshot(request).await.unwrap();
    assert_eq!(
        response.headers().get("x-request-id").unwrap(),
        "req-abc-123"
    );

    let response = app()
        .oneshot(empty_request(Method::GET, "/health"))
        .await
        .unwrap();
    assert!(response.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn test_openapi_document_served() {
    let (status, body) = send(&app(), empty_request(Method::GET, "/api-docs/openapi.json")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"]["/upload"].is_object());
}

#[tokio::test]
async fn test_sqlite_backed_state() {
    let mut config = AppConfig::development();
    config.storage.upload_dir =
        std::env::temp_dir().join(format!("hypothesis-lab-api-{}", uuid::Uuid::new_v4()));
    let upload_dir = config.storage.upload_dir.clone();

    let app = create_app(AppState::from_config(config).await.unwrap());

    let (status, _) = send(&app, empty_request(Method::GET, "/ready")).await;
    assert_eq!(status, StatusCode::OK);

    let (status, original) = upload(&app, "kruskal-wallis", "0.95", &three_group_csv()).await;
    assert_eq!(status, StatusCode::OK);
    let id = original["id"].as_i64().unwrap();

    let (status, rerun) = send(&app, empty_request(Method::POST, &format!("/rerun/{id}"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(rerun["p_value"], original["p_value"]);

    let (status, _) = send(&app, empty_request(Method::DELETE, &format!("/delete/{id}"))).await;
    assert_eq!(status, StatusCode::OK);

    let _ = std::fs::remove_dir_all(upload_dir);
}
