//! Integration tests for the HTTP transport against an in-process service stub.

use axum::{
    extract::{DefaultBodyLimit, Multipart, Path},
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use pdfx_domain::{JobStatus, UploadedFile, PDF_MIME, SPREADSHEET_MIME};
use pdfx_sdk::{ExtractionClient, HttpTransport, SdkError};
use serde_json::json;
use std::time::Duration;
use tokio::net::TcpListener;

const XLSX_BYTES: &[u8] = b"PK\x03\x04 fake spreadsheet";

async fn extract(mut multipart: Multipart) -> Response {
    let mut file_names = Vec::new();
    let mut total_bytes = 0usize;
    let mut template_id = None;

    while let Some(field) = multipart.next_field().await.unwrap() {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("files") => {
                assert_eq!(field.content_type(), Some(PDF_MIME));
                file_names.push(field.file_name().unwrap_or_default().to_string());
                total_bytes += field.bytes().await.unwrap().len();
            }
            Some("template_id") => {
                template_id = Some(field.text().await.unwrap());
            }
            _ => {}
        }
    }

    match template_id.as_deref() {
        Some("1") | Some("2") => Json(json!({
            "job_id": "abc123",
            "status": "success",
            "message": format!("{} file(s), {} bytes: {}", file_names.len(), total_bytes, file_names.join(",")),
            "template_used": template_id.unwrap().parse::<u32>().unwrap(),
            "download_url": "/api/download/abc123"
        }))
        .into_response(),
        _ => (
            StatusCode::BAD_REQUEST,
            Json(json!({"detail": "Invalid template ID. Use 1 or 2."})),
        )
            .into_response(),
    }
}

async fn templates() -> Json<serde_json::Value> {
    Json(json!({
        "templates": [
            {"id": 1, "name": "Private Equity Fund Detailed Template", "description": "d1", "features": ["Fund Details"]},
            {"id": 2, "name": "Portfolio Summary Template", "description": "d2"}
        ]
    }))
}

async fn download(Path(job_id): Path<String>) -> Response {
    if job_id == "abc123" {
        ([(header::CONTENT_TYPE, SPREADSHEET_MIME)], XLSX_BYTES).into_response()
    } else {
        (
            StatusCode::NOT_FOUND,
            Json(json!({"detail": "File not found"})),
        )
            .into_response()
    }
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({"status": "healthy", "service": "PDF Extraction Tool"}))
}

async fn stalled() -> Json<serde_json::Value> {
    tokio::time::sleep(Duration::from_secs(30)).await;
    Json(json!({"templates": []}))
}

/// Start the stub service on an ephemeral port and return its base URL
async fn spawn_service() -> String {
    let app = Router::new()
        .route("/api/extract", post(extract))
        .route("/api/templates", get(templates))
        .route("/api/download/:job_id", get(download))
        .route("/api/health", get(health))
        .route("/stalled/api/templates", get(stalled))
        .layer(DefaultBodyLimit::disable());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}", addr)
}

fn pdf(name: &str, size: usize) -> UploadedFile {
    UploadedFile::new(name, vec![b'%'; size], PDF_MIME)
}

#[tokio::test]
async fn test_submit_extraction_multipart() {
    let base_url = spawn_service().await;
    let client = ExtractionClient::new(&base_url).unwrap();

    let files = vec![pdf("q1.pdf", 2 * 1024 * 1024), pdf("q2.pdf", 100)];
    let job = client.submit_extraction(&files, Some(1)).await.unwrap();

    assert_eq!(job.job_id, "abc123");
    assert_eq!(job.status, JobStatus::Completed);
    assert_eq!(job.template_used, Some(1));
    assert_eq!(
        job.message.as_deref(),
        Some("2 file(s), 2097252 bytes: q1.pdf,q2.pdf")
    );
    assert_eq!(
        client.download_url(&job),
        format!("{}/api/download/abc123", base_url)
    );
}

#[tokio::test]
async fn test_service_error_detail_is_surfaced() {
    let base_url = spawn_service().await;
    let client = ExtractionClient::new(&base_url).unwrap();

    let err = client
        .submit_extraction(&[pdf("a.pdf", 10)], Some(9))
        .await
        .unwrap_err();

    match err {
        SdkError::Network(message) => {
            assert!(message.contains("400"), "{}", message);
            assert!(message.contains("Invalid template ID. Use 1 or 2."), "{}", message);
        }
        other => panic!("Expected Network error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_fetch_templates_wrapped_payload() {
    let base_url = spawn_service().await;
    let client = ExtractionClient::new(&base_url).unwrap();

    let templates = client.fetch_templates().await.unwrap();
    assert_eq!(templates.len(), 2);
    assert_eq!(templates[0].features, vec!["Fund Details"]);
    assert!(templates[1].features.is_empty());
}

#[tokio::test]
async fn test_download_result() {
    let base_url = spawn_service().await;
    let client = ExtractionClient::new(&base_url).unwrap();

    let content = client.download_result("abc123").await.unwrap();
    assert_eq!(content, XLSX_BYTES);

    let missing = client.download_result("nope").await;
    assert_eq!(missing, Err(SdkError::NotFound("nope".to_string())));
}

#[tokio::test]
async fn test_health() {
    let base_url = spawn_service().await;
    let client = ExtractionClient::new(&base_url).unwrap();

    let health = client.health().await.unwrap();
    assert!(health.is_healthy());
    assert_eq!(health.service, "PDF Extraction Tool");
}

#[tokio::test]
async fn test_connection_failure_is_network_error() {
    // Bind then drop to get a port nothing listens on.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = ExtractionClient::new(&format!("http://{}", addr)).unwrap();
    let result = client.fetch_templates().await;

    assert!(matches!(result, Err(SdkError::Network(_))));
}

#[tokio::test]
async fn test_stalled_request_times_out() {
    let base_url = spawn_service().await;
    let transport =
        HttpTransport::with_timeout(&format!("{}/stalled", base_url), Duration::from_millis(200))
            .unwrap();
    let client = ExtractionClient::with_transport(transport);

    let started = std::time::Instant::now();
    let result = client.fetch_templates().await;

    match result {
        Err(SdkError::Network(message)) => {
            assert!(message.starts_with("Request timed out"), "{}", message);
        }
        other => panic!("Expected timeout, got {:?}", other),
    }
    assert!(started.elapsed() < Duration::from_secs(10));
}
