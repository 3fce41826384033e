use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use pixpress_cli::{build_client, compress_file, render_json, HttpCompressApi};
use pixpress_controller::CompressParams;
use serde_json::json;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

const CONNECTIVITY_MESSAGE: &str = "Failed to communicate with the server.";

#[derive(Clone, Default)]
struct Received {
    calls: Arc<Mutex<usize>>,
    fields: Arc<Mutex<Vec<(String, String)>>>,
}

impl Received {
    fn calls(&self) -> usize {
        *self.calls.lock().unwrap()
    }
}

async fn record(received: &Received, mut multipart: Multipart) {
    *received.calls.lock().unwrap() += 1;

    while let Some(field) = multipart.next_field().await.unwrap() {
        let name = field.name().unwrap_or("").to_string();
        let value = if name == "image" {
            let filename = field.file_name().unwrap_or("").to_string();
            let content_type = field.content_type().unwrap_or("").to_string();
            let data = field.bytes().await.unwrap();
            format!("{}|{}|{}", filename, content_type, data.len())
        } else {
            field.text().await.unwrap()
        };
        received.fields.lock().unwrap().push((name, value));
    }
}

async fn compress_ok(State(received): State<Received>, multipart: Multipart) -> impl IntoResponse {
    record(&received, multipart).await;
    Json(json!({
        "success": true,
        "message": "Image compressed successfully",
        "original_size": 1000000,
        "compressed_size": 250000,
        "compression_ratio": 75.0,
        "processing_time": 0.5,
        "output_file": "compressed_1.webp",
        "download_url": "/api/download/compressed_1.webp"
    }))
}

async fn compress_rejected(
    State(received): State<Received>,
    multipart: Multipart,
) -> impl IntoResponse {
    record(&received, multipart).await;
    (
        StatusCode::BAD_REQUEST,
        Json(json!({ "success": false, "error": "too large" })),
    )
}

async fn compress_broken(
    State(received): State<Received>,
    multipart: Multipart,
) -> impl IntoResponse {
    record(&received, multipart).await;
    (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "success": false })))
}

async fn compress_html(State(received): State<Received>, multipart: Multipart) -> impl IntoResponse {
    record(&received, multipart).await;
    (StatusCode::BAD_GATEWAY, "<html>upstream unavailable</html>")
}

async fn compress_slow(State(received): State<Received>, multipart: Multipart) -> impl IntoResponse {
    record(&received, multipart).await;
    tokio::time::sleep(Duration::from_secs(2)).await;
    Json(json!({ "success": true }))
}

async fn download(Path(name): Path<String>) -> impl IntoResponse {
    format!("webp bytes for {}", name)
}

async fn spawn_server(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

fn api(server: &str, timeout: Duration) -> HttpCompressApi {
    HttpCompressApi::new(build_client(timeout).unwrap(), server, timeout)
}

async fn write_file(dir: &tempfile::TempDir, name: &str, data: &[u8]) -> PathBuf {
    let path = dir.path().join(name);
    tokio::fs::write(&path, data).await.unwrap();
    path
}

#[tokio::test]
async fn test_compress_success_sends_multipart_fields() {
    let received = Received::default();
    let server = spawn_server(
        Router::new()
            .route("/api/compress", post(compress_ok))
            .with_state(received.clone()),
    )
    .await;
    let dir = tempfile::tempdir().unwrap();
    let file = write_file(&dir, "photo.png", b"\x89PNG").await;

    let params = CompressParams {
        quality: Some(70),
        width: Some(640),
        height: None,
    };
    let result = compress_file(&api(&server, Duration::from_secs(5)), &file, params, false)
        .await
        .unwrap();
    let panel = &result.panel;

    assert_eq!(panel.original_size, "976.56 KB");
    assert_eq!(panel.compressed_size, "244.14 KB");
    assert_eq!(panel.compression_ratio, "75.0%");
    assert_eq!(panel.filename, "compressed_1.webp");
    assert_eq!(
        panel.download_url.as_deref(),
        Some("/api/download/compressed_1.webp")
    );
    assert_eq!(panel.processing_time.as_deref(), Some("0.50s"));

    let fields = received.fields.lock().unwrap().clone();
    assert_eq!(
        fields,
        vec![
            ("image".to_string(), "photo.png|image/png|4".to_string()),
            ("quality".to_string(), "70".to_string()),
            ("width".to_string(), "640".to_string()),
        ]
    );
}

#[tokio::test]
async fn test_json_output_carries_server_numbers() {
    let received = Received::default();
    let server = spawn_server(
        Router::new()
            .route("/api/compress", post(compress_ok))
            .with_state(received.clone()),
    )
    .await;
    let dir = tempfile::tempdir().unwrap();
    let file = write_file(&dir, "photo.jpg", b"jpeg").await;
    let api = api(&server, Duration::from_secs(5));

    let result = compress_file(&api, &file, CompressParams::default(), false)
        .await
        .unwrap();
    assert_eq!(result.response.original_size, Some(1_000_000));
    assert_eq!(result.response.compressed_size, Some(250_000));

    let download_url = api.resolve_url("/api/download/compressed_1.webp");
    let rendered = render_json(&result.response, Some(&download_url)).unwrap();
    let value: serde_json::Value = serde_json::from_str(&rendered).unwrap();

    assert_eq!(value["success"], true);
    assert_eq!(value["message"], "Image compressed successfully");
    assert_eq!(value["original_size"], 1_000_000);
    assert_eq!(value["compressed_size"], 250_000);
    assert_eq!(value["compression_ratio"], 75.0);
    assert_eq!(value["processing_time"], 0.5);
    assert_eq!(value["output_file"], "compressed_1.webp");
    assert_eq!(
        value["download_url"],
        format!("{}/api/download/compressed_1.webp", server)
    );
}

#[tokio::test]
async fn test_compress_reports_server_error_message() {
    let received = Received::default();
    let server = spawn_server(
        Router::new()
            .route("/api/compress", post(compress_rejected))
            .with_state(received.clone()),
    )
    .await;
    let dir = tempfile::tempdir().unwrap();
    let file = write_file(&dir, "photo.jpg", b"jpeg").await;

    let err = compress_file(
        &api(&server, Duration::from_secs(5)),
        &file,
        CompressParams::default(),
        false,
    )
    .await
    .unwrap_err();

    assert_eq!(err.to_string(), "too large");
    assert_eq!(received.calls(), 1);
}

#[tokio::test]
async fn test_compress_without_error_message_uses_fallback() {
    let received = Received::default();
    let server = spawn_server(
        Router::new()
            .route("/api/compress", post(compress_broken))
            .with_state(received.clone()),
    )
    .await;
    let dir = tempfile::tempdir().unwrap();
    let file = write_file(&dir, "anim.gif", b"GIF89a").await;

    let err = compress_file(
        &api(&server, Duration::from_secs(5)),
        &file,
        CompressParams::default(),
        false,
    )
    .await
    .unwrap_err();

    assert_eq!(err.to_string(), "Compression failed.");
}

#[tokio::test]
async fn test_non_json_body_is_a_connectivity_failure() {
    let received = Received::default();
    let server = spawn_server(
        Router::new()
            .route("/api/compress", post(compress_html))
            .with_state(received.clone()),
    )
    .await;
    let dir = tempfile::tempdir().unwrap();
    let file = write_file(&dir, "photo.png", b"png").await;

    let err = compress_file(
        &api(&server, Duration::from_secs(5)),
        &file,
        CompressParams::default(),
        false,
    )
    .await
    .unwrap_err();

    assert_eq!(err.to_string(), CONNECTIVITY_MESSAGE);
}

#[tokio::test]
async fn test_unreachable_server() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let server = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);

    let dir = tempfile::tempdir().unwrap();
    let file = write_file(&dir, "photo.png", b"png").await;

    let err = compress_file(
        &api(&server, Duration::from_secs(5)),
        &file,
        CompressParams::default(),
        false,
    )
    .await
    .unwrap_err();

    assert_eq!(err.to_string(), CONNECTIVITY_MESSAGE);
}

#[tokio::test]
async fn test_slow_server_times_out() {
    let received = Received::default();
    let server = spawn_server(
        Router::new()
            .route("/api/compress", post(compress_slow))
            .with_state(received.clone()),
    )
    .await;
    let dir = tempfile::tempdir().unwrap();
    let file = write_file(&dir, "photo.png", b"png").await;

    let err = compress_file(
        &api(&server, Duration::from_millis(200)),
        &file,
        CompressParams::default(),
        false,
    )
    .await
    .unwrap_err();

    assert_eq!(err.to_string(), CONNECTIVITY_MESSAGE);
}

#[tokio::test]
async fn test_unsupported_file_is_rejected_locally() {
    let received = Received::default();
    let server = spawn_server(
        Router::new()
            .route("/api/compress", post(compress_ok))
            .with_state(received.clone()),
    )
    .await;
    let dir = tempfile::tempdir().unwrap();
    let file = write_file(&dir, "notes.txt", b"hello").await;

    let err = compress_file(
        &api(&server, Duration::from_secs(5)),
        &file,
        CompressParams::default(),
        false,
    )
    .await
    .unwrap_err();

    assert_eq!(
        err.to_string(),
        "Unsupported file format. Only PNG, JPG, JPEG and GIF images are supported."
    );
    assert_eq!(received.calls(), 0);
}

#[tokio::test]
async fn test_invalid_quality_is_rejected_locally() {
    let received = Received::default();
    let server = spawn_server(
        Router::new()
            .route("/api/compress", post(compress_ok))
            .with_state(received.clone()),
    )
    .await;
    let dir = tempfile::tempdir().unwrap();
    let file = write_file(&dir, "photo.png", b"png").await;

    let params = CompressParams {
        quality: Some(250),
        ..Default::default()
    };
    let result = compress_file(&api(&server, Duration::from_secs(5)), &file, params, false).await;

    assert!(result.is_err());
    assert_eq!(received.calls(), 0);
}

#[tokio::test]
async fn test_download_into_directory() {
    let server = spawn_server(Router::new().route("/api/download/:name", get(download))).await;
    let dir = tempfile::tempdir().unwrap();

    let saved = api(&server, Duration::from_secs(5))
        .download("/api/download/out.webp", dir.path(), "out.webp")
        .await
        .unwrap();

    assert_eq!(saved, dir.path().join("out.webp"));
    assert_eq!(
        tokio::fs::read_to_string(&saved).await.unwrap(),
        "webp bytes for out.webp"
    );
}

#[tokio::test]
async fn test_download_to_new_file_path() {
    let server = spawn_server(Router::new().route("/api/download/:name", get(download))).await;
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("renamed.webp");

    let saved = api(&server, Duration::from_secs(5))
        .download("/api/download/out.webp", &target, "out.webp")
        .await
        .unwrap();

    assert_eq!(saved, target);
    assert_eq!(
        tokio::fs::read_to_string(&saved).await.unwrap(),
        "webp bytes for out.webp"
    );
}

#[tokio::test]
async fn test_download_missing_file_fails() {
    let server = spawn_server(Router::new().route("/api/download/:name", get(download))).await;
    let dir = tempfile::tempdir().unwrap();

    let result = api(&server, Duration::from_secs(5))
        .download("/api/elsewhere/out.webp", dir.path(), "out.webp")
        .await;

    assert!(result.is_err());
    assert!(!dir.path().join("out.webp").exists());
}
