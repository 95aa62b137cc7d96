//! HTTP boundary tests
//!
//! Run with: cargo test --test routes

mod common;

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use parking_lot::Mutex;
use serde_json::{json, Value};
use tower::ServiceExt;

use common::Harness;
use docqa_server::chat::{AnswerBackend, ChatError, ChatService};
use docqa_server::config::Config;
use docqa_server::routes;
use docqa_server::session::{SessionRecord, SessionResolver};
use docqa_server::state::AppState;

const BOUNDARY: &str = "docqa-test-boundary";

/// Backend that records prompts and answers with a fixed string
#[derive(Default)]
struct CannedBackend {
    prompts: Mutex<Vec<String>>,
}

#[async_trait]
impl AnswerBackend for CannedBackend {
    fn name(&self) -> &'static str {
        "canned"
    }

    async fn answer(&self, prompt: &str) -> Result<String, ChatError> {
        self.prompts.lock().push(prompt.to_string());
        Ok("The total is 42.".to_string())
    }
}

struct TestApp {
    harness: Harness,
    backend: Arc<CannedBackend>,
    router: Router,
}

impl TestApp {
    fn new() -> Self {
        let harness = Harness::new();
        let backend = Arc::new(CannedBackend::default());

        let mut config = Config::default();
        config.storage.session_store_path = harness.store.path().to_path_buf();
        config.storage.upload_dir = harness.uploads();
        config.storage.work_dir = harness.work_root();

        let resolver = SessionResolver::new(harness.store.clone());
        let chat = ChatService::with_backend(Arc::new(resolver.clone()), backend.clone());
        let state = AppState::from_parts(config, harness.pipeline.clone(), resolver, chat);

        Self {
            harness,
            backend,
            router: routes::app(state),
        }
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    async fn post_json(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send(request).await
    }

    async fn upload(&self, field: &str, file_name: &str, content: &str) -> (StatusCode, Value) {
        let body = format!(
            "--{b}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"{file_name}\"\r\n\
             Content-Type: application/octet-stream\r\n\r\n{content}\r\n--{b}--\r\n",
            b = BOUNDARY,
        );
        let request = Request::builder()
            .method("POST")
            .uri("/api/ocr")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={}", BOUNDARY),
            )
            .body(Body::from(body))
            .unwrap();
        self.send(request).await
    }

    async fn get(&self, uri: &str) -> (StatusCode, Value) {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        self.send(request).await
    }
}

#[tokio::test]
async fn test_health() {
    let app = TestApp::new();

    for uri in ["/", "/api/health"] {
        let (status, body) = app.get(uri).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["service"], "docqa-server");
    }
}

#[tokio::test]
async fn test_ocr_returns_session_and_text() {
    let app = TestApp::new();

    let (status, body) = app.upload("file", "invoice.pdf", "Hello\x0cWorld").await;

    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["text"], "Hello\nWorld");
    let session_id = body["sessionId"].as_str().unwrap();
    assert!(session_id.starts_with("chat_"));
    assert!(app.harness.leftover_files().is_empty(), "{:?}", app.harness.leftover_files());

    let (status, record) = app.get(&format!("/api/sessions/{}", session_id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(record["sessionId"], session_id);
    assert_eq!(record["sourceFileName"], "invoice.pdf");
    assert_eq!(record["documentText"], "Hello\nWorld");
}

#[tokio::test]
async fn test_ocr_without_file_field() {
    let app = TestApp::new();

    let (status, body) = app.upload("attachment", "invoice.pdf", "Hello").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"], "No file uploaded");
    assert!(app.harness.store.is_empty().await.unwrap());
}

#[tokio::test]
async fn test_ocr_not_multipart() {
    let app = TestApp::new();

    let (status, _) = app.post_json("/api/ocr", json!({ "file": "nope" })).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_ocr_unsupported_type_leaves_nothing_behind() {
    let app = TestApp::new();

    let (status, body) = app.upload("file", "notes.docx", "text").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["details"].as_str().unwrap().contains(".docx"));
    assert!(app.harness.leftover_files().is_empty());
}

#[tokio::test]
async fn test_ocr_failed_page_is_unprocessable() {
    let app = TestApp::new();

    let content = format!("one\x0c{}", common::UNREADABLE);
    let (status, body) = app.upload("file", "scan.pdf", &content).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["details"], "Page 2 could not be recognized");
    assert!(app.harness.leftover_files().is_empty());
    assert!(!app.harness.store.path().exists());
}

#[tokio::test]
async fn test_chat_answers_from_document() {
    let app = TestApp::new();
    let record = SessionRecord::new("receipt.png", "Total: 42 EUR".to_string());
    app.harness.store.append(record.clone()).await.unwrap();

    let (status, body) = app
        .post_json(
            "/api/chat",
            json!({ "sessionId": record.session_id, "question": "What is the total?" }),
        )
        .await;

    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["response"], "The total is 42.");

    let prompts = app.backend.prompts.lock();
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].contains("Total: 42 EUR"));
    assert!(prompts[0].contains("What is the total?"));
}

#[tokio::test]
async fn test_chat_accepts_legacy_field_names() {
    let app = TestApp::new();
    let record = SessionRecord::new("receipt.png", "Total: 42 EUR".to_string());
    app.harness.store.append(record.clone()).await.unwrap();

    let (status, _) = app
        .post_json(
            "/api/chat",
            json!({ "chat_id": record.session_id, "message": "Total?" }),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_chat_unknown_session() {
    let app = TestApp::new();

    let (status, body) = app
        .post_json("/api/chat", json!({ "sessionId": "chat_missing", "question": "Hi?" }))
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Chat ID not found");
    assert!(app.backend.prompts.lock().is_empty());
}

#[tokio::test]
async fn test_chat_missing_fields() {
    let app = TestApp::new();

    for payload in [
        json!({}),
        json!({ "sessionId": "chat_1" }),
        json!({ "question": "Hi?" }),
        json!({ "sessionId": "  ", "question": "Hi?" }),
    ] {
        let (status, body) = app.post_json("/api/chat", payload).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["details"], "Missing sessionId or question");
    }
}

#[tokio::test]
async fn test_unknown_session_lookup() {
    let app = TestApp::new();

    let (status, body) = app.get("/api/sessions/chat_nope").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["details"], "Session not found");
}
