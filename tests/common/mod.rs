#![allow(dead_code)]

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::{json, Value as JsonValue};
use tempfile::TempDir;
use test_authoring_backend::{config::Config, create_app, AppState};
use tower::ServiceExt;

pub const JWT_SECRET: &str = "test_secret_key";
pub const BOUNDARY: &str = "----test-authoring-boundary";

/// A router over a fresh in-memory store and its own uploads directory.
pub struct TestApp {
    pub router: Router,
    pub uploads: TempDir,
}

impl TestApp {
    pub fn new() -> Self {
        let uploads = tempfile::tempdir().expect("uploads dir");
        let config = Config::for_uploads_dir(JWT_SECRET, uploads.path());
        let router = create_app(AppState::in_memory(config));
        Self { router, uploads }
    }

    pub async fn send(&self, req: Request<Body>) -> (StatusCode, JsonValue) {
        let resp = self.router.clone().oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = to_bytes(resp.into_body(), 1024 * 1024).await.unwrap();
        let body = if bytes.is_empty() {
            JsonValue::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(JsonValue::Null)
        };
        (status, body)
    }

    pub async fn json(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<JsonValue>,
    ) -> (StatusCode, JsonValue) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let req = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        self.send(req).await
    }

    /// Registers an admin and returns `(token, admin_id)`.
    pub async fn register(&self, email: &str) -> (String, String) {
        let (status, body) = self
            .json(
                "POST",
                "/api/auth/register",
                None,
                Some(json!({ "email": email, "password": "s3cret", "name": "Admin" })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "register failed: {body}");
        (
            body["token"].as_str().unwrap().to_string(),
            body["admin"]["id"].as_str().unwrap().to_string(),
        )
    }

    pub async fn create_test(&self, token: &str, title: &str) -> String {
        let (status, body) = self
            .json("POST", "/api/tests", Some(token), Some(json!({ "title": title })))
            .await;
        assert_eq!(status, StatusCode::CREATED, "create test failed: {body}");
        body["test"]["id"].as_str().unwrap().to_string()
    }

    pub async fn upload(
        &self,
        token: Option<&str>,
        test_id: &str,
        field: &str,
        file_name: &str,
        content_type: &str,
        contents: &[u8],
    ) -> (StatusCode, JsonValue) {
        let mut body = Vec::new();
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"{field}\"; filename=\"{file_name}\"\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(format!("Content-Type: {content_type}\r\n\r\n").as_bytes());
        body.extend_from_slice(contents);
        body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

        let mut builder = Request::builder()
            .method("POST")
            .uri(format!("/api/tests/{test_id}/upload-csv"))
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            );
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        self.send(builder.body(Body::from(body)).unwrap()).await
    }

    pub fn staged_uploads(&self) -> usize {
        std::fs::read_dir(self.uploads.path())
            .map(|entries| entries.count())
            .unwrap_or(0)
    }
}
