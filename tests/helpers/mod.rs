//! Shared test helpers for API tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use serde_json::{Value, json};
use tower::ServiceExt;

use jotter_api::state::Stores;
use jotter_api::{AppState, build_app};
use jotter_core::config::AppConfig;
use jotter_core::result::AppResult;
use jotter_core::traits::Mailer;
use jotter_database::memory::{MemoryFileStore, MemoryUserStore};
use jotter_storage::MemoryObjectStore;

/// Public base URL the test object store hands out.
pub const OBJECT_BASE_URL: &str = "http://localhost/objects";

const MULTIPART_BOUNDARY: &str = "jotter-test-boundary";

/// Mailer that keeps the OTP of every message it is asked to send.
#[derive(Debug, Default)]
pub struct CapturingMailer {
    otps: Mutex<HashMap<String, String>>,
}

impl CapturingMailer {
    /// Last OTP mailed to `email`.
    pub fn otp_for(&self, email: &str) -> Option<String> {
        self.otps.lock().unwrap().get(email).cloned()
    }
}

#[async_trait]
impl Mailer for CapturingMailer {
    async fn send_templated(
        &self,
        to: &str,
        _subject: &str,
        _template: &str,
        vars: &HashMap<String, String>,
    ) -> AppResult<()> {
        if let Some(otp) = vars.get("otp") {
            self.otps.lock().unwrap().insert(to.to_string(), otp.clone());
        }
        Ok(())
    }
}

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Outgoing mail
    pub mailer: Arc<CapturingMailer>,
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Response headers
    pub headers: axum::http::HeaderMap,
    /// Parsed JSON body, `Null` when the body is not JSON
    pub body: Value,
    /// Raw body
    pub raw: Vec<u8>,
}

impl TestResponse {
    /// The `data` member of the envelope.
    pub fn data(&self) -> &Value {
        &self.body["data"]
    }

    /// The `message` member of the envelope.
    pub fn message(&self) -> &str {
        self.body["message"].as_str().unwrap_or_default()
    }
}

/// Configuration for an app backed entirely by memory.
pub fn test_config(max_upload_size_bytes: u64) -> AppConfig {
    serde_json::from_value(json!({
        "database": { "backend": "memory" },
        "auth": {
            "access_secret": "test-access-secret",
            "refresh_secret": "test-refresh-secret",
        },
        "storage": {
            "default_provider": "memory",
            "public_base_url": OBJECT_BASE_URL,
            "max_upload_size_bytes": max_upload_size_bytes,
            "default_user_quota_bytes": 4096,
        },
        "mail": { "provider": "log" },
    }))
    .expect("Failed to build test config")
}

impl TestApp {
    /// Create a new test application
    pub fn new() -> Self {
        Self::with_config(test_config(2048))
    }

    pub fn with_config(config: AppConfig) -> Self {
        let mailer = Arc::new(CapturingMailer::default());
        let stores = Stores {
            users: Arc::new(MemoryUserStore::new()),
            files: Arc::new(MemoryFileStore::new()),
            database: None,
        };
        let objects = Arc::new(MemoryObjectStore::new(OBJECT_BASE_URL));
        let state = AppState::new(config, stores, objects, mailer.clone());

        Self {
            router: build_app(state),
            mailer,
        }
    }

    /// Register a user and return their id
    pub async fn register(&self, name: &str, email: &str, password: &str) -> String {
        let response = self
            .request(
                "POST",
                "/api/auth/register",
                Some(json!({ "name": name, "email": email, "password": password })),
                None,
            )
            .await;
        assert_eq!(
            response.status,
            StatusCode::CREATED,
            "Register failed: {:?}",
            response.body
        );
        response.data()["id"]
            .as_str()
            .expect("No id in register response")
            .to_string()
    }

    /// Login and return JWT access token
    pub async fn login(&self, email: &str, password: &str) -> String {
        let response = self
            .request(
                "POST",
                "/api/auth/login",
                Some(json!({ "email": email, "password": password })),
                None,
            )
            .await;
        assert_eq!(
            response.status,
            StatusCode::OK,
            "Login failed: {:?}",
            response.body
        );
        response.data()["accessToken"]
            .as_str()
            .expect("No accessToken in login response")
            .to_string()
    }

    /// Register, login, and return the access token
    pub async fn signed_in(&self, email: &str) -> String {
        self.register("Tester", email, "secret123").await;
        self.login(email, "secret123").await
    }

    /// Make a JSON request to the test app
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> TestResponse {
        let body_str = body
            .map(|b| serde_json::to_string(&b).expect("Failed to serialize body"))
            .unwrap_or_default();

        let mut req = Request::builder()
            .method(method)
            .uri(path)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(token) = token {
            req = req.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let req = req
            .body(Body::from(body_str))
            .expect("Failed to build request");

        self.send(req).await
    }

    /// Upload `data` as `name` through the multipart endpoint
    pub async fn upload(
        &self,
        token: &str,
        name: &str,
        mime: &str,
        data: &[u8],
        private_password: Option<&str>,
    ) -> TestResponse {
        let mut body = Vec::new();
        body.extend_from_slice(
            format!(
                "--{MULTIPART_BOUNDARY}\r\n\
                 Content-Disposition: form-data; name=\"file\"; filename=\"{name}\"\r\n\
                 Content-Type: {mime}\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(data);
        body.extend_from_slice(b"\r\n");
        if let Some(password) = private_password {
            for (field, value) in [("isPrivate", "true"), ("password", password)] {
                body.extend_from_slice(
                    format!(
                        "--{MULTIPART_BOUNDARY}\r\n\
                         Content-Disposition: form-data; name=\"{field}\"\r\n\r\n\
                         {value}\r\n"
                    )
                    .as_bytes(),
                );
            }
        }
        body.extend_from_slice(format!("--{MULTIPART_BOUNDARY}--\r\n").as_bytes());

        let req = Request::builder()
            .method("POST")
            .uri("/api/files/upload")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={MULTIPART_BOUNDARY}"),
            )
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .body(Body::from(body))
            .expect("Failed to build request");

        self.send(req).await
    }

    /// Send a prepared request
    pub async fn send(&self, req: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let headers = response.headers().clone();
        let raw = axum::body::to_bytes(response.into_body(), 16 * 1024 * 1024)
            .await
            .expect("Failed to read body")
            .to_vec();
        let body: Value = serde_json::from_slice(&raw).unwrap_or(Value::Null);

        TestResponse {
            status,
            headers,
            body,
            raw,
        }
    }
}
