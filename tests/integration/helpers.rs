//! Shared test helpers for integration tests.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use http::{HeaderMap, Request, StatusCode, header};
use serde_json::Value;
use tower::ServiceExt;

use neoterik_api::{AppState, build_router};
use neoterik_auth::{JwtDecoder, JwtEncoder, PasswordHasher, SessionCookie, SessionManager, SigningSecret};
use neoterik_core::config::{AppConfig, AuthConfig};
use neoterik_database::MemoryUserRepository;

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// User store backing the router, for direct inspection
    pub users: MemoryUserRepository,
}

impl TestApp {
    /// Create a new test application backed by an in-memory user store
    pub fn new() -> Self {
        let config = AppConfig {
            auth: AuthConfig {
                session_secret: Some("integration-test-secret-0123456789abcdef".to_string()),
                argon2_memory_kib: 1024,
                argon2_iterations: 1,
                ..AuthConfig::default()
            },
            ..AppConfig::default()
        };

        let secret = SigningSecret::resolve(&config.auth, config.environment)
            .expect("Failed to resolve signing secret");
        let users = MemoryUserRepository::new();

        let session_manager = SessionManager::new(
            Arc::new(users.clone()),
            Arc::new(PasswordHasher::new(&config.auth).expect("Failed to build hasher")),
            Arc::new(JwtEncoder::new(&secret)),
            Arc::new(JwtDecoder::new(&secret)),
            SessionCookie::for_environment(config.environment),
        );

        let router = build_router(AppState::new(config, session_manager));

        Self { router, users }
    }

    /// Make an HTTP request to the test app
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        cookie: Option<&str>,
    ) -> TestResponse {
        let body_str = body
            .map(|b| serde_json::to_string(&b).expect("Failed to serialize body"))
            .unwrap_or_default();

        self.raw_request(method, path, Some("application/json"), body_str, cookie)
            .await
    }

    /// Make an HTTP request with a verbatim body and optional content type
    pub async fn raw_request(
        &self,
        method: &str,
        path: &str,
        content_type: Option<&str>,
        body: impl Into<String>,
        cookie: Option<&str>,
    ) -> TestResponse {
        let mut req = Request::builder().method(method).uri(path);

        if let Some(content_type) = content_type {
            req = req.header(header::CONTENT_TYPE, content_type);
        }
        if let Some(cookie) = cookie {
            req = req.header(header::COOKIE, cookie);
        }

        let req = req
            .body(Body::from(body.into()))
            .expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let headers = response.headers().clone();
        let body_bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");

        let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        TestResponse {
            status,
            headers,
            body,
        }
    }
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Response headers
    pub headers: HeaderMap,
    /// Parsed JSON body
    pub body: Value,
}

impl TestResponse {
    /// The raw `Set-Cookie` header, if any
    pub fn set_cookie(&self) -> Option<&str> {
        self.headers
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
    }

    /// The `name=value` pair from `Set-Cookie`, ready to send back
    pub fn cookie_pair(&self) -> Option<String> {
        self.set_cookie()
            .and_then(|c| c.split(';').next())
            .map(|pair| pair.trim().to_string())
    }
}
