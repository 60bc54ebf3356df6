//! In-process REST client for integration testing.
//!
//! Drives the real axum `Router` with `tower::ServiceExt::oneshot`, so the
//! full middleware stack (auth, rate limiting, extensions) is exercised
//! without binding a socket.

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::Value;
use std::sync::atomic::{AtomicU16, Ordering};
use tower::ServiceExt;

// Each client gets its own forwarded IP so the per-IP rate limiter never
// couples unrelated tests.
static NEXT_IP: AtomicU16 = AtomicU16::new(1);

fn next_forwarded_ip() -> String {
    let n = NEXT_IP.fetch_add(1, Ordering::Relaxed);
    format!("10.0.{}.{}", n >> 8, n & 0xff)
}

/// REST client bound to one app instance and one (optional) bearer token.
pub struct TestApi {
    app: Router,
    token: Option<String>,
    forwarded_ip: String,
}

impl TestApi {
    pub fn new(app: Router, token: Option<String>) -> Self {
        Self {
            app,
            token,
            forwarded_ip: next_forwarded_ip(),
        }
    }

    pub async fn get(&self, path: &str) -> (StatusCode, Value) {
        self.request(Method::GET, path, None).await
    }

    pub async fn post(&self, path: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::POST, path, Some(body)).await
    }

    pub async fn post_empty(&self, path: &str) -> (StatusCode, Value) {
        self.request(Method::POST, path, None).await
    }

    pub async fn put(&self, path: &str) -> (StatusCode, Value) {
        self.request(Method::PUT, path, None).await
    }

    pub async fn put_json(&self, path: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::PUT, path, Some(body)).await
    }

    pub async fn delete(&self, path: &str) -> (StatusCode, Value) {
        self.request(Method::DELETE, path, None).await
    }

    async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder()
            .method(method)
            .uri(path)
            .header("x-forwarded-for", &self.forwarded_ip);
        if let Some(token) = &self.token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }

        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .expect("request builds"),
            None => builder.body(Body::empty()).expect("request builds"),
        };

        let response = self
            .app
            .clone()
            .oneshot(request)
            .await
            .expect("app handles request");
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body reads");
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, value)
    }
}
