//! Shared test utilities for integration tests.
//!
//! `TestClient` drives the full router against an in-memory local store with
//! the clock pinned to 2026-03-15, so "current month" is always March 2026.

#![allow(dead_code)]

use axum::body::Body;
use axum::http::{HeaderMap, Request, StatusCode};
use axum::Router;
use chrono::NaiveDate;
use http_body_util::BodyExt;
use pennywise::config::Config;
use pennywise::server;
use pennywise::state::{AppState, Clock};
use pennywise::storage::SqliteStore;
use std::path::Path;
use std::sync::Arc;
use tower::ServiceExt;

pub const TODAY: &str = "2026-03-15";

fn open_store() -> Arc<SqliteStore> {
    Arc::new(
        SqliteStore::open_in_memory(Path::new("migrations"))
            .expect("Failed to open in-memory store"),
    )
}

pub struct TestClient {
    state: AppState,
}

impl TestClient {
    /// Fresh in-memory local store, no remote configured.
    pub fn new() -> Self {
        Self::build(None)
    }

    /// Active store plus a separate on-device store, as when a remote store
    /// is configured and local records are still waiting to be moved.
    pub fn with_device_store() -> Self {
        Self::build(Some(open_store()))
    }

    fn build(local: Option<Arc<SqliteStore>>) -> Self {
        let config = Config::from_lookup(|_| None);
        let today = NaiveDate::parse_from_str(TODAY, "%Y-%m-%d").unwrap();

        let state = AppState {
            store: open_store(),
            config: Arc::new(config),
            local,
            clock: Clock::Fixed(today),
        };

        Self { state }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn router(&self) -> Router {
        server::router(self.state.clone())
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, HeaderMap, String) {
        let response = self.router().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        (status, headers, String::from_utf8_lossy(&body).to_string())
    }

    /// Make a GET request and return status and body.
    pub async fn get(&self, uri: &str) -> (StatusCode, String) {
        let (status, _, body) = self.get_with_headers(uri).await;
        (status, body)
    }

    pub async fn get_with_headers(&self, uri: &str) -> (StatusCode, HeaderMap, String) {
        self.send(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
    }

    /// POST form data; returns status, the `Location` header if any, and body.
    pub async fn post_form(
        &self,
        uri: &str,
        form_data: &[(&str, &str)],
    ) -> (StatusCode, Option<String>, String) {
        let body = form_data
            .iter()
            .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&");

        let (status, headers, body) = self
            .send(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header("Content-Type", "application/x-www-form-urlencoded")
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await;
        let location = headers
            .get("location")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        (status, location, body)
    }

    /// POST with an empty body, as the JSON API expects.
    pub async fn post(&self, uri: &str) -> (StatusCode, String) {
        let (status, _, body) = self
            .send(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await;
        (status, body)
    }

    pub async fn get_json(&self, uri: &str) -> (StatusCode, serde_json::Value) {
        let (status, body) = self.get(uri).await;
        let parsed = serde_json::from_str(&body).unwrap_or(serde_json::Value::Null);
        (status, parsed)
    }

    pub async fn post_json(&self, uri: &str) -> (StatusCode, serde_json::Value) {
        let (status, body) = self.post(uri).await;
        let parsed = serde_json::from_str(&body).unwrap_or(serde_json::Value::Null);
        (status, parsed)
    }

    // =========================================================================
    // Helpers for creating entries through the web forms
    // =========================================================================

    /// Create an expense and return whether the form redirected (303).
    pub async fn create_expense(&self, date: &str, amount: &str, category: &str, note: &str) -> bool {
        let (status, _, _) = self
            .post_form(
                "/expenses/create",
                &[
                    ("date", date),
                    ("amount", amount),
                    ("category_id", category),
                    ("note", note),
                ],
            )
            .await;
        status == StatusCode::SEE_OTHER
    }

    /// Create an income entry and return whether the form redirected (303).
    pub async fn create_income(&self, date: &str, amount: &str, source: &str) -> bool {
        let (status, _, _) = self
            .post_form(
                "/income/create",
                &[("date", date), ("amount", amount), ("source", source)],
            )
            .await;
        status == StatusCode::SEE_OTHER
    }

    /// Ids of the expenses in `month`, as returned by the JSON API.
    pub async fn expense_ids(&self, month: &str) -> Vec<String> {
        let (_, json) = self.get_json(&format!("/api/expenses?month={}", month)).await;
        json.as_array()
            .map(|items| {
                items
                    .iter()
                    .filter_map(|e| e["id"].as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default()
    }
}

impl Default for TestClient {
    fn default() -> Self {
        Self::new()
    }
}
