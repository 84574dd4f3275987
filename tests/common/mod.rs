#![allow(dead_code)]

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    body::{to_bytes, Body},
    http::{header, HeaderMap, Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;

use module_admin_api::app::{app, AppState};
use module_admin_api::config::{AppConfig, ResponseConfig};
use module_admin_api::database::{MemoryStore, ModuleStore};

pub const BASE: &str = "/sm/security/module";

/// Router over a fresh in-memory store, driven in-process with `oneshot`.
pub struct TestApp {
    pub config: AppConfig,
    router: Router,
}

pub struct RawResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_response(ResponseConfig::default())
    }

    pub fn with_response(response: ResponseConfig) -> Self {
        let mut config = AppConfig::development();
        config.response = response;
        let store = Arc::new(MemoryStore::new(config.filter.clone()));
        Self::build(config, store)
    }

    pub fn with_store(store: Arc<dyn ModuleStore>) -> Self {
        Self::build(AppConfig::development(), store)
    }

    fn build(config: AppConfig, store: Arc<dyn ModuleStore>) -> Self {
        let router = app(AppState::new(store, &config), &config);
        Self { config, router }
    }

    pub async fn send(&self, request: Request<Body>) -> Result<RawResponse> {
        let response = self.router.clone().oneshot(request).await?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .context("failed to read response body")?
            .to_vec();
        Ok(RawResponse { status, headers, body })
    }

    pub async fn get(&self, path: &str) -> Result<(StatusCode, Value)> {
        let request = Request::get(format!("{}{}", BASE, path)).body(Body::empty())?;
        self.send(request).await?.json()
    }

    pub async fn post_json(&self, path: &str, body: Value) -> Result<(StatusCode, Value)> {
        let request = Request::post(format!("{}{}", BASE, path))
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))?;
        self.send(request).await?.json()
    }

    pub async fn post_form(&self, path: &str, form: &str) -> Result<(StatusCode, Value)> {
        let request = Request::post(format!("{}{}", BASE, path))
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(form.to_string()))?;
        self.send(request).await?.json()
    }

    pub async fn post_raw(&self, path: &str, body: Vec<u8>) -> Result<RawResponse> {
        let request = Request::post(format!("{}{}", BASE, path))
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body))?;
        self.send(request).await
    }

    /// Create a module and fail the test unless the envelope says SUCCESS.
    pub async fn seed(&self, id: &str, name: &str, order_no: i32, parent_id: i64) -> Result<()> {
        let (_, body) = self
            .post_json(
                "/add",
                serde_json::json!({ "id": id, "name": name, "orderNo": order_no, "parentId": parent_id, "level": 1 }),
            )
            .await?;
        anyhow::ensure!(body["status"] == "SUCCESS", "seeding {} failed: {}", id, body);
        Ok(())
    }
}

impl RawResponse {
    pub fn json(self) -> Result<(StatusCode, Value)> {
        let value = serde_json::from_slice(&self.body)
            .with_context(|| format!("response is not JSON: {}", String::from_utf8_lossy(&self.body)))?;
        Ok((self.status, value))
    }
}

/// `records[*].id` of a list envelope
pub fn ids(body: &Value) -> Vec<String> {
    body["records"]
        .as_array()
        .map(|records| {
            records
                .iter()
                .filter_map(|r| r["id"].as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}
