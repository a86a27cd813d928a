//! Common test utilities for integration tests
//!
//! Every app runs fully offline: in-memory storage, and either no provider
//! credentials or a provider pointed at a mock server.
#![allow(dead_code)]

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use meal_planner_backend::{
    config::{AppConfig, RecipeProviderConfig},
    routes,
    state::AppState,
    storage::{MemoryStore, PlannerStorage},
    store::MealPlanStore,
};
use secrecy::SecretString;
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

/// Test application wrapper
pub struct TestApp {
    pub app: Router,
    pub state: AppState,
}

impl TestApp {
    /// App without provider credentials; searches hit the local dataset
    pub async fn new() -> Self {
        Self::with_config(AppConfig::default()).await
    }

    /// App whose provider is served from `base_url`
    pub async fn with_provider(base_url: &str, timeout_ms: u64) -> Self {
        Self::with_config(provider_config(base_url, timeout_ms)).await
    }

    pub async fn with_config(config: AppConfig) -> Self {
        let storage = PlannerStorage::new(Arc::new(MemoryStore::new()), "test_");
        let store = MealPlanStore::hydrate(storage).await;
        let state = AppState::new(config, store, None);
        let app = routes::create_router(state.clone());

        Self { app, state }
    }

    async fn send(&self, method: &str, path: &str, body: Option<&str>) -> (StatusCode, String) {
        let mut builder = Request::builder().method(method).uri(path);
        if body.is_some() {
            builder = builder.header("Content-Type", "application/json");
        }
        let request = builder
            .body(body.map(|b| Body::from(b.to_string())).unwrap_or_else(Body::empty))
            .unwrap();

        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body_str = String::from_utf8(body.to_vec()).unwrap();

        (status, body_str)
    }

    /// Make a GET request
    pub async fn get(&self, path: &str) -> (StatusCode, String) {
        self.send("GET", path, None).await
    }

    /// Make a POST request with JSON body
    pub async fn post(&self, path: &str, body: &str) -> (StatusCode, String) {
        self.send("POST", path, Some(body)).await
    }

    /// Make a PUT request with JSON body
    pub async fn put(&self, path: &str, body: &str) -> (StatusCode, String) {
        self.send("PUT", path, Some(body)).await
    }

    pub async fn delete(&self, path: &str) -> (StatusCode, String) {
        self.send("DELETE", path, None).await
    }
}

/// Default config with provider credentials pointing at `base_url`
pub fn provider_config(base_url: &str, timeout_ms: u64) -> AppConfig {
    let mut config = AppConfig::default();
    config.recipe_provider = RecipeProviderConfig {
        base_url: base_url.to_string(),
        app_id: Some("test-app".to_string()),
        app_key: Some(SecretString::new("test-key".to_string())),
        timeout_ms,
        page_size: 10,
    };
    config
}

/// Number of filled cells in a `week_menu` JSON object
pub fn filled_cells(week_menu: &Value) -> usize {
    week_menu
        .as_object()
        .map(|days| {
            days.values()
                .filter_map(Value::as_object)
                .flat_map(|meals| meals.values())
                .filter(|recipe| !recipe.is_null())
                .count()
        })
        .unwrap_or_default()
}

/// Parse a response body as JSON
pub fn json(body: &str) -> Value {
    serde_json::from_str(body).unwrap_or_else(|e| panic!("invalid JSON ({e}): {body}"))
}
