//! Route definitions for the Meal Planner API
//!
//! This module organizes all API routes and applies middleware.

use crate::config::REQUEST_TIMEOUT_MS;
use crate::state::AppState;
use axum::{
    http::{header, Method},
    routing::get,
    Router,
};
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

mod health;
mod meal_plan;
mod nutrition;
mod recipes;
mod shopping_list;

pub use meal_plan::meal_plan_routes;
pub use nutrition::nutrition_routes;
pub use recipes::recipe_routes;
pub use shopping_list::shopping_list_routes;

/// Create the main application router with all middleware
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
        .route("/health/live", get(health::liveness_check))
        .route("/metrics", get(health::metrics))
        .nest("/api/v1", api_routes())
        // Apply middleware layers
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_millis(REQUEST_TIMEOUT_MS)))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
                .allow_headers([header::CONTENT_TYPE]),
        )
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// API v1 routes
fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(|| async { "Meal Planner API v1" }))
        .nest("/nutrition", nutrition_routes())
        .nest("/recipes", recipe_routes())
        .nest("/meal-plan", meal_plan_routes())
        .nest("/shopping-list", shopping_list_routes())
}
