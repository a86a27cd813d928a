//! Meal Planner Backend
//!
//! Nutrition targets, weekly meal plans and shopping lists over HTTP.
//!
//! ## Architecture
//!
//! - Routes: HTTP request handling and routing
//! - Services: coordination between the engine, recipes and the store
//! - Store: reducer-based meal-plan state, persisted through a key-value backend

use anyhow::Result;
use meal_planner_backend::{
    config::{self, StorageBackend},
    routes,
    state::AppState,
    storage::{FileStore, KeyValueStore, MemoryStore, PlannerStorage, RedisStore},
    store::MealPlanStore,
};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::sync::Arc;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    init_tracing();

    let config = config::AppConfig::load()?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        env = if config::AppConfig::is_production() { "production" } else { "development" },
        "Starting Meal Planner Backend"
    );

    for warning in config.warnings() {
        warn!("Configuration: {}", warning);
    }

    let metrics = install_metrics_recorder();

    let store = open_store(&config.storage).await;
    let storage = PlannerStorage::new(store, config.storage.key_prefix.clone());
    let meal_plans = MealPlanStore::hydrate(storage).await;

    let state = AppState::new(config.clone(), meal_plans, metrics);
    let app = routes::create_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    info!(address = %addr, "Server listening");

    let listener = tokio::net::TcpListener::bind(&addr).await?;

    // Serve with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Open the configured storage backend
///
/// An unreachable Redis falls back to in-memory storage so the planner
/// keeps working; state is then lost on restart.
async fn open_store(config: &config::StorageConfig) -> Arc<dyn KeyValueStore> {
    match config.backend {
        StorageBackend::Memory => Arc::new(MemoryStore::new()),
        StorageBackend::File => {
            info!(path = %config.path.display(), "Using file storage");
            Arc::new(FileStore::new(config.path.clone()))
        }
        StorageBackend::Redis => {
            info!("Connecting to Redis...");
            match RedisStore::connect(&config.redis_url).await {
                Ok(store) => Arc::new(store),
                Err(e) => {
                    warn!("Failed to connect to Redis: {}. Using in-memory storage.", e);
                    Arc::new(MemoryStore::new())
                }
            }
        }
    }
}

/// Install the Prometheus recorder; metrics are disabled when it fails
fn install_metrics_recorder() -> Option<PrometheusHandle> {
    match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => Some(handle),
        Err(e) => {
            warn!("Failed to install metrics recorder: {}", e);
            None
        }
    }
}

/// Initialize tracing/logging
fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if config::AppConfig::is_production() {
            "meal_planner_backend=info,tower_http=info".into()
        } else {
            "meal_planner_backend=debug,tower_http=debug".into()
        }
    });

    let subscriber = tracing_subscriber::registry().with(env_filter);

    if config::AppConfig::is_production() {
        // JSON logging for production (better for log aggregation)
        subscriber
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        // Pretty logging for development
        subscriber
            .with(tracing_subscriber::fmt::layer().pretty())
            .init();
    }
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, starting graceful shutdown");
        }
        _ = terminate => {
            info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
