//! Application state management
//!
//! Shared resources passed to every handler via Axum's state extraction.
//! All fields are behind `Arc`, so cloning the state is cheap.

use crate::config::AppConfig;
use crate::recipes::{RecipeSourceAdapter, SearchTracker};
use crate::storage::PlannerStorage;
use crate::store::MealPlanStore;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    /// Single owner of the meal-plan state
    pub store: Arc<MealPlanStore>,
    pub recipes: Arc<RecipeSourceAdapter>,
    /// Orders completions of the search endpoint
    pub searches: Arc<SearchTracker>,
    /// Renders `/metrics`; absent when no recorder is installed
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    /// Build the state around an already hydrated store
    pub fn new(config: AppConfig, store: MealPlanStore, metrics: Option<PrometheusHandle>) -> Self {
        let recipes = RecipeSourceAdapter::new(&config.recipe_provider);

        Self {
            config: Arc::new(config),
            store: Arc::new(store),
            recipes: Arc::new(recipes),
            searches: Arc::new(SearchTracker::new()),
            metrics,
        }
    }

    #[inline]
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    #[inline]
    pub fn store(&self) -> &MealPlanStore {
        &self.store
    }

    #[inline]
    pub fn storage(&self) -> &PlannerStorage {
        self.store.storage()
    }

    #[inline]
    pub fn recipes(&self) -> &RecipeSourceAdapter {
        &self.recipes
    }
}
