//! Recipe Source Adapter
//!
//! Searches the provider and degrades to the bundled dataset when the
//! provider cannot answer. Missing credentials, network errors and timeouts
//! all take the same fallback path, and callers always get a successful
//! response.

use async_trait::async_trait;
use meal_planner_shared::{ProviderError, Recipe, RecipeSearchOptions, RecipeSearchResponse};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, warn};

use super::{
    LocalDataset, PageWindow, ProviderClient, RawRecipe, RecipeSource, LOCAL_ID_PREFIX,
    MAX_PAGE_SIZE,
};
use crate::config::RecipeProviderConfig;

/// Calorie tolerance for alternative suggestions
const ALTERNATIVE_CALORIE_SPREAD: f64 = 100.0;

#[derive(Clone)]
pub struct RecipeSourceAdapter {
    provider: ProviderClient,
    local: LocalDataset,
    page_size: u32,
}

impl RecipeSourceAdapter {
    pub fn new(config: &RecipeProviderConfig) -> Self {
        Self {
            provider: ProviderClient::new(config),
            local: LocalDataset,
            page_size: config.page_size,
        }
    }

    pub fn has_provider_credentials(&self) -> bool {
        self.provider.has_credentials()
    }

    /// Search recipes, falling back to the local dataset on any provider
    /// failure
    pub async fn search(&self, options: &RecipeSearchOptions) -> RecipeSearchResponse {
        let window = PageWindow::clamp(options.from, options.to, self.page_size);
        debug!(
            query = options.query.as_deref().unwrap_or_default(),
            meal_type = options.meal_type.as_deref().unwrap_or_default(),
            calories = options.calories.as_deref().unwrap_or_default(),
            from = window.from,
            to = window.to,
            "Searching recipes"
        );

        match self.search_provider(options, window).await {
            Ok(response) => {
                metrics::counter!("recipe_search_total", "source" => "provider").increment(1);
                response
            }
            Err(err) => {
                warn!(reason = err.reason(), error = %err, "Recipe provider unavailable, using local recipes");
                record_fallback(&err);
                self.search_local(options, window)
            }
        }
    }

    /// A view for one meal-plan generation
    ///
    /// See [`GenerationSession`].
    pub fn generation_session(&self, budget: Duration) -> GenerationSession<'_> {
        GenerationSession {
            adapter: self,
            deadline: Instant::now() + budget,
            provider_down: AtomicBool::new(false),
        }
    }

    /// Look up one recipe by provider URI, or by id for bundled recipes
    ///
    /// `None` when nothing matches or the provider cannot answer.
    pub async fn recipe_by_uri(&self, uri: &str) -> Option<Recipe> {
        let uri = uri.trim();
        if let Some(id) = uri.strip_prefix(LOCAL_ID_PREFIX) {
            let id = id.parse::<u32>().ok()?;
            return self
                .local
                .by_id(id)
                .map(|raw| RawRecipe::Local(raw).normalize());
        }

        match self.provider.by_uri(uri).await {
            Ok(found) => found.map(|raw| RawRecipe::Provider(raw).normalize()),
            Err(err) => {
                warn!(reason = err.reason(), error = %err, "Recipe lookup by URI failed");
                metrics::counter!("recipe_lookup_failures_total", "reason" => err.reason())
                    .increment(1);
                None
            }
        }
    }

    async fn search_provider(
        &self,
        options: &RecipeSearchOptions,
        window: PageWindow,
    ) -> Result<RecipeSearchResponse, ProviderError> {
        let page = self.provider.search(options, window).await?;

        let recipes: Vec<Recipe> = page
            .hits
            .into_iter()
            .map(|hit| RawRecipe::Provider(hit.recipe).normalize())
            .collect();

        Ok(RecipeSearchResponse {
            success: true,
            total_results: page.count,
            from: page.from,
            to: page.to,
            recipes,
        })
    }

    fn search_local(&self, options: &RecipeSearchOptions, window: PageWindow) -> RecipeSearchResponse {
        let (page, total) = self.local.search(options, window);
        let recipes: Vec<Recipe> = page
            .into_iter()
            .map(|raw| RawRecipe::Local(raw).normalize())
            .collect();

        RecipeSearchResponse {
            success: true,
            total_results: total,
            from: window.from,
            to: window.from + recipes.len() as u32,
            recipes,
        }
    }

    /// Recipes similar to `original`: same first tag (or first title word)
    /// within ±100 kcal, never the original itself
    ///
    /// When the keyword search leaves fewer than `count` recipes, the rest
    /// is filled from the calorie window alone.
    pub async fn alternative_recipes(&self, original: &Recipe, count: usize) -> Vec<Recipe> {
        let query = original
            .tags
            .first()
            .cloned()
            .or_else(|| original.title.split_whitespace().next().map(String::from));

        let calories = original.safe_calories();
        let options = RecipeSearchOptions {
            query,
            calories: Some(format!(
                "{}-{}",
                (calories - ALTERNATIVE_CALORIE_SPREAD).max(0.0).round(),
                (calories + ALTERNATIVE_CALORIE_SPREAD).round()
            )),
            from: Some(0),
            to: Some((count as u32).saturating_add(5).min(MAX_PAGE_SIZE)),
            ..Default::default()
        };

        let mut alternatives: Vec<Recipe> = Vec::with_capacity(count);
        let found = self.search(&options).await.recipes;
        push_alternatives(&mut alternatives, found, original, count);

        if alternatives.len() < count && options.query.is_some() {
            let broader = RecipeSearchOptions {
                query: None,
                ..options
            };
            let found = self.search(&broader).await.recipes;
            push_alternatives(&mut alternatives, found, original, count);
        }

        alternatives
    }
}

fn push_alternatives(into: &mut Vec<Recipe>, found: Vec<Recipe>, original: &Recipe, count: usize) {
    for recipe in found {
        if into.len() == count {
            break;
        }
        if recipe.id != original.id && into.iter().all(|r| r.id != recipe.id) {
            into.push(recipe);
        }
    }
}

fn record_fallback(err: &ProviderError) {
    metrics::counter!("recipe_search_fallback_total", "reason" => err.reason()).increment(1);
    metrics::counter!("recipe_search_total", "source" => "local").increment(1);
}

/// Recipe source for a single meal-plan generation
///
/// Generation runs one search per cell. After the first provider failure,
/// or once the generation budget is spent, every later search of the
/// session goes straight to the local dataset, so a slow or unreachable
/// provider costs at most one timeout per generation.
pub struct GenerationSession<'a> {
    adapter: &'a RecipeSourceAdapter,
    deadline: Instant,
    provider_down: AtomicBool,
}

impl GenerationSession<'_> {
    /// True once searches have switched to the local dataset
    pub fn is_degraded(&self) -> bool {
        self.provider_down.load(Ordering::Relaxed)
    }

    async fn try_provider(
        &self,
        options: &RecipeSearchOptions,
        window: PageWindow,
    ) -> Result<RecipeSearchResponse, ProviderError> {
        let remaining = self.deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            return Err(ProviderError::Timeout);
        }

        tokio::time::timeout(remaining, self.adapter.search_provider(options, window))
            .await
            .map_err(|_| ProviderError::Timeout)?
    }
}

#[async_trait]
impl RecipeSource for GenerationSession<'_> {
    async fn search_recipes(&self, options: &RecipeSearchOptions) -> RecipeSearchResponse {
        let window = PageWindow::clamp(options.from, options.to, self.adapter.page_size);

        if !self.is_degraded() {
            match self.try_provider(options, window).await {
                Ok(response) => {
                    metrics::counter!("recipe_search_total", "source" => "provider").increment(1);
                    return response;
                }
                Err(err) => {
                    self.provider_down.store(true, Ordering::Relaxed);
                    warn!(
                        reason = err.reason(),
                        error = %err,
                        "Recipe provider unavailable, finishing meal plan on local recipes"
                    );
                    record_fallback(&err);
                }
            }
        } else {
            metrics::counter!("recipe_search_total", "source" => "local").increment(1);
        }

        self.adapter.search_local(options, window)
    }
}

#[async_trait]
impl RecipeSource for RecipeSourceAdapter {
    async fn search_recipes(&self, options: &RecipeSearchOptions) -> RecipeSearchResponse {
        self.search(options).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use meal_planner_shared::RecipeOrigin;

    fn offline() -> RecipeSourceAdapter {
        RecipeSourceAdapter::new(&RecipeProviderConfig::default())
    }

    #[tokio::test]
    async fn test_missing_credentials_falls_back() {
        let response = offline()
            .search(&RecipeSearchOptions {
                query: Some("kip".to_string()),
                ..Default::default()
            })
            .await;

        assert!(response.success);
        assert_eq!(response.recipes.len(), 1);
        assert!(response.recipes.iter().all(|r| r.is_fallback && r.origin == RecipeOrigin::Local));
        assert!(response.recipes[0].title.to_lowercase().contains("kip"));
    }

    #[tokio::test]
    async fn test_local_window_reported() {
        let response = offline()
            .search(&RecipeSearchOptions {
                from: Some(2),
                to: Some(4),
                ..Default::default()
            })
            .await;
        assert_eq!(response.total_results, 6);
        assert_eq!((response.from, response.to), (2, 4));
        assert_eq!(response.recipes[0].id, "local-3");
    }

    #[tokio::test]
    async fn test_alternatives_exclude_original() {
        let adapter = offline();
        let original = adapter
            .search(&RecipeSearchOptions {
                query: Some("Proteïne".to_string()),
                ..Default::default()
            })
            .await
            .recipes
            .remove(0);

        let alternatives = adapter.alternative_recipes(&original, 3).await;
        assert!(!alternatives.is_empty());
        assert!(alternatives.len() <= 3);
        assert!(alternatives.iter().all(|r| r.id != original.id));
        assert!(alternatives
            .iter()
            .all(|r| (350.0..=550.0).contains(&r.calories_per_serving)));
    }

    #[tokio::test]
    async fn test_local_recipe_found_by_id() {
        let adapter = offline();
        let recipe = adapter.recipe_by_uri("local-4").await.unwrap();
        assert_eq!(recipe.title, "Zalm met Groenten");

        assert!(adapter.recipe_by_uri("local-99").await.is_none());
        assert!(adapter.recipe_by_uri("recipe_abc").await.is_none());
    }

    fn unreachable_provider() -> RecipeSourceAdapter {
        RecipeSourceAdapter::new(&RecipeProviderConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            app_id: Some("id".to_string()),
            app_key: Some(secrecy::SecretString::new("key".to_string())),
            timeout_ms: 500,
            page_size: 10,
        })
    }

    #[tokio::test]
    async fn test_session_switches_to_local_after_first_failure() {
        let adapter = unreachable_provider();
        let session = adapter.generation_session(Duration::from_secs(10));
        let options = RecipeSearchOptions::default();

        assert!(!session.is_degraded());
        let first = session.search_recipes(&options).await;
        assert!(session.is_degraded());

        let second = session.search_recipes(&options).await;
        assert_eq!(first, second);
        assert!(second.recipes.iter().all(Recipe::is_local));
    }

    #[tokio::test]
    async fn test_spent_budget_skips_provider() {
        let adapter = unreachable_provider();
        let session = adapter.generation_session(Duration::ZERO);

        let response = session.search_recipes(&RecipeSearchOptions::default()).await;
        assert!(session.is_degraded());
        assert_eq!(response.total_results, 6);
    }
}
