//! HTTP client for the external recipe provider
//!
//! Speaks the provider's recipe search API (`/api/recipes/v2`). Every
//! failure is reported as a [`ProviderError`]; the adapter decides what to
//! do with it.

use meal_planner_shared::{ProviderError, RecipeSearchOptions};
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use tracing::debug;

use super::PageWindow;
use crate::config::RecipeProviderConfig;

const SEARCH_PATH: &str = "/api/recipes/v2";
const BY_URI_PATH: &str = "/api/recipes/v2/by-uri";

// ============================================================================
// Provider payload
// ============================================================================

/// One page of search results as returned by the provider
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ProviderPage {
    pub from: u32,
    pub to: u32,
    pub count: usize,
    pub hits: Vec<ProviderHit>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProviderHit {
    pub recipe: ProviderRecipe,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ProviderNutrient {
    pub quantity: f64,
}

/// Provider recipe; nutrient totals are for the whole yield
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProviderRecipe {
    pub uri: String,
    pub label: String,
    pub image: Option<String>,
    pub source: Option<String>,
    pub url: Option<String>,
    #[serde(rename = "yield")]
    pub servings: Option<f64>,
    pub calories: Option<f64>,
    pub total_time: Option<f64>,
    pub ingredient_lines: Vec<String>,
    pub cuisine_type: Vec<String>,
    pub meal_type: Vec<String>,
    pub dish_type: Vec<String>,
    pub diet_labels: Vec<String>,
    pub total_nutrients: HashMap<String, ProviderNutrient>,
}

impl ProviderRecipe {
    /// Servings, treating a missing or non-positive yield as one
    pub fn yield_or_one(&self) -> f64 {
        match self.servings {
            Some(servings) if servings.is_finite() && servings > 0.0 => servings,
            _ => 1.0,
        }
    }

    /// Per-serving quantity of a nutrient code such as `PROCNT`
    pub fn per_serving(&self, code: &str) -> f64 {
        let total = self
            .total_nutrients
            .get(code)
            .map(|n| n.quantity)
            .unwrap_or_default();
        (total / self.yield_or_one()).round()
    }
}

// ============================================================================
// Client
// ============================================================================

/// Recipe provider client
#[derive(Clone)]
pub struct ProviderClient {
    client: Client,
    base_url: String,
    app_id: Option<String>,
    app_key: Option<SecretString>,
    timeout: Duration,
}

impl ProviderClient {
    pub fn new(config: &RecipeProviderConfig) -> Self {
        let timeout = Duration::from_millis(config.timeout_ms);
        let client = Client::builder().timeout(timeout).build().unwrap_or_default();

        let (app_id, app_key) = match config.credentials() {
            Some((id, key)) => (
                Some(id.to_string()),
                Some(SecretString::new(key.to_string())),
            ),
            None => (None, None),
        };

        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            app_id,
            app_key,
            timeout,
        }
    }

    pub fn has_credentials(&self) -> bool {
        self.app_id.is_some() && self.app_key.is_some()
    }

    /// Run one search against the provider
    ///
    /// The whole exchange, including reading the body, must finish within
    /// the configured timeout.
    pub async fn search(
        &self,
        options: &RecipeSearchOptions,
        window: PageWindow,
    ) -> Result<ProviderPage, ProviderError> {
        let (app_id, app_key) = self.credentials()?;
        let params = query_params(app_id, app_key, options, window);
        debug!(from = window.from, to = window.to, "Querying recipe provider");

        self.get_page(SEARCH_PATH, &params).await
    }

    /// Fetch a single recipe by its provider URI
    pub async fn by_uri(&self, uri: &str) -> Result<Option<ProviderRecipe>, ProviderError> {
        let (app_id, app_key) = self.credentials()?;
        let params = vec![
            ("type", "public".to_string()),
            ("app_id", app_id.to_string()),
            ("app_key", app_key.to_string()),
            ("uri", uri.to_string()),
        ];
        debug!(uri, "Looking up recipe by URI");

        let page = self.get_page(BY_URI_PATH, &params).await?;
        Ok(page.hits.into_iter().next().map(|hit| hit.recipe))
    }

    fn credentials(&self) -> Result<(&str, &str), ProviderError> {
        match (&self.app_id, &self.app_key) {
            (Some(app_id), Some(app_key)) => {
                Ok((app_id.as_str(), app_key.expose_secret().as_str()))
            }
            _ => Err(ProviderError::MissingCredentials),
        }
    }

    async fn get_page(
        &self,
        path: &str,
        params: &[(&'static str, String)],
    ) -> Result<ProviderPage, ProviderError> {
        let url = format!("{}{}", self.base_url, path);

        let exchange = async {
            let response = self
                .client
                .get(&url)
                .query(params)
                .send()
                .await
                .map_err(map_reqwest_error)?;

            let status = response.status();
            let text = response.text().await.map_err(map_reqwest_error)?;

            if !status.is_success() {
                return Err(ProviderError::Status {
                    status: status.as_u16(),
                    message: text,
                });
            }

            serde_json::from_str::<ProviderPage>(&text)
                .map_err(|e| ProviderError::Parse(e.to_string()))
        };

        tokio::time::timeout(self.timeout, exchange)
            .await
            .map_err(|_| ProviderError::Timeout)?
    }
}

fn map_reqwest_error(err: reqwest::Error) -> ProviderError {
    if err.is_timeout() {
        ProviderError::Timeout
    } else {
        ProviderError::Network(err.to_string())
    }
}

/// Query string pairs; each health label becomes its own `health` pair
fn query_params(
    app_id: &str,
    app_key: &str,
    options: &RecipeSearchOptions,
    window: PageWindow,
) -> Vec<(&'static str, String)> {
    let mut params = vec![
        ("type", "public".to_string()),
        ("app_id", app_id.to_string()),
        ("app_key", app_key.to_string()),
        ("q", options.query.clone().unwrap_or_default()),
        ("from", window.from.to_string()),
        ("to", window.to.to_string()),
    ];

    let optional = [
        ("cuisineType", &options.cuisine_type),
        ("mealType", &options.meal_type),
        ("dishType", &options.dish_type),
        ("diet", &options.diet),
        ("calories", &options.calories),
        ("time", &options.time),
    ];
    for (key, value) in optional {
        if let Some(value) = value.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
            params.push((key, value.to_string()));
        }
    }

    for label in options.health_labels() {
        params.push(("health", label));
    }

    params
}
