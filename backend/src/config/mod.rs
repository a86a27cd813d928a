//! Configuration management for the Meal Planner backend
//!
//! Configuration is loaded hierarchically:
//! 1. Default values (in code)
//! 2. TOML config files (config/development.toml or config/production.toml)
//! 3. Environment variables (prefix: MP__)

use anyhow::Result;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    #[serde(default)]
    pub recipe_provider: RecipeProviderConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub planner: PlannerConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// External recipe provider
///
/// Both credentials may be absent; searches then run on the local dataset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeProviderConfig {
    pub base_url: String,
    #[serde(default)]
    pub app_id: Option<String>,
    #[serde(default, skip_serializing)]
    pub app_key: Option<SecretString>,
    /// Hard budget for one outbound request
    pub timeout_ms: u64,
    /// Default number of results per search
    pub page_size: u32,
}

impl Default for RecipeProviderConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.edamam.com".to_string(),
            app_id: None,
            app_key: None,
            timeout_ms: 5000,
            page_size: 10,
        }
    }
}

impl RecipeProviderConfig {
    /// Both credentials, when present and non-blank
    pub fn credentials(&self) -> Option<(&str, &str)> {
        let app_id = self.app_id.as_deref().filter(|id| !id.trim().is_empty())?;
        let app_key = self
            .app_key
            .as_ref()
            .map(|key| key.expose_secret().as_str())
            .filter(|key| !key.trim().is_empty())?;
        Some((app_id, app_key))
    }
}

/// Key-value storage backend selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Memory,
    File,
    Redis,
}

/// Storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    /// Directory for the file backend
    pub path: PathBuf,
    pub redis_url: String,
    pub key_prefix: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::Memory,
            path: PathBuf::from("data/storage"),
            redis_url: "redis://localhost:6379".to_string(),
            key_prefix: "fitnessapp_".to_string(),
        }
    }
}

/// Timeout applied to every HTTP request
pub const REQUEST_TIMEOUT_MS: u64 = 30_000;

/// Meal planner defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlannerConfig {
    pub default_calorie_goal: f64,
    /// Time a generation may spend waiting on the provider before the
    /// remaining cells are filled locally; kept below the request timeout
    pub generation_budget_ms: u64,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            default_calorie_goal: 2000.0,
            generation_budget_ms: 20_000,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8080,
            },
            recipe_provider: RecipeProviderConfig::default(),
            storage: StorageConfig::default(),
            planner: PlannerConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from files and environment
    ///
    /// Loading order (later sources override earlier):
    /// 1. Default values
    /// 2. Config file based on RUST_ENV (development.toml or production.toml)
    /// 3. Environment variables with MP__ prefix
    pub fn load() -> Result<Self> {
        let env = env::var("RUST_ENV").unwrap_or_else(|_| "development".to_string());
        let config_file = format!("config/{}.toml", env);

        let config = config::Config::builder()
            .add_source(config::Config::try_from(&AppConfig::default())?)
            .add_source(config::File::with_name(&config_file).required(false))
            // e.g., MP__RECIPE_PROVIDER__APP_ID=abc sets recipe_provider.app_id
            .add_source(config::Environment::with_prefix("MP").separator("__"))
            .build()?;

        Ok(config.try_deserialize()?)
    }

    /// Check if running in production mode
    pub fn is_production() -> bool {
        env::var("RUST_ENV")
            .map(|v| v == "production")
            .unwrap_or(false)
    }

    /// Human-readable problems that do not prevent startup
    pub fn warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        if self.recipe_provider.credentials().is_none() {
            warnings.push(
                "Recipe provider credentials not configured; searches use the local dataset"
                    .to_string(),
            );
        }
        if self.planner.generation_budget_ms >= REQUEST_TIMEOUT_MS {
            warnings.push(format!(
                "Meal-plan generation budget of {}ms reaches the {}ms request timeout",
                self.planner.generation_budget_ms, REQUEST_TIMEOUT_MS
            ));
        }
        if self.storage.backend == StorageBackend::Memory && Self::is_production() {
            warnings.push("In-memory storage in production; meal plans are lost on restart".to_string());
        }
        warnings
    }
}
