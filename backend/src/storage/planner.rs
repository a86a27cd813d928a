//! Typed access to the planner's persisted keys
//!
//! Reads and writes never fail from the caller's point of view: a storage
//! error is logged, counted, and replaced by the default value (reads) or
//! dropped (writes). The in-memory state stays authoritative.

use meal_planner_shared::{
    MealPlanSettings, NutritionPlan, SavedMenu, ShoppingListItem, StorageError, WeekMenu,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, error};

use super::KeyValueStore;

pub const WEEK_MENU_KEY: &str = "weekmenu";
pub const SETTINGS_KEY: &str = "meal_plan_settings";
pub const SAVED_MENUS_KEY: &str = "saved_weekmenus";
pub const SHOPPING_LIST_KEY: &str = "shopping_list";
pub const NUTRITION_PLAN_KEY: &str = "nutrition_plan";

/// Everything loaded at startup
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PersistedState {
    pub week_menu: WeekMenu,
    pub settings: MealPlanSettings,
    pub saved_menus: Vec<SavedMenu>,
    pub shopping_list: Vec<ShoppingListItem>,
    pub nutrition_plan: Option<NutritionPlan>,
}

#[derive(Clone)]
pub struct PlannerStorage {
    store: Arc<dyn KeyValueStore>,
    prefix: String,
}

impl PlannerStorage {
    pub fn new(store: Arc<dyn KeyValueStore>, prefix: impl Into<String>) -> Self {
        Self {
            store,
            prefix: prefix.into(),
        }
    }

    pub fn backend_name(&self) -> &'static str {
        self.store.name()
    }

    pub fn key(&self, name: &str) -> String {
        format!("{}{}", self.prefix, name)
    }

    /// Backend reachability, for readiness probes
    pub async fn ping(&self) -> Result<(), StorageError> {
        self.store.ping().await
    }

    async fn load<T: DeserializeOwned + Default>(&self, name: &str) -> T {
        let key = self.key(name);
        let loaded = match self.store.get(&key).await {
            Ok(Some(value)) => serde_json::from_value(value).map(Some).map_err(StorageError::from),
            Ok(None) => Ok(None),
            Err(e) => Err(e),
        };

        match loaded {
            Ok(Some(value)) => value,
            Ok(None) => {
                debug!(key = %key, "Nothing stored, using default");
                T::default()
            }
            Err(e) => {
                error!(key = %key, error = %e, "Failed to load from storage, using default");
                metrics::counter!("storage_errors_total", "operation" => "load").increment(1);
                T::default()
            }
        }
    }

    async fn save<T: Serialize + ?Sized>(&self, name: &str, value: &T) {
        let key = self.key(name);
        let result = match serde_json::to_value(value) {
            Ok(json) => self.store.set(&key, json).await,
            Err(e) => Err(StorageError::from(e)),
        };

        if let Err(e) = result {
            error!(key = %key, error = %e, "Failed to persist to storage");
            metrics::counter!("storage_errors_total", "operation" => "save").increment(1);
        }
    }

    pub async fn load_week_menu(&self) -> WeekMenu {
        self.load(WEEK_MENU_KEY).await
    }

    pub async fn save_week_menu(&self, menu: &WeekMenu) {
        self.save(WEEK_MENU_KEY, menu).await
    }

    pub async fn load_settings(&self) -> MealPlanSettings {
        self.load(SETTINGS_KEY).await
    }

    pub async fn save_settings(&self, settings: &MealPlanSettings) {
        self.save(SETTINGS_KEY, settings).await
    }

    pub async fn load_saved_menus(&self) -> Vec<SavedMenu> {
        self.load(SAVED_MENUS_KEY).await
    }

    pub async fn save_saved_menus(&self, menus: &[SavedMenu]) {
        self.save(SAVED_MENUS_KEY, menus).await
    }

    pub async fn load_shopping_list(&self) -> Vec<ShoppingListItem> {
        self.load(SHOPPING_LIST_KEY).await
    }

    pub async fn save_shopping_list(&self, items: &[ShoppingListItem]) {
        self.save(SHOPPING_LIST_KEY, items).await
    }

    pub async fn load_nutrition_plan(&self) -> Option<NutritionPlan> {
        self.load(NUTRITION_PLAN_KEY).await
    }

    pub async fn save_nutrition_plan(&self, plan: Option<&NutritionPlan>) {
        self.save(NUTRITION_PLAN_KEY, &plan).await
    }

    /// Load every persisted key, defaults substituted per key
    pub async fn hydrate(&self) -> PersistedState {
        PersistedState {
            week_menu: self.load_week_menu().await,
            settings: self.load_settings().await,
            saved_menus: self.load_saved_menus().await,
            shopping_list: self.load_shopping_list().await,
            nutrition_plan: self.load_nutrition_plan().await,
        }
    }
}
