//! API request and response types

use serde::{Deserialize, Serialize};

use crate::calculator::{BiometricProfile, MealCalorieTarget};
use crate::models::{Day, MealType, Recipe, WeekMenu};
use crate::nutrition_summary::NutritionSummary;

/// API error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

/// Error detail
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

// ============================================================================
// Recipe search
// ============================================================================

/// Recipe search filters
///
/// `calories` and `time` use the provider's range syntax: `300-500`, `500`
/// (upper bound) or `300+` (lower bound). `health` may hold several
/// comma-separated labels.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecipeSearchOptions {
    #[serde(alias = "q")]
    pub query: Option<String>,
    #[serde(alias = "cuisineType")]
    pub cuisine_type: Option<String>,
    #[serde(alias = "mealType")]
    pub meal_type: Option<String>,
    #[serde(alias = "dishType")]
    pub dish_type: Option<String>,
    pub diet: Option<String>,
    pub health: Option<String>,
    pub calories: Option<String>,
    pub time: Option<String>,
    pub from: Option<u32>,
    pub to: Option<u32>,
}

impl RecipeSearchOptions {
    /// Health labels split on commas, blanks removed
    pub fn health_labels(&self) -> Vec<String> {
        self.health
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|label| !label.is_empty())
            .map(String::from)
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeSearchResponse {
    /// Always true: provider failures degrade to the local dataset
    pub success: bool,
    pub recipes: Vec<Recipe>,
    pub total_results: usize,
    pub from: u32,
    pub to: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlternativesRequest {
    pub recipe: Recipe,
    #[serde(default)]
    pub count: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeLookupQuery {
    pub uri: String,
}

/// Preference-driven search; absent lists and goals come from the stored
/// meal-plan settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersonalizedSearchRequest {
    #[serde(alias = "mealType")]
    pub meal_type: Option<String>,
    #[serde(alias = "cuisinePreferences")]
    pub cuisine_preferences: Vec<String>,
    #[serde(alias = "dietPreferences")]
    pub diet_preferences: Option<Vec<String>>,
    #[serde(alias = "healthRestrictions")]
    pub health_restrictions: Option<Vec<String>>,
    #[serde(alias = "calorieGoal")]
    pub calorie_goal: Option<f64>,
}

/// Values accepted by the recipe search filters
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterOptions {
    pub cuisine_types: &'static [&'static str],
    pub meal_types: &'static [&'static str],
    pub dish_types: &'static [&'static str],
    pub diets: &'static [&'static str],
    pub health_labels: &'static [&'static str],
}

// ============================================================================
// Nutrition
// ============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MealTargetsQuery {
    pub calories: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DayMealTargets {
    pub day: Day,
    pub meals: Vec<MealTargetEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MealTargetEntry {
    pub meal_type: MealType,
    #[serde(flatten)]
    pub target: MealCalorieTarget,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeeklyMealTargetsResponse {
    pub daily_calories: f64,
    pub days: Vec<DayMealTargets>,
}

// ============================================================================
// Meal plan
// ============================================================================

/// Plan generation input; without a profile the stored calorie goal is used
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratePlanRequest {
    pub profile: Option<BiometricProfile>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MealPlanResponse {
    pub week_menu: WeekMenu,
    pub summary: NutritionSummary,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveMenuRequest {
    pub name: String,
}

// ============================================================================
// Shopping list
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddShoppingItemRequest {
    pub name: String,
    #[serde(default)]
    pub amount: String,
    #[serde(default)]
    pub unit: String,
}
