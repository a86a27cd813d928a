//! Data models for the meal planning engine
//!
//! The central entity is the [`WeekMenu`]: a dense 7 × 4 grid of
//! day / meal-type cells, each holding zero or one [`Recipe`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::errors::NutritionError;

// ============================================================================
// Week grid keys
// ============================================================================

/// Day of the planning week
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Day {
    #[serde(alias = "maandag")]
    Monday,
    #[serde(alias = "dinsdag")]
    Tuesday,
    #[serde(alias = "woensdag")]
    Wednesday,
    #[serde(alias = "donderdag")]
    Thursday,
    #[serde(alias = "vrijdag")]
    Friday,
    #[serde(alias = "zaterdag")]
    Saturday,
    #[serde(alias = "zondag")]
    Sunday,
}

impl Day {
    /// All days in week order
    pub const ALL: [Day; 7] = [
        Day::Monday,
        Day::Tuesday,
        Day::Wednesday,
        Day::Thursday,
        Day::Friday,
        Day::Saturday,
        Day::Sunday,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Day::Monday => "monday",
            Day::Tuesday => "tuesday",
            Day::Wednesday => "wednesday",
            Day::Thursday => "thursday",
            Day::Friday => "friday",
            Day::Saturday => "saturday",
            Day::Sunday => "sunday",
        }
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Day {
    type Err = NutritionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "monday" | "maandag" => Ok(Day::Monday),
            "tuesday" | "dinsdag" => Ok(Day::Tuesday),
            "wednesday" | "woensdag" => Ok(Day::Wednesday),
            "thursday" | "donderdag" => Ok(Day::Thursday),
            "friday" | "vrijdag" => Ok(Day::Friday),
            "saturday" | "zaterdag" => Ok(Day::Saturday),
            "sunday" | "zondag" => Ok(Day::Sunday),
            other => Err(NutritionError::InvalidInput(format!("Unknown day: {other}"))),
        }
    }
}

/// Meal slot within a day
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MealType {
    #[serde(alias = "ontbijt")]
    Breakfast,
    Lunch,
    #[serde(alias = "diner")]
    Dinner,
    Snack,
}

impl MealType {
    /// All meal types in serving order
    pub const ALL: [MealType; 4] = [
        MealType::Breakfast,
        MealType::Lunch,
        MealType::Dinner,
        MealType::Snack,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MealType::Breakfast => "breakfast",
            MealType::Lunch => "lunch",
            MealType::Dinner => "dinner",
            MealType::Snack => "snack",
        }
    }
}

impl fmt::Display for MealType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MealType {
    type Err = NutritionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "breakfast" | "ontbijt" => Ok(MealType::Breakfast),
            "lunch" => Ok(MealType::Lunch),
            "dinner" | "diner" => Ok(MealType::Dinner),
            "snack" | "snacks" => Ok(MealType::Snack),
            other => Err(NutritionError::InvalidInput(format!(
                "Unknown meal type: {other}"
            ))),
        }
    }
}

// ============================================================================
// Recipes
// ============================================================================

/// Per-serving macronutrients in grams
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Macros {
    #[serde(deserialize_with = "lenient_number")]
    pub protein: f64,
    #[serde(deserialize_with = "lenient_number")]
    pub carbs: f64,
    #[serde(deserialize_with = "lenient_number")]
    pub fat: f64,
}

/// Numbers, numeric strings (`"450"`, `"1,5"`) and anything else as 0
fn lenient_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(number_from_value(&value).unwrap_or(0.0))
}

fn lenient_minutes<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u32>, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(number_from_value(&value)
        .filter(|minutes| *minutes >= 0.0 && *minutes <= f64::from(u32::MAX))
        .map(|minutes| minutes.round() as u32))
}

fn lenient_macros<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Macros, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

fn number_from_value(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().replace(',', ".").parse().ok(),
        _ => None,
    }?;
    number.is_finite().then_some(number)
}

/// A single ingredient entry
///
/// Provider payloads and the bundled dataset carry free-text lines; manually
/// entered recipes may carry structured entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IngredientLine {
    Text(String),
    Structured {
        name: String,
        #[serde(default)]
        amount: String,
        #[serde(default)]
        unit: String,
    },
}

/// Ingredient list in either of its two accepted forms
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Ingredients {
    Lines(Vec<IngredientLine>),
    /// A single comma-delimited string
    Delimited(String),
}

impl Default for Ingredients {
    fn default() -> Self {
        Ingredients::Lines(Vec::new())
    }
}

impl Ingredients {
    pub fn is_empty(&self) -> bool {
        match self {
            Ingredients::Lines(lines) => lines.is_empty(),
            Ingredients::Delimited(text) => text.trim().is_empty(),
        }
    }
}

/// Where a recipe came from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecipeOrigin {
    /// External recipe provider
    #[default]
    Provider,
    /// Bundled local dataset (search fallback)
    Local,
    /// Built-in per-meal-type recipe used by the planner
    BuiltIn,
}

/// Normalized recipe, regardless of source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default)]
    pub source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, alias = "calories", deserialize_with = "lenient_number")]
    pub calories_per_serving: f64,
    #[serde(default, deserialize_with = "lenient_macros")]
    pub macros: Macros,
    #[serde(default)]
    pub ingredients: Ingredients,
    /// Preparation time in minutes
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_minutes"
    )]
    pub prep_time: Option<u32>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub origin: RecipeOrigin,
    /// True for anything not served by the provider
    #[serde(default)]
    pub is_fallback: bool,
}

impl Recipe {
    pub fn is_local(&self) -> bool {
        self.origin == RecipeOrigin::Local
    }

    /// Calories with non-finite or negative values treated as zero
    pub fn safe_calories(&self) -> f64 {
        non_negative(self.calories_per_serving)
    }

    /// Macros with non-finite or negative values treated as zero
    pub fn safe_macros(&self) -> Macros {
        Macros {
            protein: non_negative(self.macros.protein),
            carbs: non_negative(self.macros.carbs),
            fat: non_negative(self.macros.fat),
        }
    }
}

fn non_negative(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

// ============================================================================
// Week menu
// ============================================================================

/// Meal slots of a single day
pub type DayMenu = BTreeMap<MealType, Option<Recipe>>;

/// Seven days × four meal types, every cell always present
#[derive(Debug, Clone, PartialEq)]
pub struct WeekMenu {
    days: BTreeMap<Day, DayMenu>,
}

impl Default for WeekMenu {
    fn default() -> Self {
        Self::new()
    }
}

impl WeekMenu {
    /// Create a menu with every cell empty
    pub fn new() -> Self {
        let days = Day::ALL
            .iter()
            .map(|day| {
                let meals = MealType::ALL.iter().map(|meal| (*meal, None)).collect();
                (*day, meals)
            })
            .collect();
        Self { days }
    }

    pub fn get(&self, day: Day, meal_type: MealType) -> Option<&Recipe> {
        self.days
            .get(&day)
            .and_then(|meals| meals.get(&meal_type))
            .and_then(Option::as_ref)
    }

    /// Replace exactly one cell
    pub fn set(&mut self, day: Day, meal_type: MealType, recipe: Option<Recipe>) {
        self.days.entry(day).or_default().insert(meal_type, recipe);
    }

    pub fn day(&self, day: Day) -> &DayMenu {
        // Every day key is inserted by `new`, and `set` never removes one.
        &self.days[&day]
    }

    pub fn days(&self) -> impl Iterator<Item = (Day, &DayMenu)> {
        self.days.iter().map(|(day, meals)| (*day, meals))
    }

    /// Every filled cell in week order
    pub fn recipes(&self) -> impl Iterator<Item = (Day, MealType, &Recipe)> {
        self.days.iter().flat_map(|(day, meals)| {
            meals
                .iter()
                .filter_map(move |(meal, recipe)| recipe.as_ref().map(|r| (*day, *meal, r)))
        })
    }

    pub fn filled_cells(&self) -> usize {
        self.recipes().count()
    }

    pub fn is_empty(&self) -> bool {
        self.filled_cells() == 0
    }
}

impl Serialize for WeekMenu {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.days.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for WeekMenu {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = BTreeMap::<String, Value>::deserialize(deserializer)?;
        Ok(WeekMenu::from_raw(raw))
    }
}

/// A stored cell: one recipe, null, or a list of which only the first
/// readable recipe is kept. Cells that hold no readable recipe stay empty.
fn recipe_from_slot(slot: Value) -> Option<Recipe> {
    match slot {
        Value::Null => None,
        Value::Array(recipes) => recipes.into_iter().find_map(recipe_from_value),
        other => recipe_from_value(other),
    }
}

fn recipe_from_value(value: Value) -> Option<Recipe> {
    if !value.is_object() {
        return None;
    }
    serde_json::from_value(value).ok()
}

impl WeekMenu {
    /// Build a menu from stored day values
    ///
    /// A day is either a slot map or the older list of
    /// `{meal_type, recipe}` entries. Unknown keys and unreadable cells are
    /// skipped without affecting the rest of the week.
    fn from_raw(raw: BTreeMap<String, Value>) -> Self {
        let mut menu = WeekMenu::new();

        for (day_key, raw_day) in raw {
            let Ok(day) = day_key.parse::<Day>() else {
                continue;
            };

            match raw_day {
                Value::Object(slots) => {
                    for (meal_key, slot) in slots {
                        let Ok(meal_type) = meal_key.parse::<MealType>() else {
                            continue;
                        };
                        if let Some(recipe) = recipe_from_slot(slot) {
                            menu.set(day, meal_type, Some(recipe));
                        }
                    }
                }
                Value::Array(entries) => {
                    for mut entry in entries {
                        let Some(recipe) = entry
                            .get_mut("recipe")
                            .map(Value::take)
                            .and_then(recipe_from_value)
                        else {
                            continue;
                        };
                        let target = entry
                            .get("meal_type")
                            .or_else(|| entry.get("mealType"))
                            .and_then(Value::as_str)
                            .and_then(|m| m.parse::<MealType>().ok())
                            .filter(|m| menu.get(day, *m).is_none())
                            .or_else(|| {
                                MealType::ALL
                                    .into_iter()
                                    .find(|m| menu.get(day, *m).is_none())
                            });
                        if let Some(meal_type) = target {
                            menu.set(day, meal_type, Some(recipe));
                        }
                    }
                }
                _ => {}
            }
        }

        menu
    }
}

/// A named snapshot of a week menu
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedMenu {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub menu: WeekMenu,
}

// ============================================================================
// Targets and settings
// ============================================================================

/// Daily macro targets in grams
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MacroGrams {
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}

/// Daily intake targets used for goal comparison
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NutritionTargets {
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}

/// Persisted meal-plan settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MealPlanSettings {
    pub calorie_goal: f64,
    pub macro_targets: MacroGrams,
    pub diet_preferences: Vec<String>,
    pub allergens: Vec<String>,
}

impl Default for MealPlanSettings {
    fn default() -> Self {
        Self {
            calorie_goal: 2000.0,
            macro_targets: MacroGrams {
                protein: 150.0,
                carbs: 200.0,
                fat: 67.0,
            },
            diet_preferences: Vec::new(),
            allergens: Vec::new(),
        }
    }
}

impl MealPlanSettings {
    pub fn targets(&self) -> NutritionTargets {
        NutritionTargets {
            calories: self.calorie_goal,
            protein: self.macro_targets.protein,
            carbs: self.macro_targets.carbs,
            fat: self.macro_targets.fat,
        }
    }
}

/// Partial settings update; absent fields are left untouched
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MealPlanSettingsPatch {
    pub calorie_goal: Option<f64>,
    pub macro_targets: Option<MacroGrams>,
    pub diet_preferences: Option<Vec<String>>,
    pub allergens: Option<Vec<String>>,
}

impl MealPlanSettings {
    pub fn apply(&self, patch: &MealPlanSettingsPatch) -> MealPlanSettings {
        MealPlanSettings {
            calorie_goal: patch.calorie_goal.unwrap_or(self.calorie_goal),
            macro_targets: patch.macro_targets.unwrap_or(self.macro_targets),
            diet_preferences: patch
                .diet_preferences
                .clone()
                .unwrap_or_else(|| self.diet_preferences.clone()),
            allergens: patch
                .allergens
                .clone()
                .unwrap_or_else(|| self.allergens.clone()),
        }
    }
}

// ============================================================================
// Shopping list
// ============================================================================

/// Grocery category, in keyword-matching order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShoppingCategory {
    #[serde(rename = "Produce")]
    Produce,
    #[serde(rename = "Meat & Seafood")]
    MeatSeafood,
    #[serde(rename = "Dairy")]
    Dairy,
    #[serde(rename = "Pantry")]
    Pantry,
    #[serde(rename = "Frozen")]
    Frozen,
    #[serde(rename = "Beverages")]
    Beverages,
    #[serde(rename = "Other")]
    Other,
}

impl ShoppingCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ShoppingCategory::Produce => "Produce",
            ShoppingCategory::MeatSeafood => "Meat & Seafood",
            ShoppingCategory::Dairy => "Dairy",
            ShoppingCategory::Pantry => "Pantry",
            ShoppingCategory::Frozen => "Frozen",
            ShoppingCategory::Beverages => "Beverages",
            ShoppingCategory::Other => "Other",
        }
    }
}

impl fmt::Display for ShoppingCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One line of the shopping list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShoppingListItem {
    pub name: String,
    #[serde(default)]
    pub amount: String,
    #[serde(default)]
    pub unit: String,
    pub category: ShoppingCategory,
    #[serde(default)]
    pub checked: bool,
}
