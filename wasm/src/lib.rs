//! Meal Planner WASM Module
//!
//! Browser bindings for the pure engine: nutrition plans, meal targets,
//! weekly summaries and shopping lists. Every function takes and returns
//! JSON strings; errors surface as JavaScript string values.

use meal_planner_shared::{
    calculator, shopping_list, summarize, BiometricProfile, NutritionTargets, WeekMenu,
};
use serde::Serialize;
use wasm_bindgen::prelude::*;

fn to_json<T: Serialize>(value: &T) -> Result<String, String> {
    serde_json::to_string(value).map_err(|e| format!("Serialization error: {e}"))
}

fn parse<'a, T: serde::Deserialize<'a>>(json: &'a str, what: &str) -> Result<T, String> {
    serde_json::from_str(json).map_err(|e| format!("Invalid {what}: {e}"))
}

fn plan_json(profile_json: &str) -> Result<String, String> {
    let profile: BiometricProfile = parse(profile_json, "profile")?;
    let plan = calculator::compute_nutrition_plan(&profile).map_err(|e| e.to_string())?;
    to_json(&plan)
}

fn meal_targets_json(daily_calories: f64) -> Result<String, String> {
    if !daily_calories.is_finite() || daily_calories <= 0.0 {
        return Err("Daily calories must be a positive number".to_string());
    }
    to_json(&calculator::get_weekly_meal_targets(daily_calories))
}

fn summary_json(menu_json: &str, targets_json: &str) -> Result<String, String> {
    let menu: WeekMenu = parse(menu_json, "week menu")?;
    let targets: NutritionTargets = parse(targets_json, "targets")?;
    to_json(&summarize(&menu, &targets))
}

fn shopping_list_json(menu_json: &str) -> Result<String, String> {
    let menu: WeekMenu = parse(menu_json, "week menu")?;
    to_json(&shopping_list::generate(&menu))
}

/// Nutrition plan (BMR, TDEE, calorie goal, macros, recommendations)
#[wasm_bindgen]
pub fn compute_nutrition_plan(profile_json: &str) -> Result<String, JsValue> {
    plan_json(profile_json).map_err(|e| JsValue::from_str(&e))
}

/// Calorie windows per day and meal type
#[wasm_bindgen]
pub fn weekly_meal_targets(daily_calories: f64) -> Result<String, JsValue> {
    meal_targets_json(daily_calories).map_err(|e| JsValue::from_str(&e))
}

#[wasm_bindgen]
pub fn summarize_week(menu_json: &str, targets_json: &str) -> Result<String, JsValue> {
    summary_json(menu_json, targets_json).map_err(|e| JsValue::from_str(&e))
}

#[wasm_bindgen]
pub fn generate_shopping_list(menu_json: &str) -> Result<String, JsValue> {
    shopping_list_json(menu_json).map_err(|e| JsValue::from_str(&e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    const MENU: &str = r#"{
        "monday": {
            "breakfast": {
                "id": "local-2",
                "title": "Smoothie Bowl",
                "source": "Local recipes",
                "calories_per_serving": 450,
                "macros": {"protein": 30, "carbs": 50, "fat": 12},
                "ingredients": ["1 banaan", "150g yoghurt"],
                "origin": "local",
                "is_fallback": true
            }
        }
    }"#;

    #[test]
    fn test_plan_from_json() {
        let plan: Value = serde_json::from_str(
            &plan_json(
                r#"{"weight_kg": 82, "height_cm": 183, "age_years": 30, "sex": "male",
                    "activity_level": "moderate", "goal": "maintain"}"#,
            )
            .unwrap(),
        )
        .unwrap();
        assert_eq!(plan["calorie_goal"], 2819.0);
    }

    #[test]
    fn test_plan_errors_are_messages() {
        let err = plan_json(r#"{"weight_kg": 82}"#).unwrap_err();
        assert!(err.contains("Missing required field"));
        assert!(plan_json("not json").unwrap_err().starts_with("Invalid profile"));
    }

    #[test]
    fn test_meal_targets() {
        let targets: Value = serde_json::from_str(&meal_targets_json(2000.0).unwrap()).unwrap();
        assert_eq!(targets["monday"]["dinner"]["max"], 800.0);
        assert!(meal_targets_json(-1.0).is_err());
    }

    #[test]
    fn test_summary_and_shopping_list() {
        let targets = r#"{"calories": 2000, "protein": 150, "carbs": 200, "fat": 67}"#;
        let summary: Value = serde_json::from_str(&summary_json(MENU, targets).unwrap()).unwrap();
        assert_eq!(summary["total_calories"], 450.0);
        assert_eq!(summary["active_days"], 1);

        let items: Value = serde_json::from_str(&shopping_list_json(MENU).unwrap()).unwrap();
        assert_eq!(items.as_array().unwrap().len(), 2);
    }
}

#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    #[wasm_bindgen_test]
    fn test_bindings_return_json() {
        let json = weekly_meal_targets(1800.0).unwrap();
        assert!(json.contains("breakfast"));
        assert!(summarize_week("{}", "{}").is_err());
    }
}
