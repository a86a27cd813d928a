//! Meal Plan Assembler
//!
//! Fills every day / meal-type cell of a week: one search per cell within
//! that meal's calorie window, a random pick among the candidates, and a
//! built-in recipe when the search comes back empty. No cell is left empty.

use meal_planner_shared::{
    calculator, BiometricProfile, Day, MealPlanSettings, MealType, NutritionError, Recipe,
    RecipeSearchOptions, WeekMenu,
};
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{debug, info};

use crate::recipes::RecipeSource;

pub mod fallback;

pub use fallback::builtin_recipe;

/// Assembles week menus from a recipe source
pub struct MealPlanAssembler<'a, S: RecipeSource + ?Sized> {
    source: &'a S,
}

impl<'a, S: RecipeSource + ?Sized> MealPlanAssembler<'a, S> {
    pub fn new(source: &'a S) -> Self {
        Self { source }
    }

    /// Generate a week for a biometric profile
    ///
    /// Fails only when the profile itself is invalid.
    pub async fn generate_plan<R: Rng + ?Sized>(
        &self,
        profile: &BiometricProfile,
        settings: &MealPlanSettings,
        rng: &mut R,
    ) -> Result<WeekMenu, NutritionError> {
        let daily_calories = calculator::compute_calorie_goal(profile)?;
        Ok(self.generate_for_calories(daily_calories, settings, rng).await)
    }

    /// Generate a week for a fixed daily calorie budget
    ///
    /// Cells are searched one after another, never concurrently.
    pub async fn generate_for_calories<R: Rng + ?Sized>(
        &self,
        daily_calories: f64,
        settings: &MealPlanSettings,
        rng: &mut R,
    ) -> WeekMenu {
        let mut menu = WeekMenu::new();
        let mut fallbacks = 0usize;

        for day in Day::ALL {
            for meal in MealType::ALL {
                let options = cell_search_options(daily_calories, meal, settings);
                let candidates = self.source.search_recipes(&options).await.recipes;

                let recipe = match candidates.choose(rng) {
                    Some(recipe) => recipe.clone(),
                    None => {
                        fallbacks += 1;
                        builtin_for(day, meal)
                    }
                };
                menu.set(day, meal, Some(recipe));
            }
        }

        info!(
            daily_calories,
            fallback_cells = fallbacks,
            "Generated week menu"
        );
        menu
    }
}

fn builtin_for(day: Day, meal: MealType) -> Recipe {
    debug!(day = %day, meal_type = %meal, "No candidates, using built-in recipe");
    metrics::counter!("meal_plan_fallback_recipe_total", "meal_type" => meal.as_str()).increment(1);
    builtin_recipe(meal)
}

/// Search options for one cell: the meal's calorie window plus the user's
/// first diet preference and allergen labels
pub fn cell_search_options(
    daily_calories: f64,
    meal: MealType,
    settings: &MealPlanSettings,
) -> RecipeSearchOptions {
    let window = calculator::get_meal_calorie_targets(daily_calories, meal);
    let allergens: Vec<&str> = settings
        .allergens
        .iter()
        .map(|a| a.trim())
        .filter(|a| !a.is_empty())
        .collect();

    RecipeSearchOptions {
        meal_type: Some(meal.as_str().to_string()),
        calories: Some(format!("{}-{}", window.min, window.max)),
        diet: settings.diet_preferences.first().cloned(),
        health: (!allergens.is_empty()).then(|| allergens.join(",")),
        from: Some(0),
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RecipeProviderConfig;
    use crate::recipes::RecipeSourceAdapter;
    use async_trait::async_trait;
    use meal_planner_shared::{Ingredients, Macros, RecipeOrigin, RecipeSearchResponse};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::sync::Mutex;

    /// Source returning a fixed candidate list and recording every query
    struct StubSource {
        recipes: Vec<Recipe>,
        calls: Mutex<Vec<RecipeSearchOptions>>,
    }

    impl StubSource {
        fn new(recipes: Vec<Recipe>) -> Self {
            Self {
                recipes,
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl RecipeSource for StubSource {
        async fn search_recipes(&self, options: &RecipeSearchOptions) -> RecipeSearchResponse {
            self.calls.lock().unwrap().push(options.clone());
            RecipeSearchResponse {
                success: true,
                recipes: self.recipes.clone(),
                total_results: self.recipes.len(),
                from: 0,
                to: self.recipes.len() as u32,
            }
        }
    }

    fn candidate(id: &str) -> Recipe {
        Recipe {
            id: id.to_string(),
            title: id.to_string(),
            image: None,
            source: "stub".to_string(),
            url: None,
            calories_per_serving: 400.0,
            macros: Macros::default(),
            ingredients: Ingredients::default(),
            prep_time: None,
            tags: vec![],
            origin: RecipeOrigin::Provider,
            is_fallback: false,
        }
    }

    #[tokio::test]
    async fn test_empty_source_uses_builtin_everywhere() {
        let source = StubSource::new(vec![]);
        let mut rng = StdRng::seed_from_u64(7);
        let menu = MealPlanAssembler::new(&source)
            .generate_for_calories(2000.0, &MealPlanSettings::default(), &mut rng)
            .await;

        assert_eq!(menu.filled_cells(), 28);
        for (_, meal, recipe) in menu.recipes() {
            assert_eq!(recipe, &builtin_recipe(meal));
        }
        assert_eq!(source.calls.lock().unwrap().len(), 28);
    }

    #[tokio::test]
    async fn test_seeded_selection_is_deterministic() {
        let source = StubSource::new(vec![candidate("a"), candidate("b"), candidate("c")]);
        let settings = MealPlanSettings::default();

        let first = MealPlanAssembler::new(&source)
            .generate_for_calories(2000.0, &settings, &mut StdRng::seed_from_u64(42))
            .await;
        let second = MealPlanAssembler::new(&source)
            .generate_for_calories(2000.0, &settings, &mut StdRng::seed_from_u64(42))
            .await;

        assert_eq!(first, second);
        assert!(first.recipes().all(|(_, _, r)| !r.is_fallback));
    }

    #[tokio::test]
    async fn test_cell_queries_carry_window_and_preferences() {
        let source = StubSource::new(vec![candidate("a")]);
        let settings = MealPlanSettings {
            diet_preferences: vec!["high-protein".to_string(), "low-fat".to_string()],
            allergens: vec!["gluten-free".to_string(), "dairy-free".to_string()],
            ..Default::default()
        };

        MealPlanAssembler::new(&source)
            .generate_for_calories(2000.0, &settings, &mut StdRng::seed_from_u64(1))
            .await;

        let calls = source.calls.lock().unwrap();
        let breakfast = &calls[0];
        assert_eq!(breakfast.meal_type.as_deref(), Some("breakfast"));
        assert_eq!(breakfast.calories.as_deref(), Some("400-500"));
        assert_eq!(breakfast.diet.as_deref(), Some("high-protein"));
        assert_eq!(breakfast.health.as_deref(), Some("gluten-free,dairy-free"));
        assert_eq!(calls[3].calories.as_deref(), Some("100-300"));
    }

    #[tokio::test]
    async fn test_offline_plan_mixes_local_and_builtin() {
        let adapter = RecipeSourceAdapter::new(&RecipeProviderConfig::default());
        let menu = MealPlanAssembler::new(&adapter)
            .generate_for_calories(2000.0, &MealPlanSettings::default(), &mut StdRng::seed_from_u64(3))
            .await;

        assert_eq!(menu.filled_cells(), 28);
        let breakfast = menu.get(Day::Monday, MealType::Breakfast).unwrap();
        assert!(breakfast.is_local());
        let dinner = menu.get(Day::Monday, MealType::Dinner).unwrap();
        assert_eq!(dinner.id, "fallback-dinner");
    }

    #[tokio::test]
    async fn test_invalid_profile_rejected() {
        let source = StubSource::new(vec![]);
        let result = MealPlanAssembler::new(&source)
            .generate_plan(
                &BiometricProfile::default(),
                &MealPlanSettings::default(),
                &mut StdRng::seed_from_u64(1),
            )
            .await;
        assert!(matches!(result, Err(NutritionError::InvalidInput(_))));
        assert!(source.calls.lock().unwrap().is_empty());
    }
}
