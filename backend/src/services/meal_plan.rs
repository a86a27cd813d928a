//! Meal plan service
//!
//! Generation, manual cell edits, settings and saved menus. Every change is
//! a store dispatch.

use crate::error::ApiError;
use crate::planner::MealPlanAssembler;
use crate::recipes::RecipeSource;
use crate::services::NutritionService;
use crate::store::{MealPlanAction, MealPlanState, MealPlanStore};
use chrono::Utc;
use meal_planner_shared::{
    summarize, Day, GeneratePlanRequest, MealPlanResponse, MealPlanSettings,
    MealPlanSettingsPatch, MealType, Recipe, SavedMenu, WeekMenu,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;
use uuid::Uuid;

pub struct MealPlanService;

impl MealPlanService {
    pub fn response(state: &MealPlanState) -> MealPlanResponse {
        MealPlanResponse {
            week_menu: state.week_menu.clone(),
            summary: summarize(&state.week_menu, &state.settings.targets()),
        }
    }

    pub async fn current(store: &MealPlanStore) -> MealPlanResponse {
        Self::response(&store.snapshot().await)
    }

    /// Generate and store a new week
    ///
    /// With a profile, its nutrition plan becomes the active target first.
    /// Without one, the stored calorie goal is used, or `default_calories`
    /// when that goal is unusable.
    pub async fn generate<S: RecipeSource + ?Sized>(
        store: &MealPlanStore,
        source: &S,
        request: &GeneratePlanRequest,
        default_calories: f64,
    ) -> Result<MealPlanResponse, ApiError> {
        let daily_calories = match &request.profile {
            Some(profile) => NutritionService::apply_plan(store, profile).await?.calorie_goal,
            None => {
                let goal = store.snapshot().await.settings.calorie_goal;
                if goal.is_finite() && goal > 0.0 {
                    goal
                } else {
                    default_calories
                }
            }
        };

        let settings = store.snapshot().await.settings;
        let mut rng = StdRng::from_entropy();
        let menu = MealPlanAssembler::new(source)
            .generate_for_calories(daily_calories, &settings, &mut rng)
            .await;

        let state = store.dispatch(MealPlanAction::SetWeekMenu(menu)).await?;
        info!(daily_calories, "Stored generated week menu");
        Ok(Self::response(&state))
    }

    pub async fn set_cell(
        store: &MealPlanStore,
        day: Day,
        meal_type: MealType,
        recipe: Recipe,
    ) -> Result<MealPlanResponse, ApiError> {
        let state = store
            .dispatch(MealPlanAction::AddRecipe {
                day,
                meal_type,
                recipe,
            })
            .await?;
        Ok(Self::response(&state))
    }

    pub async fn clear_cell(
        store: &MealPlanStore,
        day: Day,
        meal_type: MealType,
    ) -> Result<MealPlanResponse, ApiError> {
        let state = store
            .dispatch(MealPlanAction::RemoveRecipe { day, meal_type })
            .await?;
        Ok(Self::response(&state))
    }

    pub async fn clear_week(store: &MealPlanStore) -> Result<MealPlanResponse, ApiError> {
        let state = store.dispatch(MealPlanAction::ClearWeekMenu).await?;
        Ok(Self::response(&state))
    }

    pub async fn settings(store: &MealPlanStore) -> MealPlanSettings {
        store.snapshot().await.settings
    }

    pub async fn update_settings(
        store: &MealPlanStore,
        patch: MealPlanSettingsPatch,
    ) -> Result<MealPlanSettings, ApiError> {
        if let Some(goal) = patch.calorie_goal {
            if !goal.is_finite() || goal <= 0.0 {
                return Err(ApiError::Validation(
                    "Calorie goal must be a positive number".to_string(),
                ));
            }
        }
        let state = store.dispatch(MealPlanAction::UpdateSettings(patch)).await?;
        Ok(state.settings)
    }

    pub async fn saved_menus(store: &MealPlanStore) -> Vec<SavedMenu> {
        store.snapshot().await.saved_menus
    }

    /// Snapshot the current week under a name
    pub async fn save_menu(store: &MealPlanStore, name: &str) -> Result<SavedMenu, ApiError> {
        let id = Uuid::new_v4();
        let state = store
            .dispatch(MealPlanAction::SaveMenu {
                id,
                name: name.to_string(),
                created_at: Utc::now(),
            })
            .await?;

        state
            .saved_menus
            .into_iter()
            .find(|menu| menu.id == id)
            .ok_or_else(|| ApiError::Internal(anyhow::anyhow!("saved menu {id} missing after save")))
    }

    pub async fn load_saved_menu(store: &MealPlanStore, id: Uuid) -> Result<WeekMenu, ApiError> {
        let state = store.dispatch(MealPlanAction::LoadSavedMenu { id }).await?;
        Ok(state.week_menu)
    }

    pub async fn delete_saved_menu(store: &MealPlanStore, id: Uuid) -> Result<(), ApiError> {
        store.dispatch(MealPlanAction::DeleteSavedMenu { id }).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RecipeProviderConfig;
    use crate::recipes::RecipeSourceAdapter;
    use crate::storage::{MemoryStore, PlannerStorage};
    use meal_planner_shared::{ActivityLevel, BiologicalSex, BiometricProfile, FitnessGoal};
    use std::sync::Arc;

    fn store() -> MealPlanStore {
        MealPlanStore::new(PlannerStorage::new(Arc::new(MemoryStore::new()), "t_"))
    }

    #[tokio::test]
    async fn test_generate_without_profile_fills_week() {
        let store = store();
        let adapter = RecipeSourceAdapter::new(&RecipeProviderConfig::default());

        let response = MealPlanService::generate(&store, &adapter, &GeneratePlanRequest::default(), 2000.0)
            .await
            .unwrap();

        assert_eq!(response.week_menu.filled_cells(), 28);
        assert_eq!(response.summary.active_days, 7);
        assert_eq!(store.storage().load_week_menu().await, response.week_menu);
    }

    #[tokio::test]
    async fn test_generate_with_profile_sets_targets() {
        let store = store();
        let adapter = RecipeSourceAdapter::new(&RecipeProviderConfig::default());
        let request = GeneratePlanRequest {
            profile: Some(BiometricProfile {
                weight_kg: Some(82.0),
                height_cm: Some(183.0),
                age_years: Some(30),
                sex: Some(BiologicalSex::Male),
                activity_level: Some(ActivityLevel::Active),
                goal: Some(FitnessGoal::Gain),
                ..Default::default()
            }),
        };

        MealPlanService::generate(&store, &adapter, &request, 2000.0)
            .await
            .unwrap();

        let state = store.snapshot().await;
        let plan = state.nutrition_plan.unwrap();
        assert_eq!(state.settings.calorie_goal, plan.calorie_goal);
        assert!(plan.calorie_goal > 3000.0);
    }

    #[tokio::test]
    async fn test_invalid_profile_keeps_week() {
        let store = store();
        let adapter = RecipeSourceAdapter::new(&RecipeProviderConfig::default());
        let request = GeneratePlanRequest {
            profile: Some(BiometricProfile::default()),
        };

        let err = MealPlanService::generate(&store, &adapter, &request, 2000.0).await;
        assert!(matches!(err, Err(ApiError::Nutrition(_))));
        assert!(store.snapshot().await.week_menu.is_empty());
    }

    #[tokio::test]
    async fn test_non_positive_goal_rejected() {
        let store = store();
        let patch = MealPlanSettingsPatch {
            calorie_goal: Some(0.0),
            ..Default::default()
        };
        assert!(MealPlanService::update_settings(&store, patch).await.is_err());
    }

    #[tokio::test]
    async fn test_save_then_load_restores_week() {
        let store = store();
        MealPlanService::set_cell(&store, Day::Monday, MealType::Breakfast, crate::planner::builtin_recipe(MealType::Breakfast))
            .await
            .unwrap();
        let saved = MealPlanService::save_menu(&store, "Bulk week").await.unwrap();

        MealPlanService::clear_week(&store).await.unwrap();
        let menu = MealPlanService::load_saved_menu(&store, saved.id).await.unwrap();
        assert_eq!(menu.filled_cells(), 1);

        MealPlanService::delete_saved_menu(&store, saved.id).await.unwrap();
        assert!(matches!(
            MealPlanService::delete_saved_menu(&store, saved.id).await,
            Err(ApiError::NotFound(_))
        ));
    }
}
