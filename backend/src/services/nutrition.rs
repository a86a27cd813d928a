//! Nutrition service: plans, meal targets and weekly summaries

use crate::error::ApiError;
use crate::store::{MealPlanAction, MealPlanStore};
use meal_planner_shared::validation::{validate_calories, validate_profile};
use meal_planner_shared::{
    calculator, summarize, BiometricProfile, DayMealTargets, MealTargetEntry, NutritionPlan,
    NutritionSummary, WeeklyMealTargetsResponse,
};
use tracing::info;

pub struct NutritionService;

impl NutritionService {
    /// Range-check and compute a plan without touching the store
    pub fn compute_plan(profile: &BiometricProfile) -> Result<NutritionPlan, ApiError> {
        let errors = validate_profile(profile);
        if !errors.is_empty() {
            return Err(ApiError::InvalidProfile(errors));
        }
        Ok(calculator::compute_nutrition_plan(profile)?)
    }

    /// Compute a plan and make its targets the active meal-plan targets
    pub async fn apply_plan(
        store: &MealPlanStore,
        profile: &BiometricProfile,
    ) -> Result<NutritionPlan, ApiError> {
        let plan = Self::compute_plan(profile)?;
        store
            .dispatch(MealPlanAction::SetNutritionPlan(plan.clone()))
            .await?;

        info!(
            calorie_goal = plan.calorie_goal,
            protein = plan.macro_targets.protein,
            carbs = plan.macro_targets.carbs,
            fat = plan.macro_targets.fat,
            "Nutrition plan applied"
        );
        Ok(plan)
    }

    /// Per-meal calorie windows for every day of the week
    pub fn weekly_meal_targets(daily_calories: f64) -> Result<WeeklyMealTargetsResponse, ApiError> {
        validate_calories(daily_calories).map_err(ApiError::Validation)?;

        let days = calculator::get_weekly_meal_targets(daily_calories)
            .into_iter()
            .map(|(day, meals)| DayMealTargets {
                day,
                meals: meals
                    .into_iter()
                    .map(|(meal_type, target)| MealTargetEntry { meal_type, target })
                    .collect(),
            })
            .collect();

        Ok(WeeklyMealTargetsResponse {
            daily_calories,
            days,
        })
    }

    /// Summary of the current week against the active targets
    pub async fn summary(store: &MealPlanStore) -> NutritionSummary {
        let state = store.snapshot().await;
        summarize(&state.week_menu, &state.settings.targets())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{MemoryStore, PlannerStorage};
    use meal_planner_shared::{ActivityLevel, BiologicalSex, FitnessGoal, MealType};
    use std::sync::Arc;

    fn store() -> MealPlanStore {
        MealPlanStore::new(PlannerStorage::new(Arc::new(MemoryStore::new()), "t_"))
    }

    fn profile() -> BiometricProfile {
        BiometricProfile {
            weight_kg: Some(65.0),
            height_cm: Some(168.0),
            age_years: Some(28),
            sex: Some(BiologicalSex::Female),
            activity_level: Some(ActivityLevel::Light),
            goal: Some(FitnessGoal::Lose),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_apply_plan_updates_settings() {
        let store = store();
        let plan = NutritionService::apply_plan(&store, &profile()).await.unwrap();

        let state = store.snapshot().await;
        assert_eq!(state.settings.calorie_goal, plan.calorie_goal);
        assert_eq!(state.nutrition_plan, Some(plan));
    }

    #[tokio::test]
    async fn test_out_of_range_profile_rejected_before_compute() {
        let store = store();
        let mut p = profile();
        p.weight_kg = Some(900.0);

        let err = NutritionService::apply_plan(&store, &p).await.unwrap_err();
        assert!(matches!(err, ApiError::InvalidProfile(ref errors) if errors[0].field == "weight_kg"));
        assert!(store.mutation_log().await.is_empty());
    }

    #[test]
    fn test_weekly_targets_cover_week() {
        let targets = NutritionService::weekly_meal_targets(2000.0).unwrap();
        assert_eq!(targets.days.len(), 7);
        let snack = targets.days[0]
            .meals
            .iter()
            .find(|m| m.meal_type == MealType::Snack)
            .unwrap();
        assert_eq!((snack.target.min, snack.target.max), (100.0, 300.0));

        assert!(NutritionService::weekly_meal_targets(f64::NAN).is_err());
    }
}
