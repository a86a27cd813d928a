//! Nutrition API routes

use crate::error::ApiError;
use crate::services::NutritionService;
use crate::state::AppState;
use axum::{
    extract::{Query, State},
    routing::{get, post},
    Json, Router,
};
use meal_planner_shared::{
    BiometricProfile, MealTargetsQuery, NutritionPlan, NutritionSummary, WeeklyMealTargetsResponse,
};

/// Create nutrition routes
pub fn nutrition_routes() -> Router<AppState> {
    Router::new()
        .route("/plan", post(compute_plan))
        .route("/meal-targets", get(meal_targets))
        .route("/summary", get(summary))
}

/// POST /api/v1/nutrition/plan - Compute a plan and adopt its targets
async fn compute_plan(
    State(state): State<AppState>,
    Json(profile): Json<BiometricProfile>,
) -> Result<Json<NutritionPlan>, ApiError> {
    let plan = NutritionService::apply_plan(state.store(), &profile).await?;
    Ok(Json(plan))
}

/// GET /api/v1/nutrition/meal-targets - Per-meal windows for the week
///
/// Uses the stored calorie goal when `calories` is not given.
async fn meal_targets(
    State(state): State<AppState>,
    Query(query): Query<MealTargetsQuery>,
) -> Result<Json<WeeklyMealTargetsResponse>, ApiError> {
    let calories = match query.calories {
        Some(calories) => calories,
        None => state.store().snapshot().await.settings.calorie_goal,
    };
    Ok(Json(NutritionService::weekly_meal_targets(calories)?))
}

/// GET /api/v1/nutrition/summary - Current week against active targets
async fn summary(State(state): State<AppState>) -> Json<NutritionSummary> {
    Json(NutritionService::summary(state.store()).await)
}
