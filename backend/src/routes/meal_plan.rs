//! Meal plan API routes

use crate::error::ApiError;
use crate::services::MealPlanService;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post, put},
    Json, Router,
};
use meal_planner_shared::{
    Day, GeneratePlanRequest, MealPlanResponse, MealPlanSettings, MealPlanSettingsPatch, MealType,
    Recipe, SaveMenuRequest, SavedMenu, WeekMenu,
};
use std::time::Duration;
use uuid::Uuid;

/// Create meal plan routes
pub fn meal_plan_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(current_plan).delete(clear_week))
        .route("/generate", post(generate))
        .route("/settings", get(get_settings).put(update_settings))
        .route("/saved", get(list_saved).post(save_menu))
        .route("/saved/:id/load", post(load_saved))
        .route("/saved/:id", delete(delete_saved))
        .route("/:day/:meal_type", put(set_cell).delete(clear_cell))
}

/// Parse the day and meal type path segments
fn parse_cell(day: &str, meal_type: &str) -> Result<(Day, MealType), ApiError> {
    let day = day
        .parse::<Day>()
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;
    let meal_type = meal_type
        .parse::<MealType>()
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;
    Ok((day, meal_type))
}

/// GET /api/v1/meal-plan - Current week with its nutrition summary
async fn current_plan(State(state): State<AppState>) -> Json<MealPlanResponse> {
    Json(MealPlanService::current(state.store()).await)
}

/// DELETE /api/v1/meal-plan - Empty every cell
async fn clear_week(State(state): State<AppState>) -> Result<Json<MealPlanResponse>, ApiError> {
    Ok(Json(MealPlanService::clear_week(state.store()).await?))
}

/// POST /api/v1/meal-plan/generate - Generate a new week
async fn generate(
    State(state): State<AppState>,
    Json(req): Json<GeneratePlanRequest>,
) -> Result<Json<MealPlanResponse>, ApiError> {
    let planner = &state.config().planner;
    let session = state
        .recipes()
        .generation_session(Duration::from_millis(planner.generation_budget_ms));

    let response =
        MealPlanService::generate(state.store(), &session, &req, planner.default_calorie_goal)
            .await?;
    Ok(Json(response))
}

/// PUT /api/v1/meal-plan/:day/:meal_type - Put a recipe in one cell
async fn set_cell(
    State(state): State<AppState>,
    Path((day, meal_type)): Path<(String, String)>,
    Json(recipe): Json<Recipe>,
) -> Result<Json<MealPlanResponse>, ApiError> {
    let (day, meal_type) = parse_cell(&day, &meal_type)?;
    Ok(Json(
        MealPlanService::set_cell(state.store(), day, meal_type, recipe).await?,
    ))
}

/// DELETE /api/v1/meal-plan/:day/:meal_type - Empty one cell
async fn clear_cell(
    State(state): State<AppState>,
    Path((day, meal_type)): Path<(String, String)>,
) -> Result<Json<MealPlanResponse>, ApiError> {
    let (day, meal_type) = parse_cell(&day, &meal_type)?;
    Ok(Json(
        MealPlanService::clear_cell(state.store(), day, meal_type).await?,
    ))
}

async fn get_settings(State(state): State<AppState>) -> Json<MealPlanSettings> {
    Json(MealPlanService::settings(state.store()).await)
}

/// PUT /api/v1/meal-plan/settings - Partial settings update
async fn update_settings(
    State(state): State<AppState>,
    Json(patch): Json<MealPlanSettingsPatch>,
) -> Result<Json<MealPlanSettings>, ApiError> {
    Ok(Json(
        MealPlanService::update_settings(state.store(), patch).await?,
    ))
}

async fn list_saved(State(state): State<AppState>) -> Json<Vec<SavedMenu>> {
    Json(MealPlanService::saved_menus(state.store()).await)
}

/// POST /api/v1/meal-plan/saved - Save the current week under a name
async fn save_menu(
    State(state): State<AppState>,
    Json(req): Json<SaveMenuRequest>,
) -> Result<(StatusCode, Json<SavedMenu>), ApiError> {
    let saved = MealPlanService::save_menu(state.store(), &req.name).await?;
    Ok((StatusCode::CREATED, Json(saved)))
}

/// POST /api/v1/meal-plan/saved/:id/load - Replace the week with a saved one
async fn load_saved(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<WeekMenu>, ApiError> {
    Ok(Json(MealPlanService::load_saved_menu(state.store(), id).await?))
}

async fn delete_saved(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    MealPlanService::delete_saved_menu(state.store(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}
