//! Recipe search API routes

use crate::error::ApiError;
use crate::services::RecipeService;
use crate::state::AppState;
use axum::{
    extract::{Query, State},
    http::{HeaderMap, HeaderValue},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use crate::recipes::filter_options;
use crate::services::TrackedSearch;
use meal_planner_shared::{
    AlternativesRequest, FilterOptions, PersonalizedSearchRequest, Recipe, RecipeLookupQuery,
    RecipeSearchOptions, RecipeSearchResponse,
};

/// Header carrying the generation of a search
pub const SEARCH_GENERATION_HEADER: &str = "x-search-generation";
/// Header set to "true" when a newer search started before this one finished
pub const SEARCH_STALE_HEADER: &str = "x-search-stale";

/// Create recipe routes
pub fn recipe_routes() -> Router<AppState> {
    Router::new()
        .route("/search", get(search))
        .route("/personalized", post(personalized))
        .route("/latest", get(latest))
        .route("/by-uri", get(by_uri))
        .route("/filters", get(filters))
        .route("/alternatives", post(alternatives))
}

/// Search response with its generation headers
fn tracked_response(tracked: TrackedSearch) -> impl IntoResponse {
    let mut headers = HeaderMap::new();
    headers.insert(SEARCH_GENERATION_HEADER, HeaderValue::from(tracked.generation));
    headers.insert(
        SEARCH_STALE_HEADER,
        HeaderValue::from_static(if tracked.current { "false" } else { "true" }),
    );

    (headers, Json(tracked.response))
}

/// GET /api/v1/recipes/search - Search recipes
///
/// Always succeeds: provider failures fall back to the local dataset.
async fn search(
    State(state): State<AppState>,
    Query(options): Query<RecipeSearchOptions>,
) -> impl IntoResponse {
    let tracked = RecipeService::search(state.recipes(), &state.searches, &options).await;
    tracked_response(tracked)
}

/// POST /api/v1/recipes/personalized - Search from preferences and goals
async fn personalized(
    State(state): State<AppState>,
    Json(req): Json<PersonalizedSearchRequest>,
) -> impl IntoResponse {
    let settings = state.store().snapshot().await.settings;
    let tracked =
        RecipeService::personalized(state.recipes(), &state.searches, &settings, &req).await;
    tracked_response(tracked)
}

/// GET /api/v1/recipes/by-uri?uri=... - One recipe by provider URI
async fn by_uri(
    State(state): State<AppState>,
    Query(query): Query<RecipeLookupQuery>,
) -> Result<Json<Recipe>, ApiError> {
    Ok(Json(RecipeService::by_uri(state.recipes(), &query.uri).await?))
}

/// GET /api/v1/recipes/filters - Accepted filter values
async fn filters() -> Json<FilterOptions> {
    Json(filter_options())
}

/// GET /api/v1/recipes/latest - Result of the most recently started search
async fn latest(State(state): State<AppState>) -> Result<Json<RecipeSearchResponse>, ApiError> {
    state
        .searches
        .latest()
        .await
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("No completed search yet".to_string()))
}

/// POST /api/v1/recipes/alternatives - Similar recipes for a planned meal
async fn alternatives(
    State(state): State<AppState>,
    Json(req): Json<AlternativesRequest>,
) -> Json<Vec<Recipe>> {
    Json(RecipeService::alternatives(state.recipes(), &req.recipe, req.count).await)
}
