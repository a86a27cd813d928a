//! Shopping list API routes

use crate::error::ApiError;
use crate::services::ShoppingListService;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::IntoResponse,
    routing::{delete, get, post},
    Json, Router,
};
use meal_planner_shared::{AddShoppingItemRequest, ShoppingListItem};

/// Create shopping list routes
pub fn shopping_list_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list).delete(clear))
        .route("/generate", post(generate))
        .route("/items", post(add_item))
        .route("/items/:index/toggle", post(toggle_item))
        .route("/items/:index", delete(remove_item))
        .route("/export", get(export_csv))
}

async fn list(State(state): State<AppState>) -> Json<Vec<ShoppingListItem>> {
    Json(ShoppingListService::list(state.store()).await)
}

async fn clear(State(state): State<AppState>) -> Result<StatusCode, ApiError> {
    ShoppingListService::clear(state.store()).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/shopping-list/generate - Rebuild from the current week
async fn generate(State(state): State<AppState>) -> Result<Json<Vec<ShoppingListItem>>, ApiError> {
    Ok(Json(ShoppingListService::generate(state.store()).await?))
}

/// POST /api/v1/shopping-list/items - Add or merge a manual item
async fn add_item(
    State(state): State<AppState>,
    Json(req): Json<AddShoppingItemRequest>,
) -> Result<Json<Vec<ShoppingListItem>>, ApiError> {
    Ok(Json(ShoppingListService::add_item(state.store(), req).await?))
}

async fn toggle_item(
    State(state): State<AppState>,
    Path(index): Path<usize>,
) -> Result<Json<Vec<ShoppingListItem>>, ApiError> {
    Ok(Json(ShoppingListService::toggle_item(state.store(), index).await?))
}

async fn remove_item(
    State(state): State<AppState>,
    Path(index): Path<usize>,
) -> Result<Json<Vec<ShoppingListItem>>, ApiError> {
    Ok(Json(ShoppingListService::remove_item(state.store(), index).await?))
}

/// GET /api/v1/shopping-list/export - Download as CSV
async fn export_csv(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let items = ShoppingListService::list(state.store()).await;
    let csv = ShoppingListService::export_csv(&items)?;

    let mut headers = HeaderMap::new();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("text/csv"));
    headers.insert(
        header::CONTENT_DISPOSITION,
        HeaderValue::from_static("attachment; filename=\"shopping-list.csv\""),
    );

    Ok((headers, csv))
}
