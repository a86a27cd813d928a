//! Shopping list service

use crate::error::ApiError;
use crate::store::{MealPlanAction, MealPlanStore};
use meal_planner_shared::{shopping_list, AddShoppingItemRequest, ShoppingListItem};
use serde::Serialize;
use tracing::info;

/// CSV row layout
#[derive(Debug, Serialize)]
struct ShoppingCsvRow<'a> {
    category: &'a str,
    name: &'a str,
    amount: &'a str,
    unit: &'a str,
    checked: bool,
}

pub struct ShoppingListService;

impl ShoppingListService {
    pub async fn list(store: &MealPlanStore) -> Vec<ShoppingListItem> {
        store.snapshot().await.shopping_list
    }

    /// Rebuild the list from the current week, replacing manual edits
    pub async fn generate(store: &MealPlanStore) -> Result<Vec<ShoppingListItem>, ApiError> {
        let menu = store.snapshot().await.week_menu;
        let items = shopping_list::generate(&menu);
        info!(items = items.len(), "Generated shopping list");

        let state = store.dispatch(MealPlanAction::SetShoppingList(items)).await?;
        Ok(state.shopping_list)
    }

    pub async fn add_item(
        store: &MealPlanStore,
        request: AddShoppingItemRequest,
    ) -> Result<Vec<ShoppingListItem>, ApiError> {
        let state = store
            .dispatch(MealPlanAction::AddShoppingItem {
                name: request.name,
                amount: request.amount,
                unit: request.unit,
            })
            .await?;
        Ok(state.shopping_list)
    }

    pub async fn toggle_item(
        store: &MealPlanStore,
        index: usize,
    ) -> Result<Vec<ShoppingListItem>, ApiError> {
        let state = store
            .dispatch(MealPlanAction::ToggleShoppingItem { index })
            .await?;
        Ok(state.shopping_list)
    }

    pub async fn remove_item(
        store: &MealPlanStore,
        index: usize,
    ) -> Result<Vec<ShoppingListItem>, ApiError> {
        let state = store
            .dispatch(MealPlanAction::RemoveShoppingItem { index })
            .await?;
        Ok(state.shopping_list)
    }

    pub async fn clear(store: &MealPlanStore) -> Result<(), ApiError> {
        store.dispatch(MealPlanAction::ClearShoppingList).await?;
        Ok(())
    }

    /// Render items as CSV with a header row
    pub fn export_csv(items: &[ShoppingListItem]) -> Result<String, ApiError> {
        let mut wtr = csv::Writer::from_writer(vec![]);
        for item in items {
            wtr.serialize(ShoppingCsvRow {
                category: item.category.as_str(),
                name: &item.name,
                amount: &item.amount,
                unit: &item.unit,
                checked: item.checked,
            })
            .map_err(|e| ApiError::Internal(anyhow::anyhow!("CSV serialization error: {}", e)))?;
        }
        let bytes = wtr
            .into_inner()
            .map_err(|e| ApiError::Internal(anyhow::anyhow!("CSV flush error: {}", e)))?;
        String::from_utf8(bytes)
            .map_err(|e| ApiError::Internal(anyhow::anyhow!("CSV encoding error: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use meal_planner_shared::ShoppingCategory;

    #[test]
    fn test_csv_export_layout() {
        let items = vec![ShoppingListItem {
            name: "kipfilet, zonder vel".to_string(),
            amount: "300".to_string(),
            unit: "g".to_string(),
            category: ShoppingCategory::MeatSeafood,
            checked: true,
        }];

        let csv = ShoppingListService::export_csv(&items).unwrap();
        let mut lines = csv.lines();
        assert_eq!(lines.next(), Some("category,name,amount,unit,checked"));
        assert_eq!(
            lines.next(),
            Some("Meat & Seafood,\"kipfilet, zonder vel\",300,g,true")
        );
    }

    #[test]
    fn test_empty_export_is_empty() {
        assert_eq!(ShoppingListService::export_csv(&[]).unwrap(), "");
    }
}
