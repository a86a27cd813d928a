//! Meal-plan state and its pure reducer

use chrono::{DateTime, Utc};
use meal_planner_shared::{
    shopping_list, Day, MacroGrams, MealPlanSettings, MealPlanSettingsPatch, MealType,
    NutritionPlan, Recipe, SavedMenu, ShoppingListItem, WeekMenu,
};
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use crate::storage::PersistedState;

/// Everything the planner holds in memory
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MealPlanState {
    pub week_menu: WeekMenu,
    pub saved_menus: Vec<SavedMenu>,
    pub shopping_list: Vec<ShoppingListItem>,
    pub settings: MealPlanSettings,
    pub nutrition_plan: Option<NutritionPlan>,
}

impl From<PersistedState> for MealPlanState {
    fn from(persisted: PersistedState) -> Self {
        Self {
            week_menu: persisted.week_menu,
            saved_menus: persisted.saved_menus,
            shopping_list: persisted.shopping_list,
            settings: persisted.settings,
            nutrition_plan: persisted.nutrition_plan,
        }
    }
}

/// State transitions
///
/// Identifiers and timestamps travel inside the action so that [`reduce`]
/// stays deterministic.
#[derive(Debug, Clone, PartialEq)]
pub enum MealPlanAction {
    SetWeekMenu(WeekMenu),
    AddRecipe {
        day: Day,
        meal_type: MealType,
        recipe: Recipe,
    },
    RemoveRecipe {
        day: Day,
        meal_type: MealType,
    },
    ClearWeekMenu,
    UpdateSettings(MealPlanSettingsPatch),
    SetNutritionPlan(NutritionPlan),
    SaveMenu {
        id: Uuid,
        name: String,
        created_at: DateTime<Utc>,
    },
    LoadSavedMenu {
        id: Uuid,
    },
    DeleteSavedMenu {
        id: Uuid,
    },
    SetShoppingList(Vec<ShoppingListItem>),
    AddShoppingItem {
        name: String,
        amount: String,
        unit: String,
    },
    ToggleShoppingItem {
        index: usize,
    },
    RemoveShoppingItem {
        index: usize,
    },
    ClearShoppingList,
}

/// Persisted keys an action may change
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Touched {
    pub week_menu: bool,
    pub settings: bool,
    pub saved_menus: bool,
    pub shopping_list: bool,
    pub nutrition_plan: bool,
}

impl MealPlanAction {
    pub fn name(&self) -> &'static str {
        match self {
            MealPlanAction::SetWeekMenu(_) => "set_week_menu",
            MealPlanAction::AddRecipe { .. } => "add_recipe",
            MealPlanAction::RemoveRecipe { .. } => "remove_recipe",
            MealPlanAction::ClearWeekMenu => "clear_week_menu",
            MealPlanAction::UpdateSettings(_) => "update_settings",
            MealPlanAction::SetNutritionPlan(_) => "set_nutrition_plan",
            MealPlanAction::SaveMenu { .. } => "save_menu",
            MealPlanAction::LoadSavedMenu { .. } => "load_saved_menu",
            MealPlanAction::DeleteSavedMenu { .. } => "delete_saved_menu",
            MealPlanAction::SetShoppingList(_) => "set_shopping_list",
            MealPlanAction::AddShoppingItem { .. } => "add_shopping_item",
            MealPlanAction::ToggleShoppingItem { .. } => "toggle_shopping_item",
            MealPlanAction::RemoveShoppingItem { .. } => "remove_shopping_item",
            MealPlanAction::ClearShoppingList => "clear_shopping_list",
        }
    }

    pub fn touches(&self) -> Touched {
        match self {
            MealPlanAction::SetWeekMenu(_)
            | MealPlanAction::AddRecipe { .. }
            | MealPlanAction::RemoveRecipe { .. }
            | MealPlanAction::ClearWeekMenu
            | MealPlanAction::LoadSavedMenu { .. } => Touched {
                week_menu: true,
                ..Default::default()
            },
            MealPlanAction::UpdateSettings(_) => Touched {
                settings: true,
                ..Default::default()
            },
            MealPlanAction::SetNutritionPlan(_) => Touched {
                settings: true,
                nutrition_plan: true,
                ..Default::default()
            },
            MealPlanAction::SaveMenu { .. } | MealPlanAction::DeleteSavedMenu { .. } => Touched {
                saved_menus: true,
                ..Default::default()
            },
            MealPlanAction::SetShoppingList(_)
            | MealPlanAction::AddShoppingItem { .. }
            | MealPlanAction::ToggleShoppingItem { .. }
            | MealPlanAction::RemoveShoppingItem { .. }
            | MealPlanAction::ClearShoppingList => Touched {
                shopping_list: true,
                ..Default::default()
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ReduceError {
    #[error("Saved menu {0} not found")]
    SavedMenuNotFound(Uuid),

    #[error("Shopping list item {0} not found")]
    ShoppingItemNotFound(usize),

    #[error("{0} must not be empty")]
    EmptyName(&'static str),
}

/// Apply an action to a state, producing the next state
pub fn reduce(state: &MealPlanState, action: &MealPlanAction) -> Result<MealPlanState, ReduceError> {
    let mut next = state.clone();

    match action {
        MealPlanAction::SetWeekMenu(menu) => next.week_menu = menu.clone(),
        MealPlanAction::AddRecipe {
            day,
            meal_type,
            recipe,
        } => next.week_menu.set(*day, *meal_type, Some(recipe.clone())),
        MealPlanAction::RemoveRecipe { day, meal_type } => {
            next.week_menu.set(*day, *meal_type, None)
        }
        MealPlanAction::ClearWeekMenu => next.week_menu = WeekMenu::new(),
        MealPlanAction::UpdateSettings(patch) => next.settings = state.settings.apply(patch),
        MealPlanAction::SetNutritionPlan(plan) => {
            // The plan's goal and gram targets become the comparison targets.
            next.settings = state.settings.apply(&MealPlanSettingsPatch {
                calorie_goal: Some(plan.calorie_goal),
                macro_targets: Some(MacroGrams {
                    protein: plan.macro_targets.protein,
                    carbs: plan.macro_targets.carbs,
                    fat: plan.macro_targets.fat,
                }),
                ..Default::default()
            });
            next.nutrition_plan = Some(plan.clone());
        }
        MealPlanAction::SaveMenu {
            id,
            name,
            created_at,
        } => {
            let name = name.trim();
            if name.is_empty() {
                return Err(ReduceError::EmptyName("Menu name"));
            }
            next.saved_menus.push(SavedMenu {
                id: *id,
                name: name.to_string(),
                created_at: *created_at,
                menu: state.week_menu.clone(),
            });
        }
        MealPlanAction::LoadSavedMenu { id } => {
            let saved = state
                .saved_menus
                .iter()
                .find(|m| m.id == *id)
                .ok_or(ReduceError::SavedMenuNotFound(*id))?;
            next.week_menu = saved.menu.clone();
        }
        MealPlanAction::DeleteSavedMenu { id } => {
            let before = next.saved_menus.len();
            next.saved_menus.retain(|m| m.id != *id);
            if next.saved_menus.len() == before {
                return Err(ReduceError::SavedMenuNotFound(*id));
            }
        }
        MealPlanAction::SetShoppingList(items) => next.shopping_list = items.clone(),
        MealPlanAction::AddShoppingItem { name, amount, unit } => {
            shopping_list::add_manual_item(&mut next.shopping_list, name, amount, unit)
                .ok_or(ReduceError::EmptyName("Item name"))?;
        }
        MealPlanAction::ToggleShoppingItem { index } => {
            if !shopping_list::toggle_item(&mut next.shopping_list, *index) {
                return Err(ReduceError::ShoppingItemNotFound(*index));
            }
        }
        MealPlanAction::RemoveShoppingItem { index } => {
            shopping_list::remove_item(&mut next.shopping_list, *index)
                .ok_or(ReduceError::ShoppingItemNotFound(*index))?;
        }
        MealPlanAction::ClearShoppingList => next.shopping_list.clear(),
    }

    Ok(next)
}
