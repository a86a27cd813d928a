//! Business logic services
//!
//! Services coordinate the pure engine, the recipe adapter and the
//! meal-plan store. Handlers stay thin.

pub mod meal_plan;
pub mod nutrition;
pub mod recipes;
pub mod shopping_list;

pub use meal_plan::MealPlanService;
pub use nutrition::NutritionService;
pub use recipes::{RecipeService, TrackedSearch};
pub use shopping_list::ShoppingListService;
