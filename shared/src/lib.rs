//! Meal Planner Shared Library
//!
//! The pure half of the nutrition and meal-planning engine: data model,
//! calorie/macro calculator, nutrition aggregation and shopping list
//! generation. Shared by the backend and WASM modules; performs no I/O.

pub mod calculator;
pub mod errors;
pub mod models;
pub mod nutrition_summary;
pub mod shopping_list;
pub mod types;
pub mod validation;

// Re-export commonly used items
pub use calculator::*;
pub use errors::*;
pub use models::*;
pub use types::*;

pub use nutrition_summary::{summarize, DayNutrition, GoalComparison, NutritionSummary};
