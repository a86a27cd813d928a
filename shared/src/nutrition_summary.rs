//! Nutrition aggregation over a week menu
//!
//! Sums calories and macros per day and per week, averages them over the days
//! that actually have food planned, and compares the averages with targets.
//! Malformed recipe values contribute zero; aggregation never fails.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::models::{Day, Macros, NutritionTargets, WeekMenu};

/// Totals for a single day
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DayNutrition {
    pub calories: f64,
    pub macros: Macros,
    /// Number of filled meal slots
    pub meals: usize,
}

/// Average intake as a rounded percentage of each target
///
/// A metric is `None` when its target is zero or not a finite number.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoalComparison {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calories: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub protein: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub carbs: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fat: Option<u32>,
}

impl GoalComparison {
    pub fn is_empty(&self) -> bool {
        self.calories.is_none() && self.protein.is_none() && self.carbs.is_none() && self.fat.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NutritionSummary {
    pub total_calories: f64,
    pub average_daily_calories: f64,
    pub total_macros: Macros,
    pub average_daily_macros: Macros,
    pub per_day: BTreeMap<Day, DayNutrition>,
    /// Days whose summed calories are above zero
    pub active_days: usize,
    pub goal_comparison: GoalComparison,
}

/// Summarize a week menu against daily targets
pub fn summarize(menu: &WeekMenu, targets: &NutritionTargets) -> NutritionSummary {
    let per_day: BTreeMap<Day, DayNutrition> = menu
        .days()
        .map(|(day, meals)| {
            let totals = meals
                .values()
                .flatten()
                .fold(DayNutrition::default(), |mut acc, recipe| {
                    let macros = recipe.safe_macros();
                    acc.calories += recipe.safe_calories();
                    acc.macros.protein += macros.protein;
                    acc.macros.carbs += macros.carbs;
                    acc.macros.fat += macros.fat;
                    acc.meals += 1;
                    acc
                });
            (day, totals)
        })
        .collect();

    let mut total_calories = 0.0;
    let mut total_macros = Macros::default();
    let mut active_days = 0;

    for totals in per_day.values() {
        total_calories += totals.calories;
        total_macros.protein += totals.macros.protein;
        total_macros.carbs += totals.macros.carbs;
        total_macros.fat += totals.macros.fat;
        if totals.calories > 0.0 {
            active_days += 1;
        }
    }

    let average = |total: f64| {
        if active_days == 0 {
            0.0
        } else {
            (total / active_days as f64).round()
        }
    };

    let average_daily_calories = average(total_calories);
    let average_daily_macros = Macros {
        protein: average(total_macros.protein),
        carbs: average(total_macros.carbs),
        fat: average(total_macros.fat),
    };

    let goal_comparison = if active_days == 0 {
        GoalComparison::default()
    } else {
        GoalComparison {
            calories: percent_of(average_daily_calories, targets.calories),
            protein: percent_of(average_daily_macros.protein, targets.protein),
            carbs: percent_of(average_daily_macros.carbs, targets.carbs),
            fat: percent_of(average_daily_macros.fat, targets.fat),
        }
    };

    NutritionSummary {
        total_calories: total_calories.round(),
        average_daily_calories,
        total_macros: Macros {
            protein: total_macros.protein.round(),
            carbs: total_macros.carbs.round(),
            fat: total_macros.fat.round(),
        },
        average_daily_macros,
        per_day,
        active_days,
        goal_comparison,
    }
}

fn percent_of(value: f64, target: f64) -> Option<u32> {
    if !target.is_finite() || target <= 0.0 {
        return None;
    }
    Some((value / target * 100.0).round() as u32)
}
