//! Bundled local recipe dataset
//!
//! Serves searches when the provider cannot. The dataset ships inside the
//! binary and is parsed once on first use.

use meal_planner_shared::RecipeSearchOptions;
use once_cell::sync::Lazy;
use serde::Deserialize;
use tracing::{debug, error};

use super::PageWindow;

const LOCAL_RECIPES_JSON: &str = include_str!("../../data/local_recipes.json");

static LOCAL_RECIPES: Lazy<Vec<LocalRecipe>> = Lazy::new(|| {
    serde_json::from_str(LOCAL_RECIPES_JSON).unwrap_or_else(|e| {
        error!(error = %e, "Bundled recipe dataset is malformed; local search disabled");
        Vec::new()
    })
});

// ============================================================================
// Dataset payload
// ============================================================================

/// Grams and calorie share of one macro
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(default)]
pub struct MacroShare {
    pub grams: f64,
    pub percentage: f64,
}

/// Macro block keyed by Dutch macro names
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(default)]
pub struct LocalMacros {
    #[serde(rename = "Eiwitten")]
    pub protein: MacroShare,
    #[serde(rename = "Koolhydraten")]
    pub carbs: MacroShare,
    #[serde(rename = "Vetten")]
    pub fat: MacroShare,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalRecipe {
    pub id: u32,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    /// Calories per serving
    #[serde(default)]
    pub calories: f64,
    #[serde(default)]
    pub prep_time: Option<u32>,
    #[serde(default)]
    pub macros: LocalMacros,
    #[serde(default)]
    pub ingredients: Vec<String>,
}

// ============================================================================
// Range filters
// ============================================================================

/// Inclusive numeric range in provider syntax: `MIN-MAX`, `MIN+` or `MAX`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RangeFilter {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl RangeFilter {
    /// Parse a range; `None` for blank or malformed input
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }

        let number = |s: &str| s.trim().parse::<f64>().ok().filter(|v| v.is_finite());

        if let Some(min) = raw.strip_suffix('+') {
            return Some(Self { min: Some(number(min)?), max: None });
        }
        if let Some((min, max)) = raw.split_once('-') {
            return Some(Self {
                min: Some(number(min)?),
                max: Some(number(max)?),
            });
        }
        Some(Self { min: None, max: Some(number(raw)?) })
    }

    pub fn contains(&self, value: f64) -> bool {
        self.min.map_or(true, |min| min <= value) && self.max.map_or(true, |max| value <= max)
    }
}

fn range_from(raw: &Option<String>, field: &str) -> Option<RangeFilter> {
    let raw = raw.as_deref()?;
    let range = RangeFilter::parse(raw);
    if range.is_none() && !raw.trim().is_empty() {
        debug!(field, value = raw, "Ignoring malformed range filter");
    }
    range
}

// ============================================================================
// Search
// ============================================================================

/// Query interface over the bundled dataset
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalDataset;

impl LocalDataset {
    pub fn all(&self) -> &'static [LocalRecipe] {
        &LOCAL_RECIPES
    }

    pub fn by_id(&self, id: u32) -> Option<LocalRecipe> {
        self.all().iter().find(|r| r.id == id).cloned()
    }

    /// Recipes matching the title, calorie and time predicates, paged
    ///
    /// Returns the page together with the total number of matches.
    pub fn search(
        &self,
        options: &RecipeSearchOptions,
        window: PageWindow,
    ) -> (Vec<LocalRecipe>, usize) {
        let query = options
            .query
            .as_deref()
            .map(|q| q.trim().to_lowercase())
            .filter(|q| !q.is_empty());
        let calories = range_from(&options.calories, "calories");
        let time = range_from(&options.time, "time");

        let matches: Vec<&LocalRecipe> = self
            .all()
            .iter()
            .filter(|r| {
                query
                    .as_ref()
                    .map_or(true, |q| r.title.to_lowercase().contains(q.as_str()))
            })
            .filter(|r| calories.map_or(true, |range| range.contains(r.calories)))
            .filter(|r| match (time, r.prep_time) {
                (Some(range), Some(minutes)) => range.contains(f64::from(minutes)),
                _ => true,
            })
            .collect();

        let total = matches.len();
        let page = matches
            .into_iter()
            .skip(window.from as usize)
            .take(window.len())
            .cloned()
            .collect();

        (page, total)
    }
}
