//! Recipe sources
//!
//! The external provider and the bundled dataset return differently shaped
//! payloads. Both are wrapped in [`RawRecipe`] and normalized here into the
//! single [`Recipe`] shape; nothing downstream sees the raw forms.

use async_trait::async_trait;
use meal_planner_shared::{
    IngredientLine, Ingredients, Macros, Recipe, RecipeOrigin, RecipeSearchOptions,
    RecipeSearchResponse,
};

pub mod adapter;
pub mod filters;
pub mod local;
pub mod provider;
pub mod tracker;

pub use adapter::{GenerationSession, RecipeSourceAdapter};
pub use filters::filter_options;
pub use local::LocalDataset;
pub use provider::ProviderClient;
pub use tracker::{SearchTicket, SearchTracker};

/// Id prefix for recipes from the bundled dataset
pub const LOCAL_ID_PREFIX: &str = "local-";
/// Id prefix for the planner's built-in recipes
pub const FALLBACK_ID_PREFIX: &str = "fallback-";
/// Prefix forced onto provider ids that would clash with the prefixes above
pub const PROVIDER_ID_PREFIX: &str = "edamam-";

/// Largest page a single search may return
pub const MAX_PAGE_SIZE: u32 = 10;

/// Anything that can answer a recipe search
///
/// Implementations never fail: problems are absorbed and reported through
/// an empty or locally sourced result.
#[async_trait]
pub trait RecipeSource: Send + Sync {
    async fn search_recipes(&self, options: &RecipeSearchOptions) -> RecipeSearchResponse;
}

// ============================================================================
// Pagination
// ============================================================================

/// Half-open result window `[from, to)`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub from: u32,
    pub to: u32,
}

impl PageWindow {
    /// Clamp a requested window: `to` must lie above `from` and at most
    /// [`MAX_PAGE_SIZE`] past it, otherwise the default page size applies
    pub fn clamp(from: Option<u32>, to: Option<u32>, default_size: u32) -> Self {
        let from = from.unwrap_or(0);
        let limit = from.saturating_add(MAX_PAGE_SIZE);
        let default_to = from.saturating_add(default_size.clamp(1, MAX_PAGE_SIZE));

        let to = match to {
            Some(to) if to > from => to.min(limit),
            _ => default_to,
        };
        Self { from, to }
    }

    pub fn len(&self) -> usize {
        self.to.saturating_sub(self.from) as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ============================================================================
// Normalization
// ============================================================================

/// A recipe as delivered by one of the sources
#[derive(Debug, Clone)]
pub enum RawRecipe {
    Provider(provider::ProviderRecipe),
    Local(local::LocalRecipe),
}

impl RawRecipe {
    pub fn normalize(self) -> Recipe {
        match self {
            RawRecipe::Provider(raw) => {
                let servings = raw.yield_or_one();
                let calories = raw
                    .calories
                    .filter(|c| c.is_finite())
                    .map(|c| (c / servings).round())
                    .unwrap_or_default();
                let macros = Macros {
                    protein: raw.per_serving("PROCNT"),
                    carbs: raw.per_serving("CHOCDF"),
                    fat: raw.per_serving("FAT"),
                };
                let prep_time = raw
                    .total_time
                    .filter(|t| t.is_finite() && *t > 0.0)
                    .map(|t| t.round() as u32);

                let mut tags: Vec<String> = Vec::new();
                for tag in raw
                    .cuisine_type
                    .iter()
                    .chain(&raw.meal_type)
                    .chain(&raw.dish_type)
                    .chain(&raw.diet_labels)
                {
                    if !tags.contains(tag) {
                        tags.push(tag.clone());
                    }
                }

                Recipe {
                    id: provider_recipe_id(&raw.uri, &raw.label),
                    title: raw.label,
                    image: raw.image,
                    source: raw.source.unwrap_or_else(|| "Edamam".to_string()),
                    url: raw.url,
                    calories_per_serving: calories,
                    macros,
                    ingredients: Ingredients::Lines(
                        raw.ingredient_lines.into_iter().map(IngredientLine::Text).collect(),
                    ),
                    prep_time,
                    tags,
                    origin: RecipeOrigin::Provider,
                    is_fallback: false,
                }
            }
            RawRecipe::Local(raw) => Recipe {
                id: format!("{LOCAL_ID_PREFIX}{}", raw.id),
                title: raw.title,
                image: raw.image_url,
                source: "Local recipes".to_string(),
                url: None,
                calories_per_serving: raw.calories,
                macros: Macros {
                    protein: raw.macros.protein.grams,
                    carbs: raw.macros.carbs.grams,
                    fat: raw.macros.fat.grams,
                },
                ingredients: Ingredients::Lines(
                    raw.ingredients.into_iter().map(IngredientLine::Text).collect(),
                ),
                prep_time: raw.prep_time,
                tags: Vec::new(),
                origin: RecipeOrigin::Local,
                is_fallback: true,
            },
        }
    }
}

/// Stable id from the provider URI: its last path segment without query
///
/// Ids that would look like local or built-in ids are re-prefixed so the
/// sources never collide.
pub fn provider_recipe_id(uri: &str, label: &str) -> String {
    let tail = uri
        .rsplit('/')
        .next()
        .and_then(|segment| segment.split('?').next())
        .unwrap_or_default()
        .trim();

    if tail.is_empty() {
        let slug: String = label
            .to_lowercase()
            .chars()
            .map(|c| if c.is_alphanumeric() { c } else { '-' })
            .collect();
        return format!("{PROVIDER_ID_PREFIX}{slug}");
    }

    if tail.starts_with(LOCAL_ID_PREFIX) || tail.starts_with(FALLBACK_ID_PREFIX) {
        format!("{PROVIDER_ID_PREFIX}{tail}")
    } else {
        tail.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_window_defaults() {
        assert_eq!(PageWindow::clamp(None, None, 10), PageWindow { from: 0, to: 10 });
        assert_eq!(PageWindow::clamp(Some(5), None, 4), PageWindow { from: 5, to: 9 });
    }

    #[test]
    fn test_window_clamped() {
        assert_eq!(PageWindow::clamp(Some(0), Some(50), 10), PageWindow { from: 0, to: 10 });
        assert_eq!(PageWindow::clamp(Some(20), Some(3), 10), PageWindow { from: 20, to: 30 });
        assert_eq!(PageWindow::clamp(Some(2), Some(6), 10).len(), 4);
    }

    #[test]
    fn test_provider_id_from_uri() {
        assert_eq!(
            provider_recipe_id("http://www.edamam.com/ontologies/edamam.owl#recipe_abc?x=1", "X"),
            "edamam.owl#recipe_abc"
        );
        assert_eq!(provider_recipe_id("https://api/recipes/local-3", "X"), "edamam-local-3");
        assert_eq!(provider_recipe_id("", "Kip Salade"), "edamam-kip-salade");
    }

    #[test]
    fn test_normalize_provider() {
        let raw: provider::ProviderRecipe = serde_json::from_str(
            r#"{
                "uri": "http://www.edamam.com/ontologies/edamam.owl#recipe_1",
                "label": "Greek Salad",
                "yield": 2,
                "calories": 641,
                "totalTime": 0,
                "ingredientLines": ["200g feta"],
                "cuisineType": ["greek"],
                "mealType": ["lunch/dinner"],
                "dietLabels": ["Low-Carb"],
                "totalNutrients": {
                    "PROCNT": {"quantity": 30.2},
                    "CHOCDF": {"quantity": 21},
                    "FAT": {"quantity": 55}
                }
            }"#,
        )
        .unwrap();

        let recipe = RawRecipe::Provider(raw).normalize();
        assert_eq!(recipe.calories_per_serving, 321.0);
        assert_eq!(recipe.macros, Macros { protein: 15.0, carbs: 11.0, fat: 28.0 });
        assert_eq!(recipe.prep_time, None);
        assert_eq!(recipe.tags, vec!["greek", "lunch/dinner", "Low-Carb"]);
        assert!(!recipe.is_fallback);
        assert_eq!(recipe.origin, RecipeOrigin::Provider);
    }

    #[test]
    fn test_normalize_local() {
        let raw = LocalDataset.all()[2].clone();
        let recipe = RawRecipe::Local(raw).normalize();
        assert_eq!(recipe.id, "local-3");
        assert_eq!(recipe.title, "Kip Quinoa Bowl");
        assert_eq!(recipe.macros.protein, 35.0);
        assert!(recipe.is_fallback && recipe.is_local());
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Property: provider ids never use the local or built-in prefixes
        #[test]
        fn prop_provider_ids_never_collide(tail in "[a-z_-]{0,20}") {
            let id = provider_recipe_id(&format!("http://x/{tail}"), "label");
            prop_assert!(!id.starts_with(LOCAL_ID_PREFIX));
            prop_assert!(!id.starts_with(FALLBACK_ID_PREFIX));
        }

        #[test]
        fn prop_window_never_exceeds_max(from in 0u32..1000, to in proptest::option::of(0u32..2000)) {
            let window = PageWindow::clamp(Some(from), to, 10);
            prop_assert!(window.len() >= 1 && window.len() <= MAX_PAGE_SIZE as usize);
        }
    }
}
