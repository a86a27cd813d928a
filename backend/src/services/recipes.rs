//! Recipe search service

use crate::error::ApiError;
use crate::recipes::{RecipeSourceAdapter, SearchTracker, MAX_PAGE_SIZE};
use meal_planner_shared::{
    MealPlanSettings, PersonalizedSearchRequest, Recipe, RecipeSearchOptions,
    RecipeSearchResponse,
};

/// Default number of alternatives
pub const DEFAULT_ALTERNATIVES: usize = 3;

/// Query used when no cuisine preference is given
const PERSONALIZED_DEFAULT_QUERY: &str = "healthy";

/// A search result stamped with its generation
#[derive(Debug, Clone)]
pub struct TrackedSearch {
    pub generation: u64,
    /// False when a newer search started before this one completed
    pub current: bool,
    pub response: RecipeSearchResponse,
}

pub struct RecipeService;

impl RecipeService {
    /// Run a search and record it as the latest result unless a newer
    /// search has started in the meantime
    pub async fn search(
        recipes: &RecipeSourceAdapter,
        tracker: &SearchTracker,
        options: &RecipeSearchOptions,
    ) -> TrackedSearch {
        let ticket = tracker.begin();
        let response = recipes.search(options).await;
        let current = tracker.complete(ticket, response.clone()).await;

        TrackedSearch {
            generation: ticket.generation(),
            current,
            response,
        }
    }

    /// Search options for a personalized search
    ///
    /// The first cuisine preference becomes the query, the first diet
    /// preference the diet filter, every restriction a health label, and the
    /// calorie goal an upper bound. Lists and the goal missing from the
    /// request are taken from `settings`.
    pub fn personalized_options(
        request: &PersonalizedSearchRequest,
        settings: &MealPlanSettings,
    ) -> RecipeSearchOptions {
        let diets = request
            .diet_preferences
            .as_ref()
            .unwrap_or(&settings.diet_preferences);
        let restrictions = request
            .health_restrictions
            .as_ref()
            .unwrap_or(&settings.allergens);
        let calorie_goal = request
            .calorie_goal
            .or(Some(settings.calorie_goal))
            .filter(|goal| goal.is_finite() && *goal > 0.0);

        let labels: Vec<&str> = restrictions
            .iter()
            .map(|label| label.trim())
            .filter(|label| !label.is_empty())
            .collect();

        RecipeSearchOptions {
            query: Some(
                request
                    .cuisine_preferences
                    .first()
                    .cloned()
                    .unwrap_or_else(|| PERSONALIZED_DEFAULT_QUERY.to_string()),
            ),
            meal_type: request.meal_type.clone().filter(|m| !m.trim().is_empty()),
            diet: diets.first().cloned(),
            health: (!labels.is_empty()).then(|| labels.join(",")),
            calories: calorie_goal.map(|goal| format!("0-{}", goal.round())),
            from: Some(0),
            to: Some(MAX_PAGE_SIZE),
            ..Default::default()
        }
    }

    /// Personalized search, tracked like any other search
    pub async fn personalized(
        recipes: &RecipeSourceAdapter,
        tracker: &SearchTracker,
        settings: &MealPlanSettings,
        request: &PersonalizedSearchRequest,
    ) -> TrackedSearch {
        let options = Self::personalized_options(request, settings);
        Self::search(recipes, tracker, &options).await
    }

    pub async fn by_uri(recipes: &RecipeSourceAdapter, uri: &str) -> Result<Recipe, ApiError> {
        if uri.trim().is_empty() {
            return Err(ApiError::BadRequest("Recipe URI is required".to_string()));
        }
        recipes
            .recipe_by_uri(uri)
            .await
            .ok_or_else(|| ApiError::NotFound(format!("Recipe not found: {uri}")))
    }

    pub async fn alternatives(
        recipes: &RecipeSourceAdapter,
        original: &Recipe,
        count: Option<usize>,
    ) -> Vec<Recipe> {
        let count = count.unwrap_or(DEFAULT_ALTERNATIVES).clamp(1, 10);
        recipes.alternative_recipes(original, count).await
    }
}
