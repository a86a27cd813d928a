//! Built-in recipes used when a search returns nothing for a meal slot

use meal_planner_shared::{IngredientLine, Ingredients, Macros, MealType, Recipe, RecipeOrigin};

use crate::recipes::FALLBACK_ID_PREFIX;

/// The fixed built-in recipe for a meal type
///
/// The same recipe is returned every time; a week may repeat it.
pub fn builtin_recipe(meal_type: MealType) -> Recipe {
    let (title, calories, (protein, carbs, fat), prep_time, tags, ingredients): (
        &str,
        f64,
        (f64, f64, f64),
        u32,
        &[&str],
        &[&str],
    ) = match meal_type {
        MealType::Breakfast => (
            "Griekse Yoghurt met Fruit",
            280.0,
            (20.0, 30.0, 10.0),
            5,
            &["ontbijt", "proteïnerijk"],
            &["200g griekse yoghurt", "100g blauwe bessen", "1 banaan", "1 eetlepel honing"],
        ),
        MealType::Lunch => (
            "Quinoa Salade met Gegrilde Kip",
            420.0,
            (28.0, 40.0, 12.0),
            20,
            &["lunch", "proteïnerijk"],
            &["75g quinoa", "120g kipfilet", "1 komkommer", "100g cherrytomaatjes", "1 eetlepel olijfolie"],
        ),
        MealType::Dinner => (
            "Zalm met Zoete Aardappel",
            520.0,
            (35.0, 40.0, 22.0),
            30,
            &["diner", "vis"],
            &["150g zalmfilet", "200g zoete aardappel", "100g groene asperges", "1 eetlepel olijfolie"],
        ),
        MealType::Snack => (
            "Griekse Yoghurt met Honing",
            180.0,
            (15.0, 12.0, 8.0),
            2,
            &["snack", "proteïnerijk"],
            &["150g griekse yoghurt", "1 theelepel honing", "10g walnoten"],
        ),
    };

    Recipe {
        id: format!("{FALLBACK_ID_PREFIX}{}", meal_type.as_str()),
        title: title.to_string(),
        image: None,
        source: "Built-in".to_string(),
        url: None,
        calories_per_serving: calories,
        macros: Macros { protein, carbs, fat },
        ingredients: Ingredients::Lines(
            ingredients
                .iter()
                .map(|line| IngredientLine::Text((*line).to_string()))
                .collect(),
        ),
        prep_time: Some(prep_time),
        tags: tags.iter().map(|t| (*t).to_string()).collect(),
        origin: RecipeOrigin::BuiltIn,
        is_fallback: true,
    }
}
