//! Filter values understood by the recipe provider

use meal_planner_shared::FilterOptions;

const CUISINE_TYPES: &[&str] = &[
    "american", "asian", "british", "caribbean", "central europe", "chinese", "eastern europe",
    "french", "indian", "italian", "japanese", "kosher", "mediterranean", "mexican",
    "middle eastern", "nordic", "south american", "south east asian",
];

const MEAL_TYPES: &[&str] = &["breakfast", "lunch", "dinner", "snack", "teatime"];

const DISH_TYPES: &[&str] = &[
    "alcohol-cocktail", "biscuits and cookies", "bread", "cereals", "condiments and sauces",
    "desserts", "drinks", "egg", "fats and oils", "fish", "frozen desserts", "fruit", "grain",
    "ice cream and custard", "main course", "meat", "milk", "pancake", "pasta", "pastry",
    "pies and tarts", "pizza", "pork", "poultry", "preserve", "salad", "sandwiches", "seafood",
    "side dish", "soup", "special occasions", "starter", "sweets", "vegetables", "vegetarian",
];

const DIETS: &[&str] = &[
    "balanced", "high-fiber", "high-protein", "low-carb", "low-fat", "low-sodium",
];

const HEALTH_LABELS: &[&str] = &[
    "alcohol-free", "celery-free", "crustacean-free", "dairy-free", "egg-free", "fish-free",
    "fodmap-free", "gluten-free", "immuno-supportive", "keto-friendly", "kidney-friendly",
    "kosher", "low-potassium", "lupine-free", "Mediterranean", "mollusk-free", "mustard-free",
    "no-oil-added", "paleo", "peanut-free", "pescatarian", "pork-free", "red-meat-free",
    "sesame-free", "shellfish-free", "soy-free", "sugar-conscious", "tree-nut-free", "vegan",
    "vegetarian", "wheat-free",
];

pub fn filter_options() -> FilterOptions {
    FilterOptions {
        cuisine_types: CUISINE_TYPES,
        meal_types: MEAL_TYPES,
        dish_types: DISH_TYPES,
        diets: DIETS,
        health_labels: HEALTH_LABELS,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_planner_meal_types_are_filterable() {
        let options = filter_options();
        for meal in ["breakfast", "lunch", "dinner", "snack"] {
            assert!(options.meal_types.contains(&meal));
        }
        assert!(options.health_labels.contains(&"gluten-free"));
        assert_eq!(options.diets.len(), 6);
    }
}
