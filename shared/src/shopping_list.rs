//! Shopping list generation
//!
//! Flattens every recipe in a week menu into ingredient entries, merges
//! duplicates by name, assigns each a grocery category and keeps the result
//! sorted by category then name.

use regex_lite::Regex;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::OnceLock;

use crate::models::{IngredientLine, Ingredients, ShoppingCategory, ShoppingListItem, WeekMenu};

// ============================================================================
// Ingredient line parsing
// ============================================================================

/// Leading quantity: `200`, `1.5`, `1,5` or `1/2`
const QUANTITY_PATTERN: &str = r"^(\d+(?:[.,]\d+)?(?:/\d+)?)\s*(.*)$";

/// Units recognised directly after a leading quantity
const UNITS: &[&str] = &[
    "g", "gr", "gram", "grams", "kg", "mg", "ml", "cl", "dl", "l", "liter", "el", "tl",
    "eetlepel", "eetlepels", "theelepel", "theelepels", "tbsp", "tsp", "cup", "cups", "oz",
    "lb", "lbs", "snuf", "snufje", "stuk", "stuks", "teen", "teentje", "teentjes", "blik",
    "blikje", "bos", "bosje", "handje", "handvol", "plak", "plakje", "plakjes", "scoop",
    "scoops", "schep",
];

/// Suffixes that turn the rest of a line into a non-numeric amount
const TO_TASTE: &[&str] = &["naar smaak", "to taste"];

fn quantity_regex() -> Option<&'static Regex> {
    static QUANTITY: OnceLock<Option<Regex>> = OnceLock::new();
    QUANTITY.get_or_init(|| Regex::new(QUANTITY_PATTERN).ok()).as_ref()
}

/// An ingredient split into its parts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedIngredient {
    pub name: String,
    pub amount: String,
    pub unit: String,
}

/// Text before the first comma; the rest is a preparation note
fn without_note(text: &str) -> &str {
    text.split(',').next().unwrap_or_default().trim()
}

/// Parse a free-text ingredient line such as `200g tomaat`,
/// `1,5 kg aardappelen` or `1/2 theelepel komijn`
///
/// The leading quantity is read first, so a decimal comma survives; any
/// later comma starts a preparation note that is dropped. Lines without a
/// leading quantity keep the whole text as the name, except that a trailing
/// "naar smaak" becomes the amount.
pub fn parse_ingredient_line(line: &str) -> ParsedIngredient {
    let line = line.trim();

    let captures = quantity_regex().and_then(|re| re.captures(line));
    if let Some(caps) = captures {
        let amount = caps.get(1).map_or("", |m| m.as_str()).to_string();
        let rest = without_note(caps.get(2).map_or("", |m| m.as_str()));

        let (first, remainder) = match rest.split_once(char::is_whitespace) {
            Some((first, remainder)) => (first, remainder.trim()),
            None => (rest, ""),
        };

        if UNITS.contains(&first.to_lowercase().as_str()) && !remainder.is_empty() {
            return ParsedIngredient {
                name: remainder.to_string(),
                amount,
                unit: first.to_string(),
            };
        }
        if !rest.is_empty() {
            return ParsedIngredient {
                name: rest.to_string(),
                amount,
                unit: String::new(),
            };
        }
    }

    let line = without_note(line);
    for suffix in TO_TASTE {
        let Some(split) = line.len().checked_sub(suffix.len()) else {
            continue;
        };
        if let (Some(head), Some(tail)) = (line.get(..split), line.get(split..)) {
            let name = head.trim();
            if tail.eq_ignore_ascii_case(suffix) && !name.is_empty() {
                return ParsedIngredient {
                    name: name.to_string(),
                    amount: (*suffix).to_string(),
                    unit: String::new(),
                };
            }
        }
    }

    ParsedIngredient {
        name: line.to_string(),
        amount: String::new(),
        unit: String::new(),
    }
}

/// Split a comma-delimited ingredient string, keeping decimal commas
/// such as `1,5` inside their part
fn split_delimited(text: &str) -> Vec<&str> {
    let bytes = text.as_bytes();
    let mut parts = Vec::new();
    let mut start = 0;

    for (i, byte) in bytes.iter().enumerate() {
        if *byte != b',' {
            continue;
        }
        let decimal = i > 0
            && bytes[i - 1].is_ascii_digit()
            && bytes.get(i + 1).is_some_and(u8::is_ascii_digit);
        if !decimal {
            parts.push(&text[start..i]);
            start = i + 1;
        }
    }
    parts.push(&text[start..]);
    parts
}

/// Expand a recipe's ingredients into parsed entries
///
/// Line-item text loses any preparation note after its quantity; a
/// comma-delimited string is split into one entry per part.
pub fn extract_ingredients(ingredients: &Ingredients) -> Vec<ParsedIngredient> {
    let parsed: Vec<ParsedIngredient> = match ingredients {
        Ingredients::Lines(lines) => lines
            .iter()
            .map(|line| match line {
                IngredientLine::Text(text) => parse_ingredient_line(text),
                IngredientLine::Structured { name, amount, unit } => ParsedIngredient {
                    name: name.trim().to_string(),
                    amount: amount.trim().to_string(),
                    unit: unit.trim().to_string(),
                },
            })
            .collect(),
        Ingredients::Delimited(text) => split_delimited(text)
            .into_iter()
            .map(parse_ingredient_line)
            .collect(),
    };

    parsed.into_iter().filter(|p| !p.name.is_empty()).collect()
}

// ============================================================================
// Quantities
// ============================================================================

/// Strictly parse a quantity; `1,5` is read as a decimal comma
pub fn parse_quantity(amount: &str) -> Option<f64> {
    let amount = amount.trim();
    if amount.is_empty() {
        return None;
    }

    let value = match amount.split_once('/') {
        Some((num, den)) => {
            let num: f64 = num.trim().parse().ok()?;
            let den: f64 = den.trim().parse().ok()?;
            if den == 0.0 {
                return None;
            }
            num / den
        }
        None => amount.replace(',', ".").parse().ok()?,
    };

    value.is_finite().then_some(value)
}

/// Whole numbers without a decimal point, others with at most two decimals
pub fn format_quantity(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        let text = format!("{value:.2}");
        text.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

fn describe(amount: &str, unit: &str) -> String {
    format!("{} {}", amount.trim(), unit.trim()).trim().to_string()
}

/// Merge a new entry into an existing item of the same name
///
/// Quantities are summed when both are numeric and the units agree (or one
/// is missing); otherwise both are kept as a comma-joined description.
fn merge_into(item: &mut ShoppingListItem, amount: &str, unit: &str) {
    let same_unit =
        item.unit.is_empty() || unit.is_empty() || item.unit.eq_ignore_ascii_case(unit);

    match (parse_quantity(&item.amount), parse_quantity(amount)) {
        (Some(a), Some(b)) if same_unit => {
            item.amount = format_quantity(a + b);
            if item.unit.is_empty() {
                item.unit = unit.trim().to_string();
            }
        }
        _ => {
            let parts: Vec<String> = [describe(&item.amount, &item.unit), describe(amount, unit)]
                .into_iter()
                .filter(|p| !p.is_empty())
                .collect();
            item.amount = parts.join(", ");
            item.unit = String::new();
        }
    }
}

// ============================================================================
// Categorization
// ============================================================================

/// Keyword lists in matching order; the first category with a hit wins
const CATEGORY_KEYWORDS: &[(ShoppingCategory, &[&str])] = &[
    (
        ShoppingCategory::Produce,
        &[
            "appel", "banaan", "tomaat", "tomaten", "sla", "ui", "uien", "wortel", "paprika",
            "komkommer", "spinazie", "broccoli", "courgette", "avocado", "citroen", "limoen",
            "knoflook", "aardappel", "bessen", "fruit", "groente", "meloen", "champignon",
            "bosbes", "aardbei", "gember", "peterselie", "basilicum", "koriander", "apple",
            "banana", "tomato", "lettuce", "onion", "carrot", "cucumber", "spinach", "lemon",
            "lime", "garlic", "potato", "berries", "eggplant", "mushroom", "herbs",
        ],
    ),
    (
        ShoppingCategory::MeatSeafood,
        &[
            "kip", "rund", "varken", "zalm", "tonijn", "gehakt", "filet", "garnalen", "vis",
            "kalkoen", "spek", "chicken", "beef", "pork", "salmon", "tuna", "shrimp", "fish",
            "turkey", "steak", "bacon",
        ],
    ),
    (
        ShoppingCategory::Dairy,
        &[
            "melk", "kaas", "yoghurt", "boter", "room", "feta", "kwark", "ei", "eieren", "milk",
            "cheese", "yogurt", "butter", "cream", "egg", "eggs",
        ],
    ),
    (
        ShoppingCategory::Pantry,
        &[
            "pasta", "rijst", "meel", "suiker", "zout", "peper", "kruiden", "olie", "azijn",
            "quinoa", "havermout", "noten", "amandelen", "honing", "bonen", "linzen",
            "kikkererwten", "hummus", "bouillon", "saus", "flour", "rice", "sugar", "salt",
            "oil", "oats", "honey", "nuts", "beans", "spice", "sauce",
        ],
    ),
    (
        ShoppingCategory::Frozen,
        &["diepvries", "bevroren", "ijs", "frozen", "ice"],
    ),
    (
        ShoppingCategory::Beverages,
        &[
            "water", "sap", "koffie", "thee", "wijn", "bier", "juice", "coffee", "tea", "wine",
            "beer", "drink",
        ],
    ),
];

fn keyword_matches(name: &str, keyword: &str) -> bool {
    // Short keywords such as "ui" only match whole words
    if keyword.chars().count() <= 3 {
        name.split(|c: char| !c.is_alphanumeric())
            .any(|word| word == keyword)
    } else {
        name.contains(keyword)
    }
}

/// Assign exactly one category to an ingredient name
pub fn categorize(name: &str) -> ShoppingCategory {
    let normalized = name.trim().to_lowercase();

    CATEGORY_KEYWORDS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| keyword_matches(&normalized, k)))
        .map(|(category, _)| *category)
        .unwrap_or(ShoppingCategory::Other)
}

// ============================================================================
// List operations
// ============================================================================

/// Category name, then item name, both case-insensitive
fn compare_items(a: &ShoppingListItem, b: &ShoppingListItem) -> Ordering {
    a.category
        .as_str()
        .to_lowercase()
        .cmp(&b.category.as_str().to_lowercase())
        .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
}

pub fn sort_items(items: &mut [ShoppingListItem]) {
    items.sort_by(compare_items);
}

/// Derive the shopping list for every recipe placed in the menu
pub fn generate(menu: &WeekMenu) -> Vec<ShoppingListItem> {
    let mut items: Vec<ShoppingListItem> = Vec::new();
    let mut index_by_name: HashMap<String, usize> = HashMap::new();

    for (_, _, recipe) in menu.recipes() {
        for parsed in extract_ingredients(&recipe.ingredients) {
            let key = parsed.name.to_lowercase();
            match index_by_name.get(&key) {
                Some(&idx) => merge_into(&mut items[idx], &parsed.amount, &parsed.unit),
                None => {
                    index_by_name.insert(key, items.len());
                    items.push(ShoppingListItem {
                        category: categorize(&parsed.name),
                        name: parsed.name,
                        amount: parsed.amount,
                        unit: parsed.unit,
                        checked: false,
                    });
                }
            }
        }
    }

    sort_items(&mut items);
    items
}

/// Add a manual item, merging with an existing entry of the same name or
/// inserting at its sorted position
///
/// Returns the index of the affected item, or `None` for a blank name.
pub fn add_manual_item(
    items: &mut Vec<ShoppingListItem>,
    name: &str,
    amount: &str,
    unit: &str,
) -> Option<usize> {
    let name = name.trim();
    if name.is_empty() {
        return None;
    }

    if let Some(idx) = items.iter().position(|i| i.name.eq_ignore_ascii_case(name)) {
        merge_into(&mut items[idx], amount, unit);
        return Some(idx);
    }

    let item = ShoppingListItem {
        name: name.to_string(),
        amount: amount.trim().to_string(),
        unit: unit.trim().to_string(),
        category: categorize(name),
        checked: false,
    };
    let idx = items.partition_point(|existing| compare_items(existing, &item) == Ordering::Less);
    items.insert(idx, item);
    Some(idx)
}

/// Flip the checked flag; false when the index is out of range
pub fn toggle_item(items: &mut [ShoppingListItem], index: usize) -> bool {
    match items.get_mut(index) {
        Some(item) => {
            item.checked = !item.checked;
            true
        }
        None => false,
    }
}

pub fn remove_item(items: &mut Vec<ShoppingListItem>, index: usize) -> Option<ShoppingListItem> {
    (index < items.len()).then(|| items.remove(index))
}
