//! Calorie and macro calculations
//!
//! Converts a biometric profile into BMR, TDEE, a daily calorie goal and
//! macro gram targets, and splits a daily budget into per-meal windows.
//!
//! # Design Principles
//!
//! 1. **Pure Functions**: no I/O, fully deterministic
//! 2. **Fail Loudly**: malformed profiles are errors, never silently defaulted
//! 3. **Safety Floor**: the calorie goal never drops below the sex-specific minimum

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::convert::Infallible;
use std::str::FromStr;

use crate::errors::NutritionError;
use crate::models::{Day, MealType};

// ============================================================================
// Profile Types
// ============================================================================

/// Biological sex for physiological calculations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BiologicalSex {
    Male,
    Female,
}

impl FromStr for BiologicalSex {
    type Err = NutritionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "male" => Ok(BiologicalSex::Male),
            "female" => Ok(BiologicalSex::Female),
            _ => Err(NutritionError::InvalidInput(
                "Sex must be either \"male\" or \"female\"".to_string(),
            )),
        }
    }
}

/// Activity level for TDEE calculation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ActivityLevel {
    /// Little or no exercise
    Sedentary,
    /// Light exercise 1-3 days/week
    Light,
    /// Moderate exercise 3-5 days/week
    Moderate,
    /// Hard exercise 6-7 days/week
    Active,
    /// Very hard exercise, physical job
    VeryActive,
}

impl ActivityLevel {
    /// Get the activity multiplier for TDEE calculation
    pub fn multiplier(&self) -> f64 {
        match self {
            ActivityLevel::Sedentary => 1.2,
            ActivityLevel::Light => 1.375,
            ActivityLevel::Moderate => 1.55,
            ActivityLevel::Active => 1.725,
            ActivityLevel::VeryActive => 1.9,
        }
    }

    /// Get a human-readable description
    pub fn description(&self) -> &'static str {
        match self {
            ActivityLevel::Sedentary => "Little or no exercise",
            ActivityLevel::Light => "Light exercise 1-3 days/week",
            ActivityLevel::Moderate => "Moderate exercise 3-5 days/week",
            ActivityLevel::Active => "Hard exercise 6-7 days/week",
            ActivityLevel::VeryActive => "Very hard exercise or physical job",
        }
    }
}

impl FromStr for ActivityLevel {
    type Err = NutritionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_key(s).as_str() {
            "sedentary" => Ok(ActivityLevel::Sedentary),
            "light" => Ok(ActivityLevel::Light),
            "moderate" => Ok(ActivityLevel::Moderate),
            "active" => Ok(ActivityLevel::Active),
            "veryactive" => Ok(ActivityLevel::VeryActive),
            _ => Err(NutritionError::InvalidInput("Invalid activity level".to_string())),
        }
    }
}

/// Weight goal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FitnessGoal {
    Maintain,
    Lose,
    Gain,
    #[serde(alias = "lose-fast")]
    LoseFast,
    #[serde(alias = "gain-fast")]
    GainFast,
}

impl FitnessGoal {
    /// Daily calorie adjustment relative to TDEE
    pub fn adjustment(&self) -> f64 {
        match self {
            FitnessGoal::Maintain => 0.0,
            FitnessGoal::Lose => -500.0,
            FitnessGoal::Gain => 500.0,
            FitnessGoal::LoseFast => -750.0,
            FitnessGoal::GainFast => 750.0,
        }
    }

    pub fn weekly_description(&self) -> &'static str {
        match self {
            FitnessGoal::Maintain => "Maintain current weight",
            FitnessGoal::Lose => "Lose 0.5 kg (1 lb) per week",
            FitnessGoal::Gain => "Gain 0.5 kg (1 lb) per week",
            FitnessGoal::LoseFast => "Lose 0.75 kg (1.5 lbs) per week",
            FitnessGoal::GainFast => "Gain 0.75 kg (1.5 lbs) per week",
        }
    }

    fn is_loss(&self) -> bool {
        matches!(self, FitnessGoal::Lose | FitnessGoal::LoseFast)
    }

    fn is_gain(&self) -> bool {
        matches!(self, FitnessGoal::Gain | FitnessGoal::GainFast)
    }
}

impl FromStr for FitnessGoal {
    type Err = NutritionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_key(s).as_str() {
            "maintain" => Ok(FitnessGoal::Maintain),
            "lose" => Ok(FitnessGoal::Lose),
            "gain" => Ok(FitnessGoal::Gain),
            "losefast" => Ok(FitnessGoal::LoseFast),
            "gainfast" => Ok(FitnessGoal::GainFast),
            _ => Err(NutritionError::InvalidInput("Invalid fitness goal".to_string())),
        }
    }
}

/// Macro split as whole percentages of the calorie goal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MacroDistribution {
    pub protein: u32,
    pub carbs: u32,
    pub fat: u32,
}

impl MacroDistribution {
    pub fn validate(&self) -> Result<(), NutritionError> {
        if self.protein + self.carbs + self.fat != 100 {
            return Err(NutritionError::InvalidDistribution {
                protein: self.protein,
                carbs: self.carbs,
                fat: self.fat,
            });
        }
        Ok(())
    }
}

/// Named macro distributions
///
/// Unknown names read as [`MacroPreset::Balanced`], both through `FromStr`
/// and when deserializing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum MacroPreset {
    #[default]
    Balanced,
    HighProtein,
    LowCarb,
    LowFat,
    Keto,
    Athlete,
}

impl MacroPreset {
    pub fn distribution(&self) -> MacroDistribution {
        let (protein, carbs, fat) = match self {
            MacroPreset::Balanced => (25, 45, 30),
            MacroPreset::HighProtein => (35, 35, 30),
            MacroPreset::LowCarb => (30, 20, 50),
            MacroPreset::LowFat => (25, 60, 15),
            MacroPreset::Keto => (25, 5, 70),
            MacroPreset::Athlete => (20, 55, 25),
        };
        MacroDistribution { protein, carbs, fat }
    }
}

impl FromStr for MacroPreset {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match normalize_key(s).as_str() {
            "highprotein" => MacroPreset::HighProtein,
            "lowcarb" => MacroPreset::LowCarb,
            "lowfat" => MacroPreset::LowFat,
            "keto" => MacroPreset::Keto,
            "athlete" => MacroPreset::Athlete,
            _ => MacroPreset::Balanced,
        })
    }
}

impl<'de> Deserialize<'de> for MacroPreset {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(name.parse().unwrap_or_default())
    }
}

/// Lowercase and strip separators so `veryActive`, `very_active` and
/// `lose-fast` all compare equal to their canonical keys
fn normalize_key(s: &str) -> String {
    s.trim()
        .chars()
        .filter(|c| !matches!(c, '-' | '_' | ' '))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Biometric profile as entered by the user
///
/// Fields are optional because profiles are loaded from storage and forms;
/// the calculations report which ones are missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BiometricProfile {
    /// Weight in kilograms
    pub weight_kg: Option<f64>,
    /// Height in centimeters
    pub height_cm: Option<f64>,
    /// Age in years
    pub age_years: Option<u32>,
    pub sex: Option<BiologicalSex>,
    pub activity_level: Option<ActivityLevel>,
    pub goal: Option<FitnessGoal>,
    pub macro_preset: Option<MacroPreset>,
    /// Overrides the preset when present
    pub custom_macros: Option<MacroDistribution>,
}

impl BiometricProfile {
    pub fn macro_distribution(&self) -> MacroDistribution {
        self.custom_macros
            .unwrap_or_else(|| self.macro_preset.unwrap_or_default().distribution())
    }

    fn sex(&self) -> Result<BiologicalSex, NutritionError> {
        self.sex
            .ok_or_else(|| NutritionError::InvalidInput("Missing required field: sex".to_string()))
    }
}

// ============================================================================
// BMR, TDEE and calorie goal
// ============================================================================

/// Minimum daily calories for men
pub const MIN_CALORIES_MALE: f64 = 1500.0;
/// Minimum daily calories for women
pub const MIN_CALORIES_FEMALE: f64 = 1200.0;

/// Energy density of protein and carbohydrates (kcal/g)
const KCAL_PER_GRAM_PROTEIN_CARBS: f64 = 4.0;
/// Energy density of fat (kcal/g)
const KCAL_PER_GRAM_FAT: f64 = 9.0;

fn positive(value: Option<f64>, field: &str) -> Result<f64, NutritionError> {
    match value {
        Some(v) if v.is_finite() && v > 0.0 => Ok(v),
        Some(_) => Err(NutritionError::InvalidInput(format!(
            "{field} must be a positive number"
        ))),
        None => Err(NutritionError::InvalidInput(format!(
            "Missing required field: {field}"
        ))),
    }
}

/// Basal Metabolic Rate using the Mifflin-St Jeor equation, rounded to whole kcal
///
/// Men: BMR = 10 × weight(kg) + 6.25 × height(cm) - 5 × age(y) + 5
/// Women: BMR = 10 × weight(kg) + 6.25 × height(cm) - 5 × age(y) - 161
pub fn compute_bmr(profile: &BiometricProfile) -> Result<f64, NutritionError> {
    let weight = positive(profile.weight_kg, "weight")?;
    let height = positive(profile.height_cm, "height")?;
    let age = match profile.age_years {
        Some(age) if age > 0 => f64::from(age),
        _ => {
            return Err(NutritionError::InvalidInput(
                "Missing required field: age".to_string(),
            ))
        }
    };

    let base = 10.0 * weight + 6.25 * height - 5.0 * age;
    let bmr = match profile.sex()? {
        BiologicalSex::Male => base + 5.0,
        BiologicalSex::Female => base - 161.0,
    };
    Ok(bmr.round())
}

/// Total Daily Energy Expenditure: BMR × activity multiplier, rounded
pub fn compute_tdee(profile: &BiometricProfile) -> Result<f64, NutritionError> {
    let activity = profile
        .activity_level
        .ok_or_else(|| NutritionError::InvalidInput("Invalid activity level".to_string()))?;
    let bmr = compute_bmr(profile)?;
    Ok((bmr * activity.multiplier()).round())
}

/// Sex-specific safety minimum for the daily calorie goal
pub fn minimum_calories(sex: BiologicalSex) -> f64 {
    match sex {
        BiologicalSex::Male => MIN_CALORIES_MALE,
        BiologicalSex::Female => MIN_CALORIES_FEMALE,
    }
}

/// Daily calorie goal: TDEE plus the goal adjustment, never below the floor
pub fn compute_calorie_goal(profile: &BiometricProfile) -> Result<f64, NutritionError> {
    let goal = profile
        .goal
        .ok_or_else(|| NutritionError::InvalidInput("Invalid fitness goal".to_string()))?;
    let tdee = compute_tdee(profile)?;
    let calorie_goal = (tdee + goal.adjustment()).round();
    Ok(calorie_goal.max(minimum_calories(profile.sex()?)))
}

/// Per-macro calorie shares
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MacroCalories {
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    pub total: f64,
}

/// Macro targets in grams plus their calorie shares
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MacroTargets {
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    pub calories: MacroCalories,
}

/// Split a calorie goal into macro gram targets
///
/// Protein and carbohydrates count 4 kcal/g, fat 9 kcal/g; grams are rounded
/// to whole numbers.
pub fn compute_macro_targets(
    calorie_goal: f64,
    distribution: &MacroDistribution,
) -> Result<MacroTargets, NutritionError> {
    distribution.validate()?;

    let protein_calories = calorie_goal * f64::from(distribution.protein) / 100.0;
    let carb_calories = calorie_goal * f64::from(distribution.carbs) / 100.0;
    let fat_calories = calorie_goal * f64::from(distribution.fat) / 100.0;

    Ok(MacroTargets {
        protein: (protein_calories / KCAL_PER_GRAM_PROTEIN_CARBS).round(),
        carbs: (carb_calories / KCAL_PER_GRAM_PROTEIN_CARBS).round(),
        fat: (fat_calories / KCAL_PER_GRAM_FAT).round(),
        calories: MacroCalories {
            protein: protein_calories.round(),
            carbs: carb_calories.round(),
            fat: fat_calories.round(),
            total: calorie_goal,
        },
    })
}

// ============================================================================
// Nutrition plan
// ============================================================================

/// Immutable snapshot derived from a profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NutritionPlan {
    pub bmr: f64,
    pub tdee: f64,
    pub calorie_goal: f64,
    pub macro_targets: MacroTargets,
    pub macro_distribution: MacroDistribution,
    pub weekly_goal_description: String,
    pub recommendations: Vec<String>,
}

/// Compute the complete nutrition plan for a profile
pub fn compute_nutrition_plan(profile: &BiometricProfile) -> Result<NutritionPlan, NutritionError> {
    let calorie_goal = compute_calorie_goal(profile)?;
    let bmr = compute_bmr(profile)?;
    let tdee = compute_tdee(profile)?;

    let macro_distribution = profile.macro_distribution();
    let macro_targets = compute_macro_targets(calorie_goal, &macro_distribution)?;

    let weekly_goal_description = profile
        .goal
        .map(|g| g.weekly_description())
        .unwrap_or(FitnessGoal::Maintain.weekly_description())
        .to_string();

    Ok(NutritionPlan {
        bmr,
        tdee,
        calorie_goal,
        macro_targets,
        macro_distribution,
        weekly_goal_description,
        recommendations: recommendations(profile, calorie_goal),
    })
}

/// Rule-based advice for a profile and its calorie goal
pub fn recommendations(profile: &BiometricProfile, calorie_goal: f64) -> Vec<String> {
    let mut advice: Vec<&str> = Vec::new();

    match profile.goal {
        Some(goal) if goal.is_loss() => {
            advice.push("Focus on lean proteins and vegetables to feel fuller with fewer calories");
            advice.push("Consider strength training to preserve muscle mass during weight loss");
            advice.push("Stay hydrated - drink at least 8 glasses of water daily");
        }
        Some(goal) if goal.is_gain() => {
            advice.push("Include healthy fats like nuts, avocados, and olive oil for calorie-dense nutrition");
            advice.push("Eat frequently - aim for 5-6 smaller meals throughout the day");
            advice.push("Focus on strength training to build lean muscle mass");
        }
        _ => {}
    }

    match profile.activity_level {
        Some(ActivityLevel::Sedentary) => {
            advice.push("Consider adding light exercise like walking to boost metabolism");
            advice.push("Take regular breaks from sitting to improve overall health");
        }
        Some(ActivityLevel::VeryActive) => {
            advice.push("Ensure adequate post-workout nutrition for recovery");
            advice.push("Consider timing carbohydrates around your workouts");
        }
        _ => {}
    }

    if profile.age_years.is_some_and(|age| age >= 50) {
        advice.push("Focus on calcium and vitamin D for bone health");
        advice.push("Include adequate protein to maintain muscle mass");
    }

    if profile.sex == Some(BiologicalSex::Female) {
        advice.push("Ensure adequate iron intake, especially if pre-menopausal");
        advice.push("Consider calcium needs for bone health");
    }

    if calorie_goal < 1500.0 {
        advice.push("Consider a multivitamin to ensure nutrient needs are met");
        advice.push("Focus on nutrient-dense foods to maximize nutrition");
    }

    advice.into_iter().map(String::from).collect()
}

// ============================================================================
// Meal calorie windows
// ============================================================================

/// Calorie window for a single meal
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MealCalorieTarget {
    pub min: f64,
    pub max: f64,
    pub target: f64,
}

/// Share of the daily budget (min, max) per meal type
fn meal_band(meal_type: MealType) -> (f64, f64) {
    match meal_type {
        MealType::Breakfast => (0.20, 0.25),
        MealType::Lunch => (0.25, 0.35),
        MealType::Dinner => (0.30, 0.40),
        MealType::Snack => (0.05, 0.15),
    }
}

/// Calorie window for one meal; the target is the band midpoint
pub fn get_meal_calorie_targets(daily_calories: f64, meal_type: MealType) -> MealCalorieTarget {
    let (min, max) = meal_band(meal_type);
    MealCalorieTarget {
        min: (daily_calories * min).round(),
        max: (daily_calories * max).round(),
        target: (daily_calories * (min + max) / 2.0).round(),
    }
}

/// Windows for every day and meal type of the week
///
/// Every day receives the same windows.
pub fn get_weekly_meal_targets(
    daily_calories: f64,
) -> BTreeMap<Day, BTreeMap<MealType, MealCalorieTarget>> {
    Day::ALL
        .iter()
        .map(|day| {
            let meals = MealType::ALL
                .iter()
                .map(|meal| (*meal, get_meal_calorie_targets(daily_calories, *meal)))
                .collect();
            (*day, meals)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;

    fn profile(sex: BiologicalSex, activity: ActivityLevel, goal: FitnessGoal) -> BiometricProfile {
        BiometricProfile {
            weight_kg: Some(82.0),
            height_cm: Some(183.0),
            age_years: Some(30),
            sex: Some(sex),
            activity_level: Some(activity),
            goal: Some(goal),
            macro_preset: None,
            custom_macros: None,
        }
    }

    // =========================================================================
    // BMR/TDEE Tests
    // =========================================================================

    #[test]
    fn test_bmr_mifflin() {
        // 820 + 1143.75 - 150 + 5 = 1818.75
        let male = profile(BiologicalSex::Male, ActivityLevel::Moderate, FitnessGoal::Maintain);
        assert_eq!(compute_bmr(&male).unwrap(), 1819.0);

        // 820 + 1143.75 - 150 - 161 = 1652.75
        let female = profile(BiologicalSex::Female, ActivityLevel::Moderate, FitnessGoal::Maintain);
        assert_eq!(compute_bmr(&female).unwrap(), 1653.0);
    }

    #[test]
    fn test_bmr_missing_fields() {
        let mut p = profile(BiologicalSex::Male, ActivityLevel::Moderate, FitnessGoal::Maintain);
        p.height_cm = None;
        assert!(matches!(compute_bmr(&p), Err(NutritionError::InvalidInput(_))));

        let mut p = profile(BiologicalSex::Male, ActivityLevel::Moderate, FitnessGoal::Maintain);
        p.sex = None;
        assert!(matches!(compute_bmr(&p), Err(NutritionError::InvalidInput(_))));

        let mut p = profile(BiologicalSex::Male, ActivityLevel::Moderate, FitnessGoal::Maintain);
        p.weight_kg = Some(f64::NAN);
        assert!(compute_bmr(&p).is_err());
    }

    #[test]
    fn test_invalid_sex_string() {
        assert!(matches!(
            "other".parse::<BiologicalSex>(),
            Err(NutritionError::InvalidInput(_))
        ));
        assert_eq!("Female".parse::<BiologicalSex>().unwrap(), BiologicalSex::Female);
    }

    #[rstest]
    #[case(ActivityLevel::Sedentary, 2183.0)]
    #[case(ActivityLevel::Light, 2501.0)]
    #[case(ActivityLevel::Moderate, 2819.0)]
    #[case(ActivityLevel::Active, 3138.0)]
    #[case(ActivityLevel::VeryActive, 3456.0)]
    fn test_tdee_multipliers(#[case] activity: ActivityLevel, #[case] expected: f64) {
        let p = profile(BiologicalSex::Male, activity, FitnessGoal::Maintain);
        assert_eq!(compute_tdee(&p).unwrap(), expected);
    }

    #[test]
    fn test_tdee_requires_activity() {
        let mut p = profile(BiologicalSex::Male, ActivityLevel::Moderate, FitnessGoal::Maintain);
        p.activity_level = None;
        assert!(compute_tdee(&p).is_err());
        assert!("couch".parse::<ActivityLevel>().is_err());
        assert_eq!("veryActive".parse::<ActivityLevel>().unwrap(), ActivityLevel::VeryActive);
    }

    #[rstest]
    #[case(FitnessGoal::Maintain, 2819.0)]
    #[case(FitnessGoal::Lose, 2319.0)]
    #[case(FitnessGoal::Gain, 3319.0)]
    #[case(FitnessGoal::LoseFast, 2069.0)]
    #[case(FitnessGoal::GainFast, 3569.0)]
    fn test_goal_adjustments(#[case] goal: FitnessGoal, #[case] expected: f64) {
        let p = profile(BiologicalSex::Male, ActivityLevel::Moderate, goal);
        assert_eq!(compute_calorie_goal(&p).unwrap(), expected);
    }

    #[test]
    fn test_goal_parsing_accepts_both_spellings() {
        assert_eq!("lose-fast".parse::<FitnessGoal>().unwrap(), FitnessGoal::LoseFast);
        assert_eq!("loseFast".parse::<FitnessGoal>().unwrap(), FitnessGoal::LoseFast);
        let goal: FitnessGoal = serde_json::from_str("\"gain-fast\"").unwrap();
        assert_eq!(goal, FitnessGoal::GainFast);
    }

    #[test]
    fn test_calorie_floor_applied() {
        let p = BiometricProfile {
            weight_kg: Some(45.0),
            height_cm: Some(150.0),
            age_years: Some(70),
            sex: Some(BiologicalSex::Female),
            activity_level: Some(ActivityLevel::Sedentary),
            goal: Some(FitnessGoal::LoseFast),
            ..Default::default()
        };
        assert_eq!(compute_calorie_goal(&p).unwrap(), MIN_CALORIES_FEMALE);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Property: the calorie goal never drops below the sex-specific floor
        #[test]
        fn prop_calorie_goal_respects_floor(
            weight in 30.0f64..200.0,
            height in 120.0f64..220.0,
            age in 15u32..100,
            is_male in any::<bool>(),
            goal_index in 0usize..5
        ) {
            let goals = [
                FitnessGoal::Maintain,
                FitnessGoal::Lose,
                FitnessGoal::Gain,
                FitnessGoal::LoseFast,
                FitnessGoal::GainFast,
            ];
            let sex = if is_male { BiologicalSex::Male } else { BiologicalSex::Female };
            let p = BiometricProfile {
                weight_kg: Some(weight),
                height_cm: Some(height),
                age_years: Some(age),
                sex: Some(sex),
                activity_level: Some(ActivityLevel::Sedentary),
                goal: Some(goals[goal_index]),
                ..Default::default()
            };
            let calorie_goal = compute_calorie_goal(&p).unwrap();
            prop_assert!(calorie_goal >= minimum_calories(sex));
        }

        /// Property: distributions not summing to 100 are rejected
        #[test]
        fn prop_invalid_distribution_rejected(
            protein in 0u32..100,
            carbs in 0u32..100,
            fat in 0u32..100
        ) {
            prop_assume!(protein + carbs + fat != 100);
            let distribution = MacroDistribution { protein, carbs, fat };
            let result = compute_macro_targets(2000.0, &distribution);
            let is_distribution_error = matches!(result, Err(NutritionError::InvalidDistribution { .. }));
            prop_assert!(is_distribution_error);
        }

        /// Property: every meal window is ordered min <= target <= max
        #[test]
        fn prop_meal_windows_ordered(daily in 0.0f64..6000.0) {
            for meal in MealType::ALL {
                let window = get_meal_calorie_targets(daily, meal);
                prop_assert!(window.min <= window.target && window.target <= window.max);
            }
        }
    }

    // =========================================================================
    // Macro Tests
    // =========================================================================

    #[test]
    fn test_balanced_macros() {
        let targets = compute_macro_targets(2784.0, &MacroPreset::Balanced.distribution()).unwrap();
        assert_eq!(targets.protein, 174.0);
        assert_eq!(targets.carbs, 313.0);
        assert_eq!(targets.fat, 93.0);
        assert_eq!(targets.calories.total, 2784.0);
        assert_eq!(targets.calories.protein, 696.0);
    }

    #[rstest]
    #[case("highProtein", MacroPreset::HighProtein)]
    #[case("low_carb", MacroPreset::LowCarb)]
    #[case("paleo", MacroPreset::Balanced)]
    #[case("", MacroPreset::Balanced)]
    fn test_preset_names_fall_back_to_balanced(#[case] name: &str, #[case] expected: MacroPreset) {
        assert_eq!(name.parse::<MacroPreset>().unwrap(), expected);
    }

    #[test]
    fn test_unknown_preset_in_profile_uses_balanced() {
        let profile: BiometricProfile = serde_json::from_str(
            r#"{"weight_kg": 82, "height_cm": 183, "age_years": 30, "sex": "male",
                "activity_level": "moderate", "goal": "maintain", "macro_preset": "paleo"}"#,
        )
        .unwrap();
        assert_eq!(profile.macro_preset, Some(MacroPreset::Balanced));

        let plan = compute_nutrition_plan(&profile).unwrap();
        assert_eq!(plan.macro_distribution, MacroPreset::Balanced.distribution());
    }

    #[test]
    fn test_presets_sum_to_hundred() {
        for preset in [
            MacroPreset::Balanced,
            MacroPreset::HighProtein,
            MacroPreset::LowCarb,
            MacroPreset::LowFat,
            MacroPreset::Keto,
            MacroPreset::Athlete,
        ] {
            assert!(preset.distribution().validate().is_ok(), "{preset:?}");
        }
    }

    #[test]
    fn test_nutrition_plan_end_to_end() {
        let p = profile(BiologicalSex::Male, ActivityLevel::Moderate, FitnessGoal::Maintain);
        let plan = compute_nutrition_plan(&p).unwrap();

        assert_eq!(plan.bmr, 1819.0);
        assert_eq!(plan.tdee, 2819.0);
        assert_eq!(plan.calorie_goal, 2819.0);
        assert_eq!(plan.macro_distribution, MacroPreset::Balanced.distribution());
        assert_eq!(plan.macro_targets.protein, 176.0);
        assert_eq!(plan.weekly_goal_description, "Maintain current weight");
    }

    #[test]
    fn test_custom_macros_override_preset() {
        let mut p = profile(BiologicalSex::Male, ActivityLevel::Moderate, FitnessGoal::Maintain);
        p.macro_preset = Some(MacroPreset::Keto);
        p.custom_macros = Some(MacroDistribution { protein: 40, carbs: 40, fat: 20 });
        let plan = compute_nutrition_plan(&p).unwrap();
        assert_eq!(plan.macro_distribution.protein, 40);

        p.custom_macros = Some(MacroDistribution { protein: 40, carbs: 40, fat: 40 });
        assert!(matches!(
            compute_nutrition_plan(&p),
            Err(NutritionError::InvalidDistribution { .. })
        ));
    }

    #[test]
    fn test_recommendations_rules() {
        let mut p = profile(BiologicalSex::Female, ActivityLevel::Sedentary, FitnessGoal::Lose);
        p.age_years = Some(55);
        let advice = recommendations(&p, 1400.0);

        assert!(advice.iter().any(|a| a.contains("lean proteins")));
        assert!(advice.iter().any(|a| a.contains("light exercise")));
        assert!(advice.iter().any(|a| a.contains("vitamin D")));
        assert!(advice.iter().any(|a| a.contains("iron")));
        assert!(advice.iter().any(|a| a.contains("multivitamin")));

        let maintain = profile(BiologicalSex::Male, ActivityLevel::Moderate, FitnessGoal::Maintain);
        assert!(recommendations(&maintain, 2800.0).is_empty());
    }

    // =========================================================================
    // Meal Window Tests
    // =========================================================================

    #[test]
    fn test_meal_targets() {
        let breakfast = get_meal_calorie_targets(2000.0, MealType::Breakfast);
        assert_eq!(breakfast, MealCalorieTarget { min: 400.0, max: 500.0, target: 450.0 });

        let snack = get_meal_calorie_targets(2000.0, MealType::Snack);
        assert_eq!(snack, MealCalorieTarget { min: 100.0, max: 300.0, target: 200.0 });
    }

    #[test]
    fn test_weekly_targets_grid() {
        let weekly = get_weekly_meal_targets(2000.0);
        assert_eq!(weekly.len(), 7);

        let windows: Vec<_> = weekly.values().flat_map(|meals| meals.values()).collect();
        assert_eq!(windows.len(), 28);
        assert!(windows.iter().all(|w| w.min <= w.target && w.target <= w.max));
        assert_eq!(weekly[&Day::Monday], weekly[&Day::Sunday]);
    }
}
