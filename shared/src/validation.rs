//! Input validation functions
//!
//! Range checks applied to biometric profiles and planner input before they
//! reach the calculator.

use crate::calculator::BiometricProfile;

/// Validate weight value (in kg)
pub fn validate_weight(weight_kg: f64) -> Result<(), String> {
    if weight_kg.is_nan() || weight_kg.is_infinite() {
        return Err("Weight must be a valid number".to_string());
    }
    if weight_kg < 20.0 {
        return Err("Weight must be at least 20 kg".to_string());
    }
    if weight_kg > 500.0 {
        return Err("Weight must be at most 500 kg".to_string());
    }
    Ok(())
}

/// Validate height value (in cm)
/// Valid range: 50-300 cm
pub fn validate_height_cm(height_cm: f64) -> Result<(), String> {
    if height_cm.is_nan() || height_cm.is_infinite() {
        return Err("Height must be a valid number".to_string());
    }
    if height_cm < 50.0 {
        return Err("Height must be at least 50 cm".to_string());
    }
    if height_cm > 300.0 {
        return Err("Height must be at most 300 cm".to_string());
    }
    Ok(())
}

/// Validate age in years
pub fn validate_age(age_years: u32) -> Result<(), String> {
    if age_years < 1 {
        return Err("Age must be at least 1 year".to_string());
    }
    if age_years > 150 {
        return Err("Age cannot exceed 150 years".to_string());
    }
    Ok(())
}

/// Validate calorie value
pub fn validate_calories(calories: f64) -> Result<(), String> {
    if calories.is_nan() || calories.is_infinite() {
        return Err("Calories must be a valid number".to_string());
    }
    if calories < 0.0 {
        return Err("Calories cannot be negative".to_string());
    }
    if calories > 50000.0 {
        return Err("Calorie value unreasonably high".to_string());
    }
    Ok(())
}

/// Validate percentage value (0-100)
pub fn validate_percentage(value: u32) -> Result<(), String> {
    if value > 100 {
        return Err("Percentage must be between 0 and 100".to_string());
    }
    Ok(())
}

// ============================================================================
// Profile Validation
// ============================================================================

/// Range-check the fields that are present on a profile
///
/// Missing fields are left to the calculator, which reports them by name.
pub fn validate_profile(profile: &BiometricProfile) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if let Some(weight) = profile.weight_kg {
        if let Err(msg) = validate_weight(weight) {
            errors.push(ValidationError::new("weight_kg", &msg));
        }
    }
    if let Some(height) = profile.height_cm {
        if let Err(msg) = validate_height_cm(height) {
            errors.push(ValidationError::new("height_cm", &msg));
        }
    }
    if let Some(age) = profile.age_years {
        if let Err(msg) = validate_age(age) {
            errors.push(ValidationError::new("age_years", &msg));
        }
    }
    if let Some(custom) = profile.custom_macros {
        for value in [custom.protein, custom.carbs, custom.fat] {
            if let Err(msg) = validate_percentage(value) {
                errors.push(ValidationError::new("custom_macros", &msg));
                break;
            }
        }
    }

    errors
}

// ============================================================================
// User-Friendly Field Labels
// ============================================================================

/// Map technical field names to user-friendly display labels
pub fn get_field_display_label(field_name: &str) -> &str {
    match field_name {
        "weight" | "weight_kg" => "Weight",
        "height" | "height_cm" => "Height",
        "age" | "age_years" => "Age",
        "sex" => "Biological Sex",
        "activity_level" => "Activity Level",
        "goal" => "Goal",
        "macro_preset" => "Macro Preset",
        "custom_macros" => "Custom Macros",
        "calorie_goal" => "Daily Calorie Goal",
        _ => field_name,
    }
}

/// Validation error with field context
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
    pub display_label: String,
}

impl ValidationError {
    pub fn new(field: &str, message: &str) -> Self {
        Self {
            field: field.to_string(),
            message: message.to_string(),
            display_label: get_field_display_label(field).to_string(),
        }
    }

    /// Format as user-friendly error message
    pub fn user_message(&self) -> String {
        format!("{}: {}", self.display_label, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculator::MacroDistribution;
    use proptest::prelude::*;

    #[test]
    fn test_validate_weight() {
        assert!(validate_weight(70.0).is_ok());
        assert!(validate_weight(20.0).is_ok());
        assert!(validate_weight(500.0).is_ok());
        assert!(validate_weight(10.0).is_err());
        assert!(validate_weight(600.0).is_err());
        assert!(validate_weight(f64::NAN).is_err());
    }

    #[test]
    fn test_validate_calories() {
        assert!(validate_calories(0.0).is_ok());
        assert!(validate_calories(2000.0).is_ok());
        assert!(validate_calories(-1.0).is_err());
        assert!(validate_calories(f64::INFINITY).is_err());
    }

    #[test]
    fn test_validate_profile_collects_errors() {
        let profile = BiometricProfile {
            weight_kg: Some(5.0),
            height_cm: Some(400.0),
            age_years: Some(30),
            custom_macros: Some(MacroDistribution {
                protein: 120,
                carbs: 0,
                fat: 0,
            }),
            ..Default::default()
        };
        let errors = validate_profile(&profile);
        let fields: Vec<_> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["weight_kg", "height_cm", "custom_macros"]);
    }

    #[test]
    fn test_validate_profile_ignores_missing() {
        assert!(validate_profile(&BiometricProfile::default()).is_empty());
    }

    #[test]
    fn test_validation_error() {
        let err = ValidationError::new("height_cm", "must be at least 50 cm");
        assert_eq!(err.display_label, "Height");
        assert_eq!(err.user_message(), "Height: must be at least 50 cm");
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn prop_valid_weight_range(weight in 20.0f64..=500.0) {
            prop_assert!(validate_weight(weight).is_ok());
        }

        #[test]
        fn prop_invalid_height_below_min(height in 0.0f64..50.0) {
            prop_assert!(validate_height_cm(height).is_err(),
                "Height {} should be invalid (below minimum)", height);
        }

        #[test]
        fn prop_valid_age_range(age in 1u32..=150) {
            prop_assert!(validate_age(age).is_ok());
        }
    }
}
