//! Error types for the meal planning engine

use thiserror::Error;

/// Errors raised by the calorie/macro calculator
///
/// These indicate malformed profile data or configuration and are always
/// propagated to the caller.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NutritionError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Macro percentages must add up to 100 (got protein {protein}, carbs {carbs}, fat {fat})")]
    InvalidDistribution { protein: u32, carbs: u32, fat: u32 },
}

/// Recipe provider failures
///
/// Never surfaced from a recipe search: every variant routes the search to
/// the local dataset instead.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    #[error("Recipe provider credentials are not configured")]
    MissingCredentials,

    #[error("Network error: {0}")]
    Network(String),

    #[error("Recipe provider request timed out")]
    Timeout,

    #[error("Recipe provider returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Failed to parse provider response: {0}")]
    Parse(String),
}

impl ProviderError {
    /// Short label used for logging and metrics
    pub fn reason(&self) -> &'static str {
        match self {
            ProviderError::MissingCredentials => "missing_credentials",
            ProviderError::Network(_) => "network",
            ProviderError::Timeout => "timeout",
            ProviderError::Status { .. } => "status",
            ProviderError::Parse(_) => "parse",
        }
    }
}

/// Key-value storage failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        StorageError::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distribution_error_message() {
        let err = NutritionError::InvalidDistribution {
            protein: 30,
            carbs: 30,
            fat: 30,
        };
        assert!(err.to_string().contains("add up to 100"));
    }

    #[test]
    fn test_provider_reason_labels() {
        assert_eq!(ProviderError::MissingCredentials.reason(), "missing_credentials");
        assert_eq!(ProviderError::Timeout.reason(), "timeout");
        assert_eq!(
            ProviderError::Status {
                status: 500,
                message: String::new()
            }
            .reason(),
            "status"
        );
    }
}
