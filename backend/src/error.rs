//! Application error handling
//!
//! Converts engine and service errors into HTTP responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use meal_planner_shared::validation::ValidationError;
use meal_planner_shared::{ErrorDetail, ErrorResponse, NutritionError};
use thiserror::Error;
use tracing::error;

use crate::store::ReduceError;

/// API error type that can be converted to HTTP responses
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid profile: {} field(s) out of range", .0.len())]
    InvalidProfile(Vec<ValidationError>),

    #[error(transparent)]
    Nutrition(#[from] NutritionError),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

impl From<ReduceError> for ApiError {
    fn from(err: ReduceError) -> Self {
        match err {
            ReduceError::SavedMenuNotFound(_) | ReduceError::ShoppingItemNotFound(_) => {
                ApiError::NotFound(err.to_string())
            }
            ReduceError::EmptyName(_) => ApiError::Validation(err.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::InvalidProfile(errors) = &self {
            let body = Json(ErrorResponse {
                error: ErrorDetail {
                    code: "VALIDATION_ERROR".to_string(),
                    message: errors
                        .first()
                        .map(ValidationError::user_message)
                        .unwrap_or_else(|| self.to_string()),
                    field: errors.first().map(|e| e.field.clone()),
                    details: serde_json::to_value(errors).ok(),
                },
            });
            return (StatusCode::BAD_REQUEST, body).into_response();
        }

        let (status, code, message) = match &self {
            ApiError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            ApiError::InvalidProfile(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", self.to_string()),
            ApiError::Nutrition(err @ NutritionError::InvalidInput(_)) => {
                (StatusCode::BAD_REQUEST, "INVALID_INPUT", err.to_string())
            }
            ApiError::Nutrition(err @ NutritionError::InvalidDistribution { .. }) => {
                (StatusCode::BAD_REQUEST, "INVALID_DISTRIBUTION", err.to_string())
            }
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            ApiError::Internal(err) => {
                error!("Internal error: {:?}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = Json(ErrorResponse {
            error: ErrorDetail {
                code: code.to_string(),
                message,
                field: None,
                details: None,
            },
        });

        (status, body).into_response()
    }
}
