use std::fmt;

#[cfg(feature = "api")]
use actix_web::{http::StatusCode, HttpResponse, ResponseError};

#[cfg(feature = "api")]
use crate::models::ErrorResponse;

/// Application error types
#[derive(Debug)]
pub enum AppError {
    /// Domain rule violations, all collected before reporting
    Validation(Vec<String>),
    /// A categorical value outside its fitted vocabulary
    UnknownCategory { feature: String, value: String },
    /// The model failed to score the transformed vector
    ModelInvocation(String),
    /// Internal server error
    Internal(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Validation(errors) => {
                write!(f, "Validation failed: {}", errors.join("; "))
            }
            AppError::UnknownCategory { feature, value } => {
                write!(f, "Unknown category \"{}\" for {}", value, feature)
            }
            AppError::ModelInvocation(msg) => write!(f, "Model invocation failed: {}", msg),
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

#[cfg(feature = "api")]
impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::UnknownCategory { .. } => StatusCode::BAD_REQUEST,
            AppError::ModelInvocation(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        let (error_code, message, errors) = match self {
            AppError::Validation(list) => (
                "validation_error",
                "One or more inputs failed validation".to_string(),
                list.clone(),
            ),
            AppError::UnknownCategory { .. } => {
                ("unknown_category", self.to_string(), vec![self.to_string()])
            }
            AppError::ModelInvocation(msg) => {
                ("model_invocation_error", msg.clone(), Vec::new())
            }
            AppError::Internal(msg) => ("internal_error", msg.clone(), Vec::new()),
        };

        HttpResponse::build(self.status_code()).json(ErrorResponse {
            error: error_code.to_string(),
            message,
            errors,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_display_joins_all_errors() {
        let err = AppError::Validation(vec![
            "YearBuilt must be between 1800 and 2025.".to_string(),
            "GarageArea must be greater than 0.".to_string(),
        ]);
        let text = err.to_string();
        assert!(text.contains("YearBuilt"));
        assert!(text.contains("GarageArea"));
    }

    #[test]
    fn test_unknown_category_display() {
        let err = AppError::UnknownCategory {
            feature: "KitchenQual".to_string(),
            value: "InvalidGrade".to_string(),
        };
        let text = err.to_string();
        assert!(text.contains("KitchenQual"));
        assert!(text.contains("InvalidGrade"));
    }

    #[test]
    fn test_model_invocation_display() {
        let err = AppError::ModelInvocation("wrong arity".to_string());
        assert!(err.to_string().contains("wrong arity"));
    }

    #[cfg(feature = "api")]
    #[test]
    fn test_error_status_codes() {
        assert_eq!(
            AppError::Validation(Vec::new()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::UnknownCategory {
                feature: String::new(),
                value: String::new(),
            }
            .status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::ModelInvocation(String::new()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            AppError::Internal(String::new()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
