use crate::models::ErrorResponse;
use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use thiserror::Error;

/// Errors raised while turning a survey into a preference profile
#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("survey payload must be a JSON object")]
    NotAnObject,

    #[error("malformed answer for question {field}: {reason}")]
    MalformedSurvey { field: String, reason: String },

    #[error("invalid rank {rank} for category '{category}': ranks start at 1")]
    InvalidRank { category: String, rank: i64 },

    #[error("internal processing error: {0}")]
    Internal(String),
}

impl ProfileError {
    pub fn malformed(field: &str, reason: impl Into<String>) -> Self {
        ProfileError::MalformedSurvey {
            field: field.to_string(),
            reason: reason.into(),
        }
    }

    /// Client-caused errors map to 400, everything else to 500
    pub fn is_client_error(&self) -> bool {
        !matches!(self, ProfileError::Internal(_))
    }
}

impl ResponseError for ProfileError {
    fn status_code(&self) -> StatusCode {
        if self.is_client_error() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            ProfileError::NotAnObject => ErrorResponse::new("Invalid JSON input"),
            ProfileError::Internal(cause) => {
                tracing::error!(cause = %cause, "Failed to process survey data");
                ErrorResponse::new("Failed to process survey data.")
            }
            other => ErrorResponse::new(other.to_string()),
        };
        HttpResponse::build(self.status_code()).json(body)
    }
}
