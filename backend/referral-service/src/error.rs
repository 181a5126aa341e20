use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use serde::Serialize;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Signup rejected: {0}")]
    Blacklisted(String),

    #[error("Reserved account pool exhausted")]
    PoolExhausted,

    #[error("Username already taken: {0}")]
    DuplicateUsername(String),

    #[error("Referral code space exhausted after bounded retries")]
    CodeAllocationExhausted,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Blacklisted(_) => StatusCode::FORBIDDEN,
            AppError::PoolExhausted => StatusCode::CONFLICT,
            AppError::DuplicateUsername(_) => StatusCode::CONFLICT,
            AppError::CodeAllocationExhausted => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status_code = self.status_code();
        let error_type = match self {
            AppError::Database(_) => "DATABASE_ERROR",
            AppError::Blacklisted(_) => "BLACKLISTED",
            AppError::PoolExhausted => "POOL_EXHAUSTED",
            AppError::DuplicateUsername(_) => "DUPLICATE_USERNAME",
            AppError::CodeAllocationExhausted => "CODE_ALLOCATION_EXHAUSTED",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        };

        // Storage error text stays out of responses outside debug builds.
        let message = match self {
            AppError::Database(_) => "Database error".to_string(),
            AppError::Internal(_) => "Internal server error".to_string(),
            other => other.to_string(),
        };
        let details = if cfg!(debug_assertions) {
            match self {
                AppError::Database(e) => Some(e.to_string()),
                AppError::Internal(msg) => Some(msg.clone()),
                _ => None,
            }
        } else {
            None
        };

        HttpResponse::build(status_code).json(ErrorResponse {
            error: error_type.to_string(),
            message,
            details,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_match_taxonomy() {
        assert_eq!(
            AppError::Blacklisted("x".into()).status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(AppError::PoolExhausted.status_code(), StatusCode::CONFLICT);
        assert_eq!(
            AppError::DuplicateUsername("bob".into()).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::CodeAllocationExhausted.status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            AppError::NotFound("user".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::Validation("bad".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
    }
}
