use actix_web::http::StatusCode;
use actix_web::HttpResponse;
use thiserror::Error;

use crate::domain::errors::{DomainError, SubmissionError};

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("{0}")]
    InvalidAmount(String),

    #[error("{0}")]
    InsufficientTender(String),

    #[error("Cart is empty")]
    EmptyCart,

    #[error("A transaction is already being submitted")]
    SubmissionInFlight,

    #[error("{0}")]
    SubmissionFailed(String),

    #[error("Backend unavailable: {0}")]
    Backend(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Stable discriminator the presentation layer switches on.
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::BadRequest(_) => "bad_request",
            AppError::InvalidAmount(_) => "invalid_amount",
            AppError::InsufficientTender(_) => "insufficient_tender",
            AppError::EmptyCart => "empty_cart",
            AppError::SubmissionInFlight => "submission_in_flight",
            AppError::SubmissionFailed(_) => "submission_failed",
            AppError::Backend(_) => "backend_unavailable",
            AppError::Internal(_) => "internal",
        }
    }
}

impl From<DomainError> for AppError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::InvalidAmount(_) => AppError::InvalidAmount(e.to_string()),
            DomainError::InsufficientTender { total, tendered } => AppError::InsufficientTender(
                format!("Uang kurang: total {}, dibayar {}", total, tendered),
            ),
            DomainError::EmptyCart => AppError::EmptyCart,
            DomainError::SubmissionInFlight => AppError::SubmissionInFlight,
            DomainError::Submission(inner) => AppError::SubmissionFailed(inner.to_string()),
        }
    }
}

/// Catalog and history failures: the backend, not a submission.
impl From<SubmissionError> for AppError {
    fn from(e: SubmissionError) -> Self {
        AppError::Backend(e.to_string())
    }
}

impl actix_web::ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) | AppError::InvalidAmount(_) => StatusCode::BAD_REQUEST,
            AppError::InsufficientTender(_) | AppError::EmptyCart => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            AppError::SubmissionInFlight => StatusCode::CONFLICT,
            AppError::SubmissionFailed(_) | AppError::Backend(_) => StatusCode::BAD_GATEWAY,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = match self {
            AppError::Internal(_) => "Internal server error".to_string(),
            other => other.to_string(),
        };
        HttpResponse::build(self.status_code()).json(serde_json::json!({
            "error": self.kind(),
            "message": message
        }))
    }
}
