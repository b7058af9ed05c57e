use axum::{Json, http::StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Rating must be an integer between 1 and 5, got {0}")]
    InvalidRating(String),

    #[error("Review text must be at least {min} characters (got {len})")]
    TextTooShort { len: usize, min: usize },

    #[error("Review text must be at most {max} characters (got {len})")]
    TextTooLong { len: usize, max: usize },

    #[error("Name is required")]
    MissingName,
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("JWT error: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Env error: {0}")]
    EnvError(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Upstream error: {0}")]
    Upstream(String),

    #[error("Internal server error")]
    InternalError,

    #[error("Not found: {0}")]
    NotFound(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub detail: Option<String>,
}

pub type ApiError = (StatusCode, Json<ErrorResponse>);

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::JwtError(_) | AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Upstream(_) => StatusCode::BAD_GATEWAY,
            AppError::Serialization(_)
            | AppError::EnvError(_)
            | AppError::DatabaseError(_)
            | AppError::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn to_response(&self) -> ApiError {
        let body = match self {
            AppError::Validation(e) => ErrorResponse {
                error: "Validation failed".into(),
                detail: Some(e.to_string()),
            },
            AppError::JwtError(_) => ErrorResponse {
                error: "Invalid or expired token".into(),
                detail: None,
            },
            AppError::Unauthorized(msg)
            | AppError::BadRequest(msg)
            | AppError::NotFound(msg)
            | AppError::Serialization(msg)
            | AppError::EnvError(msg)
            | AppError::DatabaseError(msg)
            | AppError::Upstream(msg) => ErrorResponse {
                error: msg.clone(),
                detail: Some(msg.clone()),
            },
            AppError::InternalError => ErrorResponse {
                error: "Unexpected server error".into(),
                detail: None,
            },
        };

        (self.status(), Json(body))
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        AppError::DatabaseError(e.to_string())
    }
}
