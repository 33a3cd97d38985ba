use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum AppError {
    #[error("Missing input: {0}")]
    MissingInput(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Invalid document: {0}")]
    InvalidDocument(String),

    #[error("No content: {0}")]
    EmptyExtraction(String),

    #[error("Generation failed: {0}")]
    GenerationFailed(String),

    #[error("Empty generation: {0}")]
    EmptyGeneration(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal server error: {0}")]
    InternalError(String),
}

/// Stable, machine-readable tag for each failure kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    MissingInput,
    ValidationError,
    InvalidDocument,
    EmptyExtraction,
    GenerationFailed,
    EmptyGeneration,
    Configuration,
    NotFound,
    InternalError,
}

impl AppError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::MissingInput(_) => ErrorKind::MissingInput,
            AppError::ValidationError(_) => ErrorKind::ValidationError,
            AppError::InvalidDocument(_) => ErrorKind::InvalidDocument,
            AppError::EmptyExtraction(_) => ErrorKind::EmptyExtraction,
            AppError::GenerationFailed(_) => ErrorKind::GenerationFailed,
            AppError::EmptyGeneration(_) => ErrorKind::EmptyGeneration,
            AppError::Configuration(_) => ErrorKind::Configuration,
            AppError::NotFound(_) => ErrorKind::NotFound,
            AppError::InternalError(_) => ErrorKind::InternalError,
        }
    }

    pub fn payload(&self) -> ErrorPayload {
        ErrorPayload {
            kind: self.kind(),
            message: self.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorPayload {
    pub kind: ErrorKind,
    pub message: String,
}

/// Failure body: `{"status": "failure", "error": {...}}`.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub status: &'static str,
    pub error: ErrorPayload,
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::MissingInput(_) => StatusCode::BAD_REQUEST,
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::InvalidDocument(_) => StatusCode::BAD_REQUEST,
            AppError::EmptyExtraction(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::GenerationFailed(_) => StatusCode::BAD_GATEWAY,
            AppError::EmptyGeneration(_) => StatusCode::BAD_GATEWAY,
            AppError::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorResponse {
            status: "failure",
            error: self.payload(),
        })
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::ValidationError(err.to_string())
    }
}
impl From<async_openai::error::OpenAIError> for AppError {
    fn from(err: async_openai::error::OpenAIError) -> Self {
        AppError::GenerationFailed(err.to_string())
    }
}
impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::InternalError(format!("HTTP client error: {}", err))
    }
}
impl From<tokio::task::JoinError> for AppError {
    fn from(err: tokio::task::JoinError) -> Self {
        AppError::InternalError(format!("Background task failed: {}", err))
    }
}

pub type AppResult<T> = Result<T, AppError>;
