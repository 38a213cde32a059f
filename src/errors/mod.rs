//! Error handling module for the Volunteer Hub backend.
//!
//! Provides centralized error types with mapping to HTTP status codes and response envelopes.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

/// Error codes as constants to avoid stringly-typed errors.
pub mod codes {
    pub const INVALID_CREDENTIALS: &str = "INVALID_CREDENTIALS";
    pub const INVALID_REGISTRATION_DATA: &str = "INVALID_REGISTRATION_DATA";
    pub const EVENT_NOT_FOUND: &str = "EVENT_NOT_FOUND";
    pub const ALREADY_REGISTERED: &str = "ALREADY_REGISTERED";
    pub const SESSION_SUPERSEDED: &str = "SESSION_SUPERSEDED";
    pub const VALIDATION_ERROR: &str = "VALIDATION_ERROR";
    pub const STORAGE_ERROR: &str = "STORAGE_ERROR";
    pub const INTERNAL_ERROR: &str = "INTERNAL_ERROR";
    pub const BAD_REQUEST: &str = "BAD_REQUEST";
}

/// Application error type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppError {
    /// Login attempted with an empty email or password
    InvalidCredentials,
    /// Registration attempted with an empty name, email or password
    InvalidRegistrationData,
    /// No event with the given id
    EventNotFound(String),
    /// Volunteer already present in the event's registrants
    AlreadyRegistered,
    /// A logout landed while the login/register round trip was in flight
    SessionSuperseded,
    /// Caller-side field validation
    Validation(String),
    /// Key-value storage failure
    Storage(String),
    /// Internal server error
    Internal(String),
    /// Bad request
    BadRequest(String),
}

impl AppError {
    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidCredentials => StatusCode::BAD_REQUEST,
            AppError::InvalidRegistrationData => StatusCode::BAD_REQUEST,
            AppError::EventNotFound(_) => StatusCode::NOT_FOUND,
            AppError::AlreadyRegistered => StatusCode::CONFLICT,
            AppError::SessionSuperseded => StatusCode::CONFLICT,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }

    /// Get the error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::InvalidCredentials => codes::INVALID_CREDENTIALS,
            AppError::InvalidRegistrationData => codes::INVALID_REGISTRATION_DATA,
            AppError::EventNotFound(_) => codes::EVENT_NOT_FOUND,
            AppError::AlreadyRegistered => codes::ALREADY_REGISTERED,
            AppError::SessionSuperseded => codes::SESSION_SUPERSEDED,
            AppError::Validation(_) => codes::VALIDATION_ERROR,
            AppError::Storage(_) => codes::STORAGE_ERROR,
            AppError::Internal(_) => codes::INTERNAL_ERROR,
            AppError::BadRequest(_) => codes::BAD_REQUEST,
        }
    }

    /// Get the human-readable message.
    pub fn message(&self) -> String {
        match self {
            AppError::InvalidCredentials => "Invalid login credentials".to_string(),
            AppError::InvalidRegistrationData => "Invalid registration data".to_string(),
            AppError::EventNotFound(_) => "Event not found".to_string(),
            AppError::AlreadyRegistered => "Already registered for this event".to_string(),
            AppError::SessionSuperseded => {
                "Session changed while the request was in flight".to_string()
            }
            AppError::Validation(msg) => msg.clone(),
            AppError::Storage(msg) => msg.clone(),
            AppError::Internal(msg) => msg.clone(),
            AppError::BadRequest(msg) => msg.clone(),
        }
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error_code(), self.message())
    }
}

impl std::error::Error for AppError {}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        tracing::error!("Storage error: {:?}", err);
        AppError::Storage(format!("Storage error: {}", err))
    }
}

/// Error details in the response envelope.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDetails {
    pub code: String,
    pub message: String,
}

/// Error response envelope.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: ErrorDetails,
}

impl ErrorResponse {
    pub fn new(error: &AppError) -> Self {
        Self {
            success: false,
            error: ErrorDetails {
                code: error.error_code().to_string(),
                message: error.message(),
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        (status, Json(ErrorResponse::new(&self))).into_response()
    }
}
