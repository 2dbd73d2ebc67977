//! Error types for the scoreboard API.
//!
//! This module defines error handling for the API layer:
//! - `ApiError` struct for structured error responses
//! - `ErrorCode` enum for categorizing errors
//! - `IntoResponse` implementation for Axum HTTP responses
//!
//! Errors returned by route handlers are rendered in the negotiated format
//! (see `render`); the `IntoResponse` impl covers the JSON default path.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// ERROR CODE ENUM
// ============================================================================

/// Error codes for API responses.
///
/// Each error code maps to a specific HTTP status code and represents
/// a category of error that can occur during API operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // ========================================================================
    // Authentication errors (401, 403)
    // ========================================================================
    /// Request lacks valid authentication credentials
    Unauthorized,

    /// Request is authenticated but lacks permission for the resource
    Forbidden,

    // ========================================================================
    // Validation errors (400, 422)
    // ========================================================================
    /// Required field is missing from the request body
    ValidationFailed,

    /// Request contains data the server cannot interpret
    InvalidInput,

    // ========================================================================
    // Not found errors (404)
    // ========================================================================
    /// Requested result does not exist, or the submitted owner is unknown.
    /// Both cases deliberately answer 404 to avoid disclosing which applies.
    ResultNotFound,

    // ========================================================================
    // Server errors (500)
    // ========================================================================
    /// Internal server error
    InternalError,

    /// Store operation failed
    StoreError,
}

impl ErrorCode {
    /// Get the HTTP status code for this error code.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
            ErrorCode::Forbidden => StatusCode::FORBIDDEN,
            ErrorCode::ValidationFailed => StatusCode::UNPROCESSABLE_ENTITY,
            ErrorCode::InvalidInput => StatusCode::BAD_REQUEST,
            ErrorCode::ResultNotFound => StatusCode::NOT_FOUND,
            ErrorCode::InternalError | ErrorCode::StoreError => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Get a default message for this error code.
    pub fn default_message(&self) -> &'static str {
        match self {
            ErrorCode::Unauthorized => "`Unauthorized`: Invalid credentials.",
            ErrorCode::Forbidden => "Access denied",
            ErrorCode::ValidationFailed => "Unprocessable entity: missing required fields",
            ErrorCode::InvalidInput => "Invalid input data",
            ErrorCode::ResultNotFound => "Not found",
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::StoreError => "Store operation failed",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

// ============================================================================
// API ERROR STRUCT
// ============================================================================

/// Structured error response for API operations.
///
/// Returned by every endpoint when an error occurs, in the negotiated
/// representation format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename = "error")]
pub struct ApiError {
    /// Error code categorizing the error
    pub code: ErrorCode,

    /// Human-readable error message
    pub message: String,
}

impl ApiError {
    /// Create a new API error with the given code and message.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Create a new API error with the given code, using the default message.
    pub fn from_code(code: ErrorCode) -> Self {
        Self {
            code,
            message: code.default_message().to_string(),
        }
    }

    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        self.code.status_code()
    }

    // ========================================================================
    // Convenience constructors
    // ========================================================================

    /// Create an Unauthorized error with the generic credentials message.
    ///
    /// The message is identical for missing, malformed, and expired
    /// credentials so the response is not an oracle for token validity.
    pub fn unauthorized() -> Self {
        Self::from_code(ErrorCode::Unauthorized)
    }

    /// Create a Forbidden error.
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Forbidden, message)
    }

    /// Create a ValidationFailed error.
    pub fn validation_failed(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ValidationFailed, message)
    }

    /// Create an InvalidInput error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidInput, message)
    }

    /// Create a not-found error. The body never states whether the target
    /// result or the submitted owner was the missing piece.
    pub fn not_found() -> Self {
        Self::from_code(ErrorCode::ResultNotFound)
    }

    /// Create an InternalError.
    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

// ============================================================================
// CONVERSIONS
// ============================================================================

/// Store failures are not recovered locally; they surface as 500 with a
/// generic body. The full error is logged, never serialized.
impl From<crate::store::StoreError> for ApiError {
    fn from(err: crate::store::StoreError) -> Self {
        tracing::error!("Store error: {:?}", err);
        ApiError::new(ErrorCode::StoreError, "Store operation failed")
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        tracing::error!("JSON serialization error: {:?}", err);
        ApiError::invalid_input(format!("Invalid JSON: {}", err))
    }
}

// ============================================================================
// AXUM INTEGRATION
// ============================================================================

/// Implement IntoResponse for ApiError to enable automatic error handling in
/// Axum (JSON body; format-negotiated rendering happens in `render`).
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(self);
        (status, body).into_response()
    }
}

// ============================================================================
// RESULT TYPE ALIAS
// ============================================================================

/// Result type alias for API operations.
pub type ApiResult<T> = Result<T, ApiError>;
