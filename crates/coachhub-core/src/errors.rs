// ABOUTME: Unified application error type with standard error codes
// ABOUTME: Maps error codes to HTTP statuses and renders JSON error bodies for axum
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Coachhub Contributors

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Standard error codes surfaced to API clients
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Request payload or parameter failed validation
    InvalidInput,
    /// A required field was absent
    MissingRequiredField,
    /// A value could not be parsed
    InvalidFormat,
    /// The addressed resource does not exist
    ResourceNotFound,
    /// A resource with the same unique key already exists
    ResourceAlreadyExists,
    /// Database query or connection failure
    DatabaseError,
    /// Invalid server configuration
    ConfigError,
    /// Unexpected internal failure
    InternalError,
}

impl ErrorCode {
    /// HTTP status code associated with this error code
    #[must_use]
    pub const fn http_status(self) -> u16 {
        match self {
            Self::InvalidInput | Self::MissingRequiredField | Self::InvalidFormat => 400,
            Self::ResourceNotFound => 404,
            Self::ResourceAlreadyExists => 409,
            Self::DatabaseError | Self::ConfigError | Self::InternalError => 500,
        }
    }

    /// Short description used when no message is supplied
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::InvalidInput => "Invalid input",
            Self::MissingRequiredField => "Missing required field",
            Self::InvalidFormat => "Invalid format",
            Self::ResourceNotFound => "Resource not found",
            Self::ResourceAlreadyExists => "Resource already exists",
            Self::DatabaseError => "Database error",
            Self::ConfigError => "Configuration error",
            Self::InternalError => "Internal server error",
        }
    }
}

/// Application error carrying an error code and a human readable message
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct AppError {
    /// Machine readable error code
    pub code: ErrorCode,
    /// Human readable message
    pub message: String,
}

/// Result alias used across the application
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// Create an error with an explicit code
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Validation failure on caller supplied input
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidInput, message)
    }

    /// Missing required field
    pub fn missing_field(field: &str) -> Self {
        Self::new(
            ErrorCode::MissingRequiredField,
            format!("{field} is required"),
        )
    }

    /// Resource lookup returned nothing
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::ResourceNotFound,
            format!("{} not found", resource.into()),
        )
    }

    /// Unique key collision
    pub fn already_exists(resource: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::ResourceAlreadyExists,
            format!("{} already exists", resource.into()),
        )
    }

    /// Database failure
    pub fn database(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::DatabaseError, message)
    }

    /// Invalid configuration
    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigError, message)
    }

    /// Unexpected internal failure
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }

    /// HTTP status code for this error
    #[must_use]
    pub const fn http_status(&self) -> u16 {
        self.code.http_status()
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::new(
            ErrorCode::InvalidFormat,
            format!("JSON serialization failed: {err}"),
        )
    }
}

/// JSON body returned for failed requests
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error details
    pub error: ErrorBody,
}

/// Error details inside [`ErrorResponse`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Machine readable error code
    pub code: ErrorCode,
    /// Human readable message
    pub message: String,
}

impl From<&AppError> for ErrorResponse {
    fn from(err: &AppError) -> Self {
        let message = if err.message.is_empty() {
            err.code.description().to_owned()
        } else {
            err.message.clone()
        };
        Self {
            error: ErrorBody {
                code: err.code,
                message,
            },
        }
    }
}

#[cfg(feature = "http-response")]
impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = axum::http::StatusCode::from_u16(self.http_status())
            .unwrap_or(axum::http::StatusCode::INTERNAL_SERVER_ERROR);
        (status, axum::Json(ErrorResponse::from(&self))).into_response()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes_map_to_http_status() {
        assert_eq!(AppError::invalid_input("bad").http_status(), 400);
        assert_eq!(AppError::not_found("Coach abc").http_status(), 404);
        assert_eq!(AppError::already_exists("Coach").http_status(), 409);
        assert_eq!(AppError::database("boom").http_status(), 500);
    }

    #[test]
    fn test_not_found_message() {
        let err = AppError::not_found("Coaching request 42");
        assert_eq!(err.to_string(), "Coaching request 42 not found");
        assert_eq!(err.code, ErrorCode::ResourceNotFound);
    }

    #[test]
    fn test_error_response_serialization() {
        let err = AppError::missing_field("coach_id");
        let body = serde_json::to_value(ErrorResponse::from(&err)).unwrap();
        assert_eq!(body["error"]["code"], "MISSING_REQUIRED_FIELD");
        assert_eq!(body["error"]["message"], "coach_id is required");
    }
}
