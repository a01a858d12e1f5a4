//! Error handling for the Quill API
//!
//! This module provides a unified error type using thiserror, with HTTP
//! status code mapping via Axum's IntoResponse trait and a conversion into
//! GraphQL errors carrying a `code` extension.

use std::sync::Arc;

use async_graphql::ErrorExtensions;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use quill_batch::BatchError;
use serde::Serialize;
use thiserror::Error;

/// API error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error code for client-side handling
    pub code: &'static str,
    /// Human-readable error message
    pub message: String,
}

/// Main API error type
#[derive(Error, Debug, Clone)]
pub enum ApiError {
    // ========== Validation Errors ==========
    /// Request validation failed
    #[error("validation error: {0}")]
    ValidationError(String),

    // ========== Database Errors ==========
    /// Database query failed
    ///
    /// Shared so one failed batch can be reported to every field that waited on it.
    #[error("database error: {0}")]
    Database(Arc<sqlx::Error>),

    /// Schema migration failed
    #[error("migration error: {0}")]
    Migration(Arc<sqlx::migrate::MigrateError>),

    /// Database unreachable
    #[error("database connection unavailable")]
    DatabaseUnavailable,

    // ========== Internal Errors ==========
    /// Internal server error (catch-all for unexpected errors)
    #[error("internal server error: {0}")]
    Internal(String),
}

impl ApiError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::ValidationError(_) => StatusCode::BAD_REQUEST,
            Self::DatabaseUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            Self::Database(_) | Self::Migration(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Get the error code string for client-side handling
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::ValidationError(_) => "VALIDATION_ERROR",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Migration(_) => "MIGRATION_ERROR",
            Self::DatabaseUnavailable => "DATABASE_UNAVAILABLE",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Log the error with appropriate severity based on status code
    pub fn log(&self) {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(
                error = %self,
                code = self.error_code(),
                status = status.as_u16(),
                "Server error occurred"
            );
        } else {
            tracing::debug!(
                error = %self,
                code = self.error_code(),
                status = status.as_u16(),
                "Client error"
            );
        }
    }

    /// Convert into a GraphQL error with a `code` extension
    pub fn into_graphql_error(self) -> async_graphql::Error {
        self.log();
        let code = self.error_code();
        async_graphql::Error::new(self.to_string()).extend_with(|_, e| {
            e.set("code", code);
        })
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        self.log();

        let status = self.status_code();
        let error_response = ErrorResponse {
            code: self.error_code(),
            message: self.to_string(),
        };

        (status, Json(error_response)).into_response()
    }
}

/// Result type alias for API operations
pub type ApiResult<T> = Result<T, ApiError>;

// ========== Conversion Implementations ==========

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed => Self::DatabaseUnavailable,
            err => Self::Database(Arc::new(err)),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for ApiError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        Self::Migration(Arc::new(err))
    }
}

impl From<BatchError<sqlx::Error>> for ApiError {
    fn from(err: BatchError<sqlx::Error>) -> Self {
        match err {
            BatchError::InvalidKey(reason) => Self::ValidationError(reason),
            BatchError::Store(err) => Self::Database(err),
            BatchError::Cancelled => Self::Internal("request cancelled".to_string()),
        }
    }
}
