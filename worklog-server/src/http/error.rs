//! HTTP error type with IntoResponse
//!
//! Errors render as an HTML error page with the matching status code.
//! Internal details are logged, never shown.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use super::views;
use crate::crypto::{CipherError, PasswordError};
use crate::db::DbError;
use crate::journal::JournalError;
use crate::models::ValidationError;
use crate::summarizer::SummarizerError;

/// Error type with automatic HTTP status mapping
#[derive(Debug)]
pub enum AppError {
    /// Validation failed (400)
    Validation(ValidationError),

    /// Resource not found (404)
    NotFound { resource: &'static str, id: String },

    /// Action not permitted (403)
    Forbidden { reason: String },

    /// Summaries are not configured (503)
    SummariesDisabled,

    /// Summarizer call failed (502, logged)
    Upstream(SummarizerError),

    /// Database error (500, logged)
    Database(DbError),

    /// Internal error (500, logged)
    Internal { message: String },
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Forbidden { .. } => StatusCode::FORBIDDEN,
            Self::SummariesDisabled => StatusCode::SERVICE_UNAVAILABLE,
            Self::Upstream(_) => StatusCode::BAD_GATEWAY,
            Self::Database(_) | Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let (title, message) = match &self {
            Self::Validation(e) => ("Invalid request", e.to_string()),
            Self::NotFound { resource, id } => {
                ("Not found", format!("{} '{}' not found", resource, id))
            }
            Self::Forbidden { reason } => ("Forbidden", reason.clone()),
            Self::SummariesDisabled => (
                "Summaries unavailable",
                "Summary generation is not configured on this server.".to_string(),
            ),
            Self::Upstream(e) => {
                tracing::error!("Summarizer error: {}", e);
                (
                    "Summary failed",
                    "The summary service did not respond. Please try again later.".to_string(),
                )
            }
            Self::Database(e) => {
                // Log the actual error, return generic message
                tracing::error!("Database error: {}", e);
                ("Error", "An internal error occurred.".to_string())
            }
            Self::Internal { message } => {
                tracing::error!("Internal error: {}", message);
                ("Error", "An internal error occurred.".to_string())
            }
        };

        (status, views::error_page(title, &message)).into_response()
    }
}

impl From<ValidationError> for AppError {
    fn from(e: ValidationError) -> Self {
        Self::Validation(e)
    }
}

impl From<DbError> for AppError {
    fn from(e: DbError) -> Self {
        match e {
            DbError::NotFound { resource, id } => Self::NotFound { resource, id },
            _ => Self::Database(e),
        }
    }
}

impl From<JournalError> for AppError {
    fn from(e: JournalError) -> Self {
        match e {
            JournalError::Db(e) => e.into(),
            JournalError::Summarizer(e) => Self::Upstream(e),
            JournalError::Cipher(e) => e.into(),
            JournalError::Validation(e) => Self::Validation(e),
        }
    }
}

impl From<CipherError> for AppError {
    fn from(e: CipherError) -> Self {
        Self::Internal {
            message: format!("cipher: {}", e),
        }
    }
}

impl From<PasswordError> for AppError {
    fn from(e: PasswordError) -> Self {
        Self::Internal {
            message: format!("password hashing: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    #[tokio::test]
    async fn validation_error_is_400() {
        let err = AppError::Validation(ValidationError::Empty { field: "entry" });
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn not_found_is_404() {
        let err: AppError = DbError::NotFound {
            resource: "user",
            id: "ghost".into(),
        }
        .into();
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn summarizer_failures_are_upstream() {
        let err: AppError = JournalError::Summarizer(SummarizerError::EmptyResponse).into();
        assert_eq!(err.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(AppError::SummariesDisabled.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn internal_details_are_hidden() {
        let err = AppError::Internal {
            message: "secret connection string".into(),
        };
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = String::from_utf8(body.to_vec()).unwrap();
        assert!(!body.contains("secret connection string"));
        assert!(body.contains("An internal error occurred."));
    }
}
