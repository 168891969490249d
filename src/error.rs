//! Error Types

use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use thiserror::Error;
use tracing::error;

use crate::credentials::StoreError;
use crate::web::views;

/// Request-level error, mapped onto an HTTP response
#[derive(Debug, Error)]
pub enum AppError {
    /// A submitted form field is missing or malformed
    #[error("{message}")]
    Validation {
        message: String,
        retry_href: &'static str,
    },

    /// An identifier is already taken
    #[error("identifier already in use: {0}")]
    Conflict(String),

    /// A referenced account does not exist
    #[error("no such account: {0}")]
    NotFound(String),

    /// The request has no valid session
    #[error("login required")]
    Unauthorized,

    /// The session is valid but lacks the required role
    #[error("insufficient privileges")]
    Forbidden,

    /// A collaborator failed; details stay out of the response
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Shorthand for a missing-field validation error
    pub fn missing_field(field: &str, retry_href: &'static str) -> Self {
        AppError::Validation {
            message: format!("{} is required.", field),
            retry_href,
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict(identifier) => AppError::Conflict(identifier),
            StoreError::NotFound(identifier) => AppError::NotFound(identifier),
            other => AppError::Internal(anyhow::Error::new(other)),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::Validation {
                message,
                retry_href,
            } => (
                StatusCode::BAD_REQUEST,
                views::validation_error(&message, retry_href),
            )
                .into_response(),
            AppError::Conflict(identifier) => (
                StatusCode::CONFLICT,
                views::identifier_taken(&identifier),
            )
                .into_response(),
            AppError::NotFound(identifier) => (
                StatusCode::NOT_FOUND,
                views::unknown_account(&identifier),
            )
                .into_response(),
            AppError::Unauthorized => Redirect::to("/login").into_response(),
            AppError::Forbidden => {
                (StatusCode::FORBIDDEN, views::forbidden()).into_response()
            }
            AppError::Internal(err) => {
                error!("request failed: {:#}", err);
                (StatusCode::INTERNAL_SERVER_ERROR, views::server_error()).into_response()
            }
        }
    }
}
