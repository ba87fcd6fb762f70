use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

use crate::store::StoreError;

/// Every failure a handler can surface to a client.
///
/// Client faults carry a stable `code` and a human-readable message.
/// Server faults collapse into [`ApiError::Internal`]; their detail is
/// logged where they are created and never sent over the wire.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("No Authorization header found")]
    MissingCredential,
    #[error("Authorization header does not carry a bearer token")]
    MalformedCredential,
    #[error("Invalid credentials")]
    InvalidCredential,
    #[error("Account for this token no longer exists")]
    UnknownSubject,
    #[error("Please provide a valid email address")]
    InvalidEmail,
    #[error("Email already registered")]
    DuplicateAccount,
    #[error("Password must be at least 8 characters long")]
    WeakCredential,
    #[error("Missing required profile fields: {}", .0.join(", "))]
    IncompleteProfile(Vec<String>),
    #[error("Missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<String>),
    #[error("{0}")]
    Validation(String),
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("Something went wrong")]
    Internal,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub code: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<Vec<String>>,
}

impl ApiError {
    /// Log `err` server-side and return the generic 500.
    pub fn internal(context: &str, err: impl std::fmt::Display) -> Self {
        error!(error = %err, "{context}");
        ApiError::Internal
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingCredential
            | ApiError::MalformedCredential
            | ApiError::InvalidCredential
            | ApiError::UnknownSubject => StatusCode::UNAUTHORIZED,
            ApiError::InvalidEmail
            | ApiError::WeakCredential
            | ApiError::IncompleteProfile(_)
            | ApiError::MissingFields(_)
            | ApiError::DuplicateAccount
            | ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ApiError::MissingCredential => "missing_credential",
            ApiError::MalformedCredential => "malformed_credential",
            ApiError::InvalidCredential => "invalid_credential",
            ApiError::UnknownSubject => "unknown_subject",
            ApiError::InvalidEmail => "invalid_email",
            ApiError::DuplicateAccount => "duplicate_account",
            ApiError::WeakCredential => "weak_credential",
            ApiError::IncompleteProfile(_) => "incomplete_profile",
            ApiError::MissingFields(_) | ApiError::Validation(_) => "validation_error",
            ApiError::NotFound(_) => "not_found",
            ApiError::Internal => "internal",
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(what) => {
                tracing::debug!(%what, "store lookup missed");
                ApiError::NotFound("Resource")
            }
            other => ApiError::internal("storage error", other),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let fields = match &self {
            ApiError::IncompleteProfile(f) | ApiError::MissingFields(f) => Some(f.clone()),
            _ => None,
        };
        let body = ErrorResponse {
            code: self.code(),
            message: self.to_string(),
            fields,
        };
        (self.status(), Json(body)).into_response()
    }
}
