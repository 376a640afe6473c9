//! HTTP error mapping
//!
//! Store failures become static plain-text responses. The underlying error is
//! logged, never sent to the client.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use crate::Error;

pub const USER_NOT_FOUND: &str = "User not found";
pub const EMAIL_TAKEN: &str = "User with this email already exists";
pub const FIELDS_REQUIRED: &str = "Name and email are required";

/// An error response: status code plus a static body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    status: StatusCode,
    message: &'static str,
}

impl ApiError {
    pub fn new(status: StatusCode, message: &'static str) -> Self {
        Self { status, message }
    }

    pub fn not_found() -> Self {
        Self::new(StatusCode::NOT_FOUND, USER_NOT_FOUND)
    }

    pub fn malformed() -> Self {
        Self::new(StatusCode::BAD_REQUEST, FIELDS_REQUIRED)
    }

    /// Map a store error, using `fallback` as the body for internal failures
    pub fn from_store(err: Error, fallback: &'static str) -> Self {
        match err {
            Error::NotFound(_) => Self::not_found(),
            Error::ConstraintViolation(email) => {
                tracing::debug!("Rejected duplicate email {}", email);
                Self::new(StatusCode::CONFLICT, EMAIL_TAKEN)
            }
            Error::MalformedInput(reason) => {
                tracing::debug!("Rejected malformed input: {}", reason);
                Self::malformed()
            }
            Error::Storage(_) | Error::Io(_) | Error::Poisoned | Error::Task(_) => {
                tracing::error!(error = %err, "{}", fallback);
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, fallback)
            }
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn message(&self) -> &'static str {
        self.message
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, self.message).into_response()
    }
}

/// Attach the internal-failure message for a route to a store result
pub trait StoreResultExt<T> {
    fn or_respond(self, fallback: &'static str) -> Result<T, ApiError>;
}

impl<T> StoreResultExt<T> for crate::Result<T> {
    fn or_respond(self, fallback: &'static str) -> Result<T, ApiError> {
        self.map_err(|err| ApiError::from_store(err, fallback))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ApiError::from_store(Error::NotFound(7), "x").status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::from_store(Error::ConstraintViolation("a@x.com".into()), "x").status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ApiError::from_store(Error::MalformedInput("name is required".into()), "x").status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::from_store(Error::Poisoned, "x").status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_internal_failure_uses_fallback_body() {
        let err = ApiError::from_store(Error::Task("panicked".into()), "Error creating user");
        assert_eq!(err.message(), "Error creating user");
    }
}
