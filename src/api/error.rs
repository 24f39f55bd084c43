//! Classified failures surfaced by the API client.
//!
//! Every operation resolves with one of these variants so failure handling
//! is enumerable at the call site. Only `Unauthorized` carries a session
//! side effect (forced logout); everything else is session-neutral.

use thiserror::Error;

use crate::api::types::FieldError;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Login rejected by the server; the session is unchanged.
    #[error("invalid email or password")]
    InvalidCredentials,

    /// The credential of an authenticated request was rejected; the session
    /// has been cleared.
    #[error("credential rejected by the server; session cleared")]
    Unauthorized,

    /// Authenticated but lacking the privilege for this action. Re-login
    /// would not help; the session is left intact.
    #[error("insufficient permissions for this action")]
    Forbidden,

    #[error("resource not found")]
    NotFound,

    #[error("validation failed: {}", summarize(.0))]
    ValidationFailed(Vec<FieldError>),

    #[error("request timed out")]
    Timeout,

    #[error("network failure: {0}")]
    NetworkFailure(String),

    #[error("unexpected status {0}")]
    Unknown(u16),
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else {
            Self::NetworkFailure(err.to_string())
        }
    }
}

fn summarize(fields: &[FieldError]) -> String {
    if fields.is_empty() {
        return "invalid request".to_string();
    }
    fields
        .iter()
        .map(|f| format!("{}: {}", f.field, f.message))
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_failure_lists_fields() {
        let err = ApiError::ValidationFailed(vec![
            FieldError {
                field: "body.email".to_string(),
                message: "value is not a valid email address".to_string(),
            },
            FieldError {
                field: "body.password".to_string(),
                message: "ensure this value has at least 8 characters".to_string(),
            },
        ]);

        let text = err.to_string();
        assert!(text.contains("body.email: value is not a valid email address"));
        assert!(text.contains("body.password"));
    }

    #[test]
    fn empty_validation_failure_is_still_readable() {
        let err = ApiError::ValidationFailed(Vec::new());
        assert_eq!(err.to_string(), "validation failed: invalid request");
    }
}
