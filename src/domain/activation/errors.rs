//! Activation token error types.
//!
//! # HTTP Status Mapping
//!
//! | Error | HTTP Status |
//! |-------|-------------|
//! | Expired | 410 |
//! | AlreadyConsumed | 409 |
//! | NotFound | 404 |
//! | ValidationFailed | 400 |
//! | Infrastructure | 500 |

use crate::domain::foundation::{DomainError, ErrorCode};

/// Errors raised when issuing or consuming activation tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActivationError {
    /// The token's expiry window has passed.
    Expired,

    /// The token was already used; exactly one consumer wins.
    AlreadyConsumed,

    /// No token matches the presented string.
    NotFound,

    /// Input validation failed before any storage access.
    ValidationFailed { field: String, message: String },

    /// Storage or downstream infrastructure error.
    Infrastructure(String),
}

impl ActivationError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        ActivationError::ValidationFailed {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn infrastructure(message: impl Into<String>) -> Self {
        ActivationError::Infrastructure(message.into())
    }

    /// Returns the error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            ActivationError::Expired => ErrorCode::TokenExpired,
            ActivationError::AlreadyConsumed => ErrorCode::AlreadyConsumed,
            ActivationError::NotFound => ErrorCode::TokenNotFound,
            ActivationError::ValidationFailed { .. } => ErrorCode::ValidationFailed,
            ActivationError::Infrastructure(_) => ErrorCode::DatabaseError,
        }
    }

    /// Returns a user-friendly error message.
    ///
    /// The token string itself is never echoed back.
    pub fn message(&self) -> String {
        match self {
            ActivationError::Expired => "Activation link has expired".to_string(),
            ActivationError::AlreadyConsumed => "Activation link was already used".to_string(),
            ActivationError::NotFound => "Activation link is not valid".to_string(),
            ActivationError::ValidationFailed { field, message } => {
                format!("Validation failed for '{}': {}", field, message)
            }
            ActivationError::Infrastructure(msg) => format!("Error: {}", msg),
        }
    }
}

impl std::fmt::Display for ActivationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ActivationError {}

impl From<DomainError> for ActivationError {
    fn from(err: DomainError) -> Self {
        match err.code {
            ErrorCode::TokenExpired => ActivationError::Expired,
            ErrorCode::AlreadyConsumed => ActivationError::AlreadyConsumed,
            ErrorCode::TokenNotFound => ActivationError::NotFound,
            _ => ActivationError::Infrastructure(err.to_string()),
        }
    }
}
