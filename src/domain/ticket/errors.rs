//! Moderation error types.
//!
//! # HTTP Status Mapping
//!
//! | Error | HTTP Status |
//! |-------|-------------|
//! | SubmissionNotFound | 404 |
//! | TicketNotFound | 404 |
//! | InvalidTransition | 409 |
//! | ValidationFailed | 400 |
//! | Unauthorized | 403 |
//! | Infrastructure | 500 |

use crate::domain::foundation::{DomainError, ErrorCode, SubmissionId, TicketId, ValidationError};

/// Errors raised by the moderation workflow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModerationError {
    /// Submission was not found.
    SubmissionNotFound(SubmissionId),

    /// Ticket was not found.
    TicketNotFound(TicketId),

    /// The entity is already in a terminal state, or the target is not
    /// reachable from the current state.
    InvalidTransition { current: String, attempted: String },

    /// Input validation failed before any storage access.
    ValidationFailed { field: String, message: String },

    /// The caller lacks the admin role.
    Unauthorized(String),

    /// Storage or downstream infrastructure error.
    Infrastructure(String),
}

impl ModerationError {
    pub fn submission_not_found(id: SubmissionId) -> Self {
        ModerationError::SubmissionNotFound(id)
    }

    pub fn ticket_not_found(id: TicketId) -> Self {
        ModerationError::TicketNotFound(id)
    }

    pub fn invalid_transition(current: impl Into<String>, attempted: impl Into<String>) -> Self {
        ModerationError::InvalidTransition {
            current: current.into(),
            attempted: attempted.into(),
        }
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        ModerationError::ValidationFailed {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        ModerationError::Unauthorized(message.into())
    }

    pub fn infrastructure(message: impl Into<String>) -> Self {
        ModerationError::Infrastructure(message.into())
    }

    /// Returns the error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            ModerationError::SubmissionNotFound(_) => ErrorCode::SubmissionNotFound,
            ModerationError::TicketNotFound(_) => ErrorCode::TicketNotFound,
            ModerationError::InvalidTransition { .. } => ErrorCode::InvalidStateTransition,
            ModerationError::ValidationFailed { .. } => ErrorCode::ValidationFailed,
            ModerationError::Unauthorized(_) => ErrorCode::Forbidden,
            ModerationError::Infrastructure(_) => ErrorCode::DatabaseError,
        }
    }

    /// Returns a user-friendly error message.
    pub fn message(&self) -> String {
        match self {
            ModerationError::SubmissionNotFound(id) => format!("Submission not found: {}", id),
            ModerationError::TicketNotFound(id) => format!("Ticket not found: {}", id),
            ModerationError::InvalidTransition { current, attempted } => {
                format!("Cannot {} while in {} state", attempted, current)
            }
            ModerationError::ValidationFailed { field, message } => {
                format!("Validation failed for '{}': {}", field, message)
            }
            ModerationError::Unauthorized(msg) => format!("Not allowed: {}", msg),
            ModerationError::Infrastructure(msg) => format!("Error: {}", msg),
        }
    }
}

impl std::fmt::Display for ModerationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ModerationError {}

impl From<DomainError> for ModerationError {
    fn from(err: DomainError) -> Self {
        match err.code {
            ErrorCode::InvalidStateTransition => ModerationError::InvalidTransition {
                current: "unknown".to_string(),
                attempted: err.to_string(),
            },
            ErrorCode::ValidationFailed => ModerationError::ValidationFailed {
                field: "unknown".to_string(),
                message: err.to_string(),
            },
            _ => ModerationError::Infrastructure(err.to_string()),
        }
    }
}

impl From<ValidationError> for ModerationError {
    fn from(err: ValidationError) -> Self {
        let field = match &err {
            ValidationError::EmptyField { field } => field.clone(),
            ValidationError::LengthOutOfRange { field, .. } => field.clone(),
            ValidationError::InvalidFormat { field, .. } => field.clone(),
        };
        ModerationError::ValidationFailed {
            field,
            message: err.to_string(),
        }
    }
}
