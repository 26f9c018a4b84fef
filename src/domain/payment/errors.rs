//! Payment and reconciliation error types.
//!
//! # HTTP Status Mapping
//!
//! | Error | HTTP Status |
//! |-------|-------------|
//! | UnknownReference | 404 |
//! | TicketNotFound | 404 |
//! | DuplicateActive | 409 |
//! | InvalidTransition | 409 |
//! | ValidationFailed | 400 |
//! | Infrastructure | 500 |

use crate::domain::foundation::{DomainError, ErrorCode, TicketId};

/// Errors raised by the reconciliation handlers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconciliationError {
    /// No transaction matches the provider reference.
    UnknownReference(String),

    /// The ticket linked to the transaction does not exist.
    TicketNotFound(TicketId),

    /// The ticket already carries a non-terminal transaction.
    DuplicateActive(TicketId),

    /// The requested transition is not reachable from the current state.
    InvalidTransition { current: String, attempted: String },

    /// Input validation failed before any storage access.
    ValidationFailed { field: String, message: String },

    /// Storage or downstream infrastructure error.
    Infrastructure(String),
}

impl ReconciliationError {
    pub fn unknown_reference(reference: impl Into<String>) -> Self {
        ReconciliationError::UnknownReference(reference.into())
    }

    pub fn ticket_not_found(id: TicketId) -> Self {
        ReconciliationError::TicketNotFound(id)
    }

    pub fn duplicate_active(id: TicketId) -> Self {
        ReconciliationError::DuplicateActive(id)
    }

    pub fn invalid_transition(current: impl Into<String>, attempted: impl Into<String>) -> Self {
        ReconciliationError::InvalidTransition {
            current: current.into(),
            attempted: attempted.into(),
        }
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        ReconciliationError::ValidationFailed {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn infrastructure(message: impl Into<String>) -> Self {
        ReconciliationError::Infrastructure(message.into())
    }

    /// Returns the error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            ReconciliationError::UnknownReference(_) => ErrorCode::TransactionNotFound,
            ReconciliationError::TicketNotFound(_) => ErrorCode::TicketNotFound,
            ReconciliationError::DuplicateActive(_) => ErrorCode::DuplicateActive,
            ReconciliationError::InvalidTransition { .. } => ErrorCode::InvalidStateTransition,
            ReconciliationError::ValidationFailed { .. } => ErrorCode::ValidationFailed,
            ReconciliationError::Infrastructure(_) => ErrorCode::DatabaseError,
        }
    }

    /// Returns a user-friendly error message.
    pub fn message(&self) -> String {
        match self {
            ReconciliationError::UnknownReference(reference) => {
                format!("No transaction matches provider reference '{}'", reference)
            }
            ReconciliationError::TicketNotFound(id) => format!("Ticket not found: {}", id),
            ReconciliationError::DuplicateActive(id) => {
                format!("Ticket {} already has an open payment attempt", id)
            }
            ReconciliationError::InvalidTransition { current, attempted } => {
                format!("Cannot move transaction from {} to {}", current, attempted)
            }
            ReconciliationError::ValidationFailed { field, message } => {
                format!("Validation failed for '{}': {}", field, message)
            }
            ReconciliationError::Infrastructure(msg) => format!("Error: {}", msg),
        }
    }
}

impl std::fmt::Display for ReconciliationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ReconciliationError {}

impl From<DomainError> for ReconciliationError {
    fn from(err: DomainError) -> Self {
        match err.code {
            ErrorCode::InvalidStateTransition => ReconciliationError::InvalidTransition {
                current: "unknown".to_string(),
                attempted: err.to_string(),
            },
            ErrorCode::ValidationFailed => ReconciliationError::ValidationFailed {
                field: "unknown".to_string(),
                message: err.to_string(),
            },
            _ => ReconciliationError::Infrastructure(err.to_string()),
        }
    }
}
