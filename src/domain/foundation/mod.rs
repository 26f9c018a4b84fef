//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers, the state machine trait, and error
//! types that form the vocabulary of the registration lifecycle domain.

mod errors;
mod ids;
mod state_machine;
mod timestamp;

pub use errors::{DomainError, ErrorCode, ValidationError};
pub use ids::{AdminId, ActivationTokenId, SubmissionId, TicketId, TransactionId};
pub use state_machine::StateMachine;
pub use timestamp::Timestamp;
