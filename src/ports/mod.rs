//! Ports - trait contracts between the application core and adapters.
//!
//! All entity mutations go through conditional-update methods that report
//! whether this caller won the race (`TransitionOutcome`). The store's
//! atomic conditional write is the only synchronization primitive; no
//! in-process locks exist.

mod activation_token_repository;
mod admission_reader;
mod cache_invalidator;
mod notification_sink;
mod submission_repository;
mod ticket_repository;
mod transaction_repository;

pub use activation_token_repository::{ActivationTokenRepository, ConsumeOutcome};
pub use admission_reader::AdmissionReader;
pub use cache_invalidator::CacheInvalidator;
pub use notification_sink::{Notification, NotificationSink};
pub use submission_repository::SubmissionRepository;
pub use ticket_repository::TicketRepository;
pub use transaction_repository::TransactionRepository;

/// Result of a compare-and-set mutation.
///
/// `Conflict` means the stored state no longer matched the expected
/// state: a concurrent request won the race, or the caller's view was
/// stale. The caller decides whether that is an error or a no-op.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransitionOutcome<T> {
    /// The conditional update matched and the record was rewritten.
    Applied(T),
    /// The stored state did not match the expected state.
    Conflict,
}

impl<T> TransitionOutcome<T> {
    /// Returns the updated record, or `None` on conflict.
    pub fn applied(self) -> Option<T> {
        match self {
            TransitionOutcome::Applied(value) => Some(value),
            TransitionOutcome::Conflict => None,
        }
    }
}
