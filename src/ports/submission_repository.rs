use async_trait::async_trait;

use crate::domain::foundation::{DomainError, SubmissionId, TicketId};
use crate::domain::ticket::{Submission, SubmissionState};

use super::TransitionOutcome;

/// Storage contract for competition submissions.
#[async_trait]
pub trait SubmissionRepository: Send + Sync {
    /// Persists a new submission.
    ///
    /// # Errors
    ///
    /// Returns `DomainError` if the write fails.
    async fn insert(&self, submission: &Submission) -> Result<(), DomainError>;

    /// Looks a submission up by id.
    ///
    /// # Errors
    ///
    /// Returns `DomainError` if the query fails.
    async fn find_by_id(&self, id: SubmissionId) -> Result<Option<Submission>, DomainError>;

    /// Returns the pending submission for a ticket, if one exists.
    ///
    /// # Errors
    ///
    /// Returns `DomainError` if the query fails.
    async fn find_pending_by_ticket(
        &self,
        ticket_id: TicketId,
    ) -> Result<Option<Submission>, DomainError>;

    /// Conditionally records a verdict. The write succeeds only if the
    /// submission is still pending; feedback is stored in the same
    /// statement so verdict and feedback can never diverge.
    ///
    /// # Errors
    ///
    /// Returns `DomainError` if the write fails. A lost race surfaces
    /// as `TransitionOutcome::Conflict`.
    async fn record_verdict(
        &self,
        id: SubmissionId,
        target: SubmissionState,
        feedback: &str,
    ) -> Result<TransitionOutcome<Submission>, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trait_is_object_safe() {
        fn _assert(_: &dyn SubmissionRepository) {}
    }
}
