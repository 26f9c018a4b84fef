use async_trait::async_trait;

use crate::domain::foundation::{DomainError, TicketId};
use crate::domain::ticket::{ModerationState, Ticket};

use super::TransitionOutcome;

/// Storage contract for tickets.
#[async_trait]
pub trait TicketRepository: Send + Sync {
    /// Persists a newly registered ticket.
    ///
    /// # Errors
    ///
    /// Returns `DomainError` if the write fails.
    async fn insert(&self, ticket: &Ticket) -> Result<(), DomainError>;

    /// Looks a ticket up by id.
    ///
    /// # Errors
    ///
    /// Returns `DomainError` if the query fails.
    async fn find_by_id(&self, id: TicketId) -> Result<Option<Ticket>, DomainError>;

    /// Conditionally moves a ticket's moderation state. The write
    /// succeeds only if the stored state still equals `expected`; the
    /// moderation note is rewritten in the same statement.
    ///
    /// # Errors
    ///
    /// Returns `DomainError` if the write fails. A lost race surfaces
    /// as `TransitionOutcome::Conflict`, not an error.
    async fn set_moderation(
        &self,
        id: TicketId,
        expected: ModerationState,
        target: ModerationState,
        note: Option<&str>,
    ) -> Result<TransitionOutcome<Ticket>, DomainError>;

    /// Conditionally marks a ticket verified. Succeeds only if the
    /// ticket is currently unverified.
    ///
    /// # Errors
    ///
    /// Returns `DomainError` if the write fails.
    async fn set_verified(&self, id: TicketId)
        -> Result<TransitionOutcome<Ticket>, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trait_is_object_safe() {
        fn _assert(_: &dyn TicketRepository) {}
    }
}
