use async_trait::async_trait;

use crate::domain::foundation::{DomainError, TicketId, TransactionId};
use crate::domain::payment::{Transaction, TransactionStatus};

use super::TransitionOutcome;

/// Storage contract for payment transactions.
///
/// Reconciliation looks transactions up by the provider reference we
/// handed out at attempt time, so `provider_ref` carries a uniqueness
/// constraint in every implementation.
#[async_trait]
pub trait TransactionRepository: Send + Sync {
    /// Persists a newly recorded attempt.
    ///
    /// # Errors
    ///
    /// Returns `DomainError` if the write fails or the provider
    /// reference collides with an existing row.
    async fn insert(&self, transaction: &Transaction) -> Result<(), DomainError>;

    /// Looks a transaction up by id.
    ///
    /// # Errors
    ///
    /// Returns `DomainError` if the query fails.
    async fn find_by_id(&self, id: TransactionId) -> Result<Option<Transaction>, DomainError>;

    /// Looks a transaction up by the provider reference on the wire.
    ///
    /// # Errors
    ///
    /// Returns `DomainError` if the query fails.
    async fn find_by_provider_ref(
        &self,
        provider_ref: &str,
    ) -> Result<Option<Transaction>, DomainError>;

    /// Returns the open (pending) transaction for a ticket, if any.
    ///
    /// # Errors
    ///
    /// Returns `DomainError` if the query fails.
    async fn find_open_by_ticket(
        &self,
        ticket_id: TicketId,
    ) -> Result<Option<Transaction>, DomainError>;

    /// Conditionally settles a transaction: the write succeeds only if
    /// the stored status still equals `expected`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError` if the write fails. A lost race is not an
    /// error; it surfaces as `TransitionOutcome::Conflict`.
    async fn settle(
        &self,
        id: TransactionId,
        expected: TransactionStatus,
        target: TransactionStatus,
    ) -> Result<TransitionOutcome<Transaction>, DomainError>;
}
