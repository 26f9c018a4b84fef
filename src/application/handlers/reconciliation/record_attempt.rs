//! RecordAttemptHandler - opens a payment attempt for a ticket.

use std::sync::Arc;

use crate::domain::foundation::{ErrorCode, TicketId, Timestamp};
use crate::domain::payment::{ReconciliationError, Transaction};
use crate::ports::{TicketRepository, TransactionRepository};

/// Command to record a payment attempt.
#[derive(Debug, Clone)]
pub struct RecordAttemptCommand {
    pub ticket_id: TicketId,
    /// Amount in minor currency units.
    pub amount: i64,
}

/// Handler that opens a pending transaction with a fresh provider
/// reference. At most one open transaction per ticket is allowed.
pub struct RecordAttemptHandler {
    tickets: Arc<dyn TicketRepository>,
    transactions: Arc<dyn TransactionRepository>,
}

impl RecordAttemptHandler {
    pub fn new(
        tickets: Arc<dyn TicketRepository>,
        transactions: Arc<dyn TransactionRepository>,
    ) -> Self {
        Self {
            tickets,
            transactions,
        }
    }

    pub async fn handle(
        &self,
        cmd: RecordAttemptCommand,
    ) -> Result<Transaction, ReconciliationError> {
        if cmd.amount <= 0 {
            return Err(ReconciliationError::validation(
                "amount",
                "must be a positive number of minor currency units",
            ));
        }

        self.tickets
            .find_by_id(cmd.ticket_id)
            .await?
            .ok_or_else(|| ReconciliationError::ticket_not_found(cmd.ticket_id))?;

        if let Some(open) = self.transactions.find_open_by_ticket(cmd.ticket_id).await? {
            tracing::debug!(
                ticket_id = %cmd.ticket_id,
                provider_ref = %open.provider_ref,
                "rejecting second open attempt"
            );
            return Err(ReconciliationError::duplicate_active(cmd.ticket_id));
        }

        let transaction = Transaction::record(cmd.ticket_id, cmd.amount, Timestamp::now());
        // A concurrent insert can slip between the check above and this
        // write; the partial unique index turns that race into a
        // DuplicateActive error rather than a second open attempt.
        self.transactions
            .insert(&transaction)
            .await
            .map_err(|e| match e.code {
                ErrorCode::DuplicateActive => {
                    ReconciliationError::duplicate_active(cmd.ticket_id)
                }
                _ => e.into(),
            })?;

        tracing::info!(
            ticket_id = %cmd.ticket_id,
            transaction_id = %transaction.id,
            provider_ref = %transaction.provider_ref,
            "payment attempt recorded"
        );

        Ok(transaction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::test_support::{InMemoryTickets, InMemoryTransactions};
    use crate::domain::foundation::{DomainError, TransactionId};
    use crate::domain::payment::TransactionStatus;
    use crate::domain::ticket::{Holder, Ticket, TicketCategory};
    use crate::ports::TransitionOutcome;

    fn ticket() -> Ticket {
        Ticket::register(
            Holder::new("Ada Lovelace", "ada@example.com", None).unwrap(),
            None,
            TicketCategory::GeneralAdmission,
            Timestamp::now(),
        )
    }

    #[tokio::test]
    async fn records_a_pending_attempt() {
        let t = ticket();
        let tickets = Arc::new(InMemoryTickets::with_ticket(t.clone()));
        let transactions = Arc::new(InMemoryTransactions::new());
        let handler = RecordAttemptHandler::new(tickets, transactions.clone());

        let tx = handler
            .handle(RecordAttemptCommand {
                ticket_id: t.id,
                amount: 150_00,
            })
            .await
            .unwrap();

        assert_eq!(tx.status, TransactionStatus::Pending);
        assert_eq!(transactions.all().len(), 1);
    }

    #[tokio::test]
    async fn rejects_second_open_attempt_for_same_ticket() {
        let t = ticket();
        let tickets = Arc::new(InMemoryTickets::with_ticket(t.clone()));
        let transactions = Arc::new(InMemoryTransactions::new());
        let handler = RecordAttemptHandler::new(tickets, transactions.clone());

        let cmd = RecordAttemptCommand {
            ticket_id: t.id,
            amount: 150_00,
        };
        handler.handle(cmd.clone()).await.unwrap();
        let result = handler.handle(cmd).await;

        assert!(matches!(
            result,
            Err(ReconciliationError::DuplicateActive(id)) if id == t.id
        ));
        assert_eq!(transactions.all().len(), 1);
    }

    #[tokio::test]
    async fn allows_new_attempt_after_previous_one_settled() {
        let t = ticket();
        let tickets = Arc::new(InMemoryTickets::with_ticket(t.clone()));
        let transactions = Arc::new(InMemoryTransactions::new());
        let handler = RecordAttemptHandler::new(tickets, transactions.clone());

        let cmd = RecordAttemptCommand {
            ticket_id: t.id,
            amount: 150_00,
        };
        let first = handler.handle(cmd.clone()).await.unwrap();
        transactions.force_status(first.id, TransactionStatus::Failed);

        handler.handle(cmd).await.unwrap();
        assert_eq!(transactions.all().len(), 2);
    }

    #[tokio::test]
    async fn rejects_unknown_ticket() {
        let tickets = Arc::new(InMemoryTickets::new());
        let transactions = Arc::new(InMemoryTransactions::new());
        let handler = RecordAttemptHandler::new(tickets, transactions);

        let result = handler
            .handle(RecordAttemptCommand {
                ticket_id: TicketId::new(),
                amount: 150_00,
            })
            .await;

        assert!(matches!(result, Err(ReconciliationError::TicketNotFound(_))));
    }

    #[tokio::test]
    async fn rejects_non_positive_amount_before_storage() {
        let tickets = Arc::new(InMemoryTickets::new());
        let transactions = Arc::new(InMemoryTransactions::new());
        let handler = RecordAttemptHandler::new(tickets, transactions);

        let result = handler
            .handle(RecordAttemptCommand {
                ticket_id: TicketId::new(),
                amount: 0,
            })
            .await;

        assert!(matches!(
            result,
            Err(ReconciliationError::ValidationFailed { ref field, .. }) if field == "amount"
        ));
    }

    /// Stand-in for a ticket whose open attempt lands between the
    /// pre-insert check and the insert itself. The open-attempt lookup
    /// sees nothing, then the unique index rejects the write.
    struct RacingTransactions;

    #[async_trait::async_trait]
    impl TransactionRepository for RacingTransactions {
        async fn insert(&self, _transaction: &Transaction) -> Result<(), DomainError> {
            Err(DomainError::new(
                ErrorCode::DuplicateActive,
                "Ticket already has an open payment attempt",
            ))
        }

        async fn find_by_id(
            &self,
            _id: TransactionId,
        ) -> Result<Option<Transaction>, DomainError> {
            Ok(None)
        }

        async fn find_by_provider_ref(
            &self,
            _provider_ref: &str,
        ) -> Result<Option<Transaction>, DomainError> {
            Ok(None)
        }

        async fn find_open_by_ticket(
            &self,
            _ticket_id: TicketId,
        ) -> Result<Option<Transaction>, DomainError> {
            Ok(None)
        }

        async fn settle(
            &self,
            _id: TransactionId,
            _expected: TransactionStatus,
            _target: TransactionStatus,
        ) -> Result<TransitionOutcome<Transaction>, DomainError> {
            Ok(TransitionOutcome::Conflict)
        }
    }

    #[tokio::test]
    async fn lost_insert_race_surfaces_as_duplicate_active() {
        let t = ticket();
        let tickets = Arc::new(InMemoryTickets::with_ticket(t.clone()));
        let handler = RecordAttemptHandler::new(tickets, Arc::new(RacingTransactions));

        let result = handler
            .handle(RecordAttemptCommand {
                ticket_id: t.id,
                amount: 150_00,
            })
            .await;

        assert!(matches!(
            result,
            Err(ReconciliationError::DuplicateActive(id)) if id == t.id
        ));
    }
}
