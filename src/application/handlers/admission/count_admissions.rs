//! CountAdmissionsHandler - fresh headcount over the transaction ledger.

use std::sync::Arc;

use crate::domain::payment::{ReconciliationError, TransactionStatus};
use crate::ports::AdmissionReader;

/// Statuses counted by default: open attempts plus settled successes.
/// Counting pendings accepts a slight overcount from attempts that will
/// later fail; undercounting admissions would be worse.
pub const DEFAULT_ADMISSION_FILTER: [TransactionStatus; 2] =
    [TransactionStatus::Pending, TransactionStatus::Success];

/// Query for the current admission count.
#[derive(Debug, Clone, Default)]
pub struct CountAdmissionsQuery {
    /// Statuses to count; `None` uses the default filter.
    pub filter: Option<Vec<TransactionStatus>>,
}

/// Handler that aggregates the count per call. Nothing is cached, so the
/// number is as fresh as the ledger.
pub struct CountAdmissionsHandler {
    reader: Arc<dyn AdmissionReader>,
}

impl CountAdmissionsHandler {
    pub fn new(reader: Arc<dyn AdmissionReader>) -> Self {
        Self { reader }
    }

    pub async fn handle(&self, query: CountAdmissionsQuery) -> Result<u64, ReconciliationError> {
        let filter = query
            .filter
            .unwrap_or_else(|| DEFAULT_ADMISSION_FILTER.to_vec());
        let count = self.reader.count_by_status(&filter).await?;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::test_support::InMemoryTransactions;
    use crate::domain::foundation::{TicketId, Timestamp};
    use crate::domain::payment::Transaction;
    use crate::ports::TransactionRepository;

    async fn seed(transactions: &InMemoryTransactions, status: TransactionStatus) {
        let tx = Transaction::record(TicketId::new(), 150_00, Timestamp::now());
        transactions.insert(&tx).await.unwrap();
        transactions.force_status(tx.id, status);
    }

    #[tokio::test]
    async fn default_filter_counts_pending_and_success() {
        let transactions = Arc::new(InMemoryTransactions::new());
        seed(&transactions, TransactionStatus::Pending).await;
        seed(&transactions, TransactionStatus::Success).await;
        seed(&transactions, TransactionStatus::Failed).await;
        seed(&transactions, TransactionStatus::Expired).await;
        seed(&transactions, TransactionStatus::Cancelled).await;

        let handler = CountAdmissionsHandler::new(transactions);
        let count = handler.handle(CountAdmissionsQuery::default()).await.unwrap();

        assert_eq!(count, 2);
    }

    #[tokio::test]
    async fn explicit_filter_narrows_the_count() {
        let transactions = Arc::new(InMemoryTransactions::new());
        seed(&transactions, TransactionStatus::Pending).await;
        seed(&transactions, TransactionStatus::Success).await;

        let handler = CountAdmissionsHandler::new(transactions);
        let count = handler
            .handle(CountAdmissionsQuery {
                filter: Some(vec![TransactionStatus::Success]),
            })
            .await
            .unwrap();

        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn empty_ledger_counts_zero() {
        let handler = CountAdmissionsHandler::new(Arc::new(InMemoryTransactions::new()));
        let count = handler.handle(CountAdmissionsQuery::default()).await.unwrap();
        assert_eq!(count, 0);
    }
}
