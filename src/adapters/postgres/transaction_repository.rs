//! PostgreSQL implementation of TransactionRepository and AdmissionReader.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::foundation::{DomainError, ErrorCode, TicketId, Timestamp, TransactionId};
use crate::domain::payment::{Transaction, TransactionStatus};
use crate::ports::{AdmissionReader, TransactionRepository, TransitionOutcome};

/// PostgreSQL transaction ledger.
///
/// `settle` is a single conditional UPDATE; the WHERE clause on the
/// current status is what makes concurrent settlements race-safe.
pub struct PostgresTransactionRepository {
    pool: PgPool,
}

impl PostgresTransactionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct TransactionRow {
    id: Uuid,
    ticket_id: Uuid,
    status: String,
    amount: i64,
    provider_ref: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<TransactionRow> for Transaction {
    type Error = DomainError;

    fn try_from(row: TransactionRow) -> Result<Self, Self::Error> {
        Ok(Transaction {
            id: TransactionId::from_uuid(row.id),
            ticket_id: TicketId::from_uuid(row.ticket_id),
            status: parse_status(&row.status)?,
            amount: row.amount,
            provider_ref: row.provider_ref,
            created_at: Timestamp::from_datetime(row.created_at),
            updated_at: Timestamp::from_datetime(row.updated_at),
        })
    }
}

fn parse_status(s: &str) -> Result<TransactionStatus, DomainError> {
    TransactionStatus::parse(s).ok_or_else(|| {
        DomainError::new(
            ErrorCode::DatabaseError,
            format!("Invalid transaction status value: {}", s),
        )
    })
}

fn db_error(context: &str, e: sqlx::Error) -> DomainError {
    DomainError::new(ErrorCode::DatabaseError, format!("{}: {}", context, e))
}

const SELECT_COLUMNS: &str =
    "id, ticket_id, status, amount, provider_ref, created_at, updated_at";

#[async_trait]
impl TransactionRepository for PostgresTransactionRepository {
    async fn insert(&self, transaction: &Transaction) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO transactions (id, ticket_id, status, amount, provider_ref, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(transaction.id.as_uuid())
        .bind(transaction.ticket_id.as_uuid())
        .bind(transaction.status.as_str())
        .bind(transaction.amount)
        .bind(&transaction.provider_ref)
        .bind(transaction.created_at.as_datetime())
        .bind(transaction.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                match db_err.constraint() {
                    Some("transactions_provider_ref_key") => {
                        return DomainError::new(
                            ErrorCode::DuplicateActive,
                            "Provider reference already exists",
                        );
                    }
                    Some("transactions_open_ticket_key") => {
                        return DomainError::new(
                            ErrorCode::DuplicateActive,
                            "Ticket already has an open payment attempt",
                        );
                    }
                    _ => {}
                }
            }
            db_error("Failed to insert transaction", e)
        })?;

        Ok(())
    }

    async fn find_by_id(&self, id: TransactionId) -> Result<Option<Transaction>, DomainError> {
        let row: Option<TransactionRow> = sqlx::query_as(&format!(
            "SELECT {} FROM transactions WHERE id = $1",
            SELECT_COLUMNS
        ))
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("Failed to find transaction", e))?;

        row.map(Transaction::try_from).transpose()
    }

    async fn find_by_provider_ref(
        &self,
        provider_ref: &str,
    ) -> Result<Option<Transaction>, DomainError> {
        let row: Option<TransactionRow> = sqlx::query_as(&format!(
            "SELECT {} FROM transactions WHERE provider_ref = $1",
            SELECT_COLUMNS
        ))
        .bind(provider_ref)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("Failed to find transaction", e))?;

        row.map(Transaction::try_from).transpose()
    }

    async fn find_open_by_ticket(
        &self,
        ticket_id: TicketId,
    ) -> Result<Option<Transaction>, DomainError> {
        let row: Option<TransactionRow> = sqlx::query_as(&format!(
            "SELECT {} FROM transactions WHERE ticket_id = $1 AND status = 'pending' LIMIT 1",
            SELECT_COLUMNS
        ))
        .bind(ticket_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("Failed to find open transaction", e))?;

        row.map(Transaction::try_from).transpose()
    }

    async fn settle(
        &self,
        id: TransactionId,
        expected: TransactionStatus,
        target: TransactionStatus,
    ) -> Result<TransitionOutcome<Transaction>, DomainError> {
        let row: Option<TransactionRow> = sqlx::query_as(&format!(
            r#"
            UPDATE transactions
            SET status = $3, updated_at = NOW()
            WHERE id = $1 AND status = $2
            RETURNING {}
            "#,
            SELECT_COLUMNS
        ))
        .bind(id.as_uuid())
        .bind(expected.as_str())
        .bind(target.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("Failed to settle transaction", e))?;

        match row {
            Some(row) => Ok(TransitionOutcome::Applied(Transaction::try_from(row)?)),
            None => Ok(TransitionOutcome::Conflict),
        }
    }
}

#[async_trait]
impl AdmissionReader for PostgresTransactionRepository {
    async fn count_by_status(&self, statuses: &[TransactionStatus]) -> Result<u64, DomainError> {
        let filter: Vec<String> = statuses.iter().map(|s| s.as_str().to_string()).collect();

        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM transactions WHERE status = ANY($1)")
                .bind(&filter)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| db_error("Failed to count admissions", e))?;

        Ok(count.max(0) as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_status_roundtrips_all_values() {
        for status in [
            TransactionStatus::Pending,
            TransactionStatus::Success,
            TransactionStatus::Failed,
            TransactionStatus::Expired,
            TransactionStatus::Cancelled,
        ] {
            assert_eq!(parse_status(status.as_str()).unwrap(), status);
        }
    }

    #[test]
    fn parse_status_rejects_unknown_values() {
        assert!(parse_status("settled").is_err());
        assert!(parse_status("").is_err());
    }
}
