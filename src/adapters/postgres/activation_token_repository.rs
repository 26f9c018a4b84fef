//! PostgreSQL implementation of ActivationTokenRepository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::activation::ActivationToken;
use crate::domain::foundation::{ActivationTokenId, DomainError, ErrorCode, Timestamp};
use crate::ports::{ActivationTokenRepository, ConsumeOutcome};

/// PostgreSQL store for activation tokens.
///
/// `consume` is one conditional UPDATE; when it matches no row, a
/// follow-up SELECT classifies the losing path. Between the two
/// statements the row can only move further away from consumable, so
/// the classification stays sound.
pub struct PostgresActivationTokenRepository {
    pool: PgPool,
}

impl PostgresActivationTokenRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct TokenRow {
    id: Uuid,
    token: String,
    identity_id: String,
    expires_at: DateTime<Utc>,
    consumed_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
}

impl From<TokenRow> for ActivationToken {
    fn from(row: TokenRow) -> Self {
        ActivationToken {
            id: ActivationTokenId::from_uuid(row.id),
            token: row.token,
            identity_id: row.identity_id,
            expires_at: Timestamp::from_datetime(row.expires_at),
            consumed_at: row.consumed_at.map(Timestamp::from_datetime),
            created_at: Timestamp::from_datetime(row.created_at),
        }
    }
}

fn db_error(context: &str, e: sqlx::Error) -> DomainError {
    DomainError::new(ErrorCode::DatabaseError, format!("{}: {}", context, e))
}

const SELECT_COLUMNS: &str = "id, token, identity_id, expires_at, consumed_at, created_at";

#[async_trait]
impl ActivationTokenRepository for PostgresActivationTokenRepository {
    async fn insert(&self, token: &ActivationToken) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO activation_tokens (id, token, identity_id, expires_at, consumed_at, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(token.id.as_uuid())
        .bind(&token.token)
        .bind(&token.identity_id)
        .bind(token.expires_at.as_datetime())
        .bind(token.consumed_at.map(|t| *t.as_datetime()))
        .bind(token.created_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("Failed to insert activation token", e))?;

        Ok(())
    }

    async fn find_by_token(&self, token: &str) -> Result<Option<ActivationToken>, DomainError> {
        let row: Option<TokenRow> = sqlx::query_as(&format!(
            "SELECT {} FROM activation_tokens WHERE token = $1",
            SELECT_COLUMNS
        ))
        .bind(token)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("Failed to find activation token", e))?;

        Ok(row.map(ActivationToken::from))
    }

    async fn consume(&self, token: &str, now: Timestamp) -> Result<ConsumeOutcome, DomainError> {
        let row: Option<TokenRow> = sqlx::query_as(&format!(
            r#"
            UPDATE activation_tokens
            SET consumed_at = $2
            WHERE token = $1 AND consumed_at IS NULL AND expires_at > $2
            RETURNING {}
            "#,
            SELECT_COLUMNS
        ))
        .bind(token)
        .bind(now.as_datetime())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("Failed to consume activation token", e))?;

        if let Some(row) = row {
            return Ok(ConsumeOutcome::Consumed(ActivationToken::from(row)));
        }

        match self.find_by_token(token).await? {
            Some(stored) if stored.is_expired(now) => Ok(ConsumeOutcome::Expired),
            Some(stored) if stored.is_consumed() => Ok(ConsumeOutcome::AlreadyConsumed),
            Some(_) => Ok(ConsumeOutcome::AlreadyConsumed),
            None => Ok(ConsumeOutcome::NotFound),
        }
    }
}
