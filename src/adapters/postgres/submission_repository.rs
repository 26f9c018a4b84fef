//! PostgreSQL implementation of SubmissionRepository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::foundation::{DomainError, ErrorCode, SubmissionId, TicketId, Timestamp};
use crate::domain::ticket::{Submission, SubmissionState};
use crate::ports::{SubmissionRepository, TransitionOutcome};

pub struct PostgresSubmissionRepository {
    pool: PgPool,
}

impl PostgresSubmissionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct SubmissionRow {
    id: Uuid,
    ticket_id: Uuid,
    content_ref: String,
    feedback: Option<String>,
    state: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<SubmissionRow> for Submission {
    type Error = DomainError;

    fn try_from(row: SubmissionRow) -> Result<Self, Self::Error> {
        Ok(Submission {
            id: SubmissionId::from_uuid(row.id),
            ticket_id: TicketId::from_uuid(row.ticket_id),
            content_ref: row.content_ref,
            feedback: row.feedback,
            state: parse_state(&row.state)?,
            created_at: Timestamp::from_datetime(row.created_at),
            updated_at: Timestamp::from_datetime(row.updated_at),
        })
    }
}

fn parse_state(s: &str) -> Result<SubmissionState, DomainError> {
    match s {
        "pending" => Ok(SubmissionState::Pending),
        "approved" => Ok(SubmissionState::Approved),
        "rejected" => Ok(SubmissionState::Rejected),
        _ => Err(DomainError::new(
            ErrorCode::DatabaseError,
            format!("Invalid submission state value: {}", s),
        )),
    }
}

fn state_to_string(state: SubmissionState) -> &'static str {
    match state {
        SubmissionState::Pending => "pending",
        SubmissionState::Approved => "approved",
        SubmissionState::Rejected => "rejected",
    }
}

fn db_error(context: &str, e: sqlx::Error) -> DomainError {
    DomainError::new(ErrorCode::DatabaseError, format!("{}: {}", context, e))
}

const SELECT_COLUMNS: &str = "id, ticket_id, content_ref, feedback, state, created_at, updated_at";

#[async_trait]
impl SubmissionRepository for PostgresSubmissionRepository {
    async fn insert(&self, submission: &Submission) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO submissions (id, ticket_id, content_ref, feedback, state, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(submission.id.as_uuid())
        .bind(submission.ticket_id.as_uuid())
        .bind(&submission.content_ref)
        .bind(&submission.feedback)
        .bind(state_to_string(submission.state))
        .bind(submission.created_at.as_datetime())
        .bind(submission.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("Failed to insert submission", e))?;

        Ok(())
    }

    async fn find_by_id(&self, id: SubmissionId) -> Result<Option<Submission>, DomainError> {
        let row: Option<SubmissionRow> = sqlx::query_as(&format!(
            "SELECT {} FROM submissions WHERE id = $1",
            SELECT_COLUMNS
        ))
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("Failed to find submission", e))?;

        row.map(Submission::try_from).transpose()
    }

    async fn find_pending_by_ticket(
        &self,
        ticket_id: TicketId,
    ) -> Result<Option<Submission>, DomainError> {
        let row: Option<SubmissionRow> = sqlx::query_as(&format!(
            "SELECT {} FROM submissions WHERE ticket_id = $1 AND state = 'pending' \
             ORDER BY created_at DESC LIMIT 1",
            SELECT_COLUMNS
        ))
        .bind(ticket_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("Failed to find pending submission", e))?;

        row.map(Submission::try_from).transpose()
    }

    async fn record_verdict(
        &self,
        id: SubmissionId,
        target: SubmissionState,
        feedback: &str,
    ) -> Result<TransitionOutcome<Submission>, DomainError> {
        // Feedback and verdict land in one statement so they cannot diverge.
        let feedback = if feedback.is_empty() {
            None
        } else {
            Some(feedback)
        };

        let row: Option<SubmissionRow> = sqlx::query_as(&format!(
            r#"
            UPDATE submissions
            SET state = $2, feedback = $3, updated_at = NOW()
            WHERE id = $1 AND state = 'pending'
            RETURNING {}
            "#,
            SELECT_COLUMNS
        ))
        .bind(id.as_uuid())
        .bind(state_to_string(target))
        .bind(feedback)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("Failed to record verdict", e))?;

        match row {
            Some(row) => Ok(TransitionOutcome::Applied(Submission::try_from(row)?)),
            None => Ok(TransitionOutcome::Conflict),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_conversion_roundtrips() {
        for state in [
            SubmissionState::Pending,
            SubmissionState::Approved,
            SubmissionState::Rejected,
        ] {
            assert_eq!(parse_state(state_to_string(state)).unwrap(), state);
        }
    }

    #[test]
    fn unknown_state_is_rejected() {
        assert!(parse_state("under_review").is_err());
    }
}
