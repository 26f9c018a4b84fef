//! PostgreSQL implementation of TicketRepository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::foundation::{DomainError, ErrorCode, TicketId, Timestamp};
use crate::domain::ticket::{
    Holder, ModerationState, Team, Ticket, TicketCategory, VerificationState,
};
use crate::ports::{TicketRepository, TransitionOutcome};

pub struct PostgresTicketRepository {
    pool: PgPool,
}

impl PostgresTicketRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct TicketRow {
    id: Uuid,
    holder_name: String,
    holder_email: String,
    holder_phone: Option<String>,
    team_name: Option<String>,
    team_members: Option<Vec<String>>,
    category: String,
    moderation: String,
    verification: String,
    moderation_note: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<TicketRow> for Ticket {
    type Error = DomainError;

    fn try_from(row: TicketRow) -> Result<Self, Self::Error> {
        let team = row.team_name.map(|name| Team {
            name,
            members: row.team_members.unwrap_or_default(),
        });

        Ok(Ticket {
            id: TicketId::from_uuid(row.id),
            holder: Holder {
                name: row.holder_name,
                email: row.holder_email,
                phone: row.holder_phone,
            },
            team,
            category: parse_category(&row.category)?,
            moderation: parse_moderation(&row.moderation)?,
            verification: parse_verification(&row.verification)?,
            moderation_note: row.moderation_note,
            created_at: Timestamp::from_datetime(row.created_at),
            updated_at: Timestamp::from_datetime(row.updated_at),
        })
    }
}

fn parse_category(s: &str) -> Result<TicketCategory, DomainError> {
    match s {
        "general_admission" => Ok(TicketCategory::GeneralAdmission),
        "competition_track" => Ok(TicketCategory::CompetitionTrack),
        "team_competition" => Ok(TicketCategory::TeamCompetition),
        _ => Err(DomainError::new(
            ErrorCode::DatabaseError,
            format!("Invalid category value: {}", s),
        )),
    }
}

fn category_to_string(category: TicketCategory) -> &'static str {
    match category {
        TicketCategory::GeneralAdmission => "general_admission",
        TicketCategory::CompetitionTrack => "competition_track",
        TicketCategory::TeamCompetition => "team_competition",
    }
}

fn parse_moderation(s: &str) -> Result<ModerationState, DomainError> {
    match s {
        "none" => Ok(ModerationState::None),
        "submitted" => Ok(ModerationState::Submitted),
        "approved" => Ok(ModerationState::Approved),
        "rejected" => Ok(ModerationState::Rejected),
        _ => Err(DomainError::new(
            ErrorCode::DatabaseError,
            format!("Invalid moderation value: {}", s),
        )),
    }
}

fn moderation_to_string(state: ModerationState) -> &'static str {
    match state {
        ModerationState::None => "none",
        ModerationState::Submitted => "submitted",
        ModerationState::Approved => "approved",
        ModerationState::Rejected => "rejected",
    }
}

fn parse_verification(s: &str) -> Result<VerificationState, DomainError> {
    match s {
        "unverified" => Ok(VerificationState::Unverified),
        "verified" => Ok(VerificationState::Verified),
        _ => Err(DomainError::new(
            ErrorCode::DatabaseError,
            format!("Invalid verification value: {}", s),
        )),
    }
}

fn db_error(context: &str, e: sqlx::Error) -> DomainError {
    DomainError::new(ErrorCode::DatabaseError, format!("{}: {}", context, e))
}

const SELECT_COLUMNS: &str = "id, holder_name, holder_email, holder_phone, team_name, \
     team_members, category, moderation, verification, moderation_note, created_at, updated_at";

#[async_trait]
impl TicketRepository for PostgresTicketRepository {
    async fn insert(&self, ticket: &Ticket) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO tickets (
                id, holder_name, holder_email, holder_phone, team_name, team_members,
                category, moderation, verification, moderation_note, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            "#,
        )
        .bind(ticket.id.as_uuid())
        .bind(&ticket.holder.name)
        .bind(&ticket.holder.email)
        .bind(&ticket.holder.phone)
        .bind(ticket.team.as_ref().map(|t| t.name.clone()))
        .bind(ticket.team.as_ref().map(|t| t.members.clone()))
        .bind(category_to_string(ticket.category))
        .bind(moderation_to_string(ticket.moderation))
        .bind(verification_to_string(ticket.verification))
        .bind(&ticket.moderation_note)
        .bind(ticket.created_at.as_datetime())
        .bind(ticket.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("Failed to insert ticket", e))?;

        Ok(())
    }

    async fn find_by_id(&self, id: TicketId) -> Result<Option<Ticket>, DomainError> {
        let row: Option<TicketRow> = sqlx::query_as(&format!(
            "SELECT {} FROM tickets WHERE id = $1",
            SELECT_COLUMNS
        ))
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("Failed to find ticket", e))?;

        row.map(Ticket::try_from).transpose()
    }

    async fn set_moderation(
        &self,
        id: TicketId,
        expected: ModerationState,
        target: ModerationState,
        note: Option<&str>,
    ) -> Result<TransitionOutcome<Ticket>, DomainError> {
        let row: Option<TicketRow> = sqlx::query_as(&format!(
            r#"
            UPDATE tickets
            SET moderation = $3, moderation_note = $4, updated_at = NOW()
            WHERE id = $1 AND moderation = $2
            RETURNING {}
            "#,
            SELECT_COLUMNS
        ))
        .bind(id.as_uuid())
        .bind(moderation_to_string(expected))
        .bind(moderation_to_string(target))
        .bind(note)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("Failed to update ticket moderation", e))?;

        match row {
            Some(row) => Ok(TransitionOutcome::Applied(Ticket::try_from(row)?)),
            None => Ok(TransitionOutcome::Conflict),
        }
    }

    async fn set_verified(&self, id: TicketId) -> Result<TransitionOutcome<Ticket>, DomainError> {
        let row: Option<TicketRow> = sqlx::query_as(&format!(
            r#"
            UPDATE tickets
            SET verification = 'verified', updated_at = NOW()
            WHERE id = $1 AND verification = 'unverified'
            RETURNING {}
            "#,
            SELECT_COLUMNS
        ))
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("Failed to verify ticket", e))?;

        match row {
            Some(row) => Ok(TransitionOutcome::Applied(Ticket::try_from(row)?)),
            None => Ok(TransitionOutcome::Conflict),
        }
    }
}

fn verification_to_string(state: VerificationState) -> &'static str {
    match state {
        VerificationState::Unverified => "unverified",
        VerificationState::Verified => "verified",
    }
}
