//! Ticket aggregate - a participant's registration record.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{StateMachine, TicketId, Timestamp, ValidationError};

use super::{Feedback, ModerationState, VerificationState};

/// Who holds the ticket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Holder {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
}

impl Holder {
    /// Creates a holder, validating the identifying fields.
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        phone: Option<String>,
    ) -> Result<Self, ValidationError> {
        let name = name.into();
        let email = email.into();
        if name.trim().is_empty() {
            return Err(ValidationError::empty_field("name"));
        }
        if !email.contains('@') {
            return Err(ValidationError::invalid_format("email", "missing @ symbol"));
        }
        Ok(Self { name, email, phone })
    }
}

/// Team metadata for team-based categories.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub name: String,
    pub members: Vec<String>,
}

/// Which event track the ticket admits to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketCategory {
    GeneralAdmission,
    CompetitionTrack,
    TeamCompetition,
}

/// A participant's registration for an event track.
///
/// Linked to the transaction ledger by id; carries the moderation
/// sub-state and the payment-driven verification flag. Tickets are never
/// physically deleted; rejections are retained for audit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticket {
    pub id: TicketId,
    pub holder: Holder,
    pub team: Option<Team>,
    pub category: TicketCategory,
    pub moderation: ModerationState,
    pub verification: VerificationState,
    /// Reason or feedback attached to the latest moderation verdict.
    pub moderation_note: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Ticket {
    /// Creates a new ticket at registration intake.
    pub fn register(
        holder: Holder,
        team: Option<Team>,
        category: TicketCategory,
        now: Timestamp,
    ) -> Self {
        Self {
            id: TicketId::new(),
            holder,
            team,
            category,
            moderation: ModerationState::None,
            verification: VerificationState::Unverified,
            moderation_note: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Public status page for this ticket, used as a cache target.
    pub fn status_path(&self) -> String {
        format!("/tickets/{}", self.id)
    }

    /// Marks the ticket as having a submission under review.
    pub fn enter_review(&mut self, now: Timestamp) -> Result<(), ValidationError> {
        self.moderation = self.moderation.transition_to(ModerationState::Submitted)?;
        self.updated_at = now;
        Ok(())
    }

    /// Records the admin approval verdict.
    pub fn approve(&mut self, now: Timestamp) -> Result<(), ValidationError> {
        self.moderation = self.moderation.transition_to(ModerationState::Approved)?;
        self.updated_at = now;
        Ok(())
    }

    /// Records the admin rejection verdict with its mandatory reason.
    pub fn reject(&mut self, reason: Feedback, now: Timestamp) -> Result<(), ValidationError> {
        self.moderation = self.moderation.transition_to(ModerationState::Rejected)?;
        self.moderation_note = Some(reason.into_string());
        self.updated_at = now;
        Ok(())
    }

    /// Flips the verification flag after the linked transaction succeeded.
    ///
    /// Idempotent by construction of the state machine: a second call
    /// fails, and callers treat that as already-verified.
    pub fn verify(&mut self, now: Timestamp) -> Result<(), ValidationError> {
        self.verification = self.verification.transition_to(VerificationState::Verified)?;
        self.updated_at = now;
        Ok(())
    }

    /// Returns true if the payment-driven verification flag is set.
    pub fn is_verified(&self) -> bool {
        self.verification == VerificationState::Verified
    }
}
