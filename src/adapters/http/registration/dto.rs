//! HTTP DTOs for the registration and moderation endpoints.

use serde::{Deserialize, Serialize};

use crate::domain::ticket::{Submission, Ticket};

// Request DTOs

/// Body for `POST /api/submissions/{id}/approve`.
#[derive(Debug, Clone, Deserialize)]
pub struct ApproveSubmissionRequest {
    #[serde(default)]
    pub feedback: Option<String>,
}

/// Body for `POST /api/submissions/{id}/reject`.
#[derive(Debug, Clone, Deserialize)]
pub struct RejectSubmissionRequest {
    pub feedback: String,
}

/// Body for `POST /api/registrations/{id}/reject`.
#[derive(Debug, Clone, Deserialize)]
pub struct RejectRegistrationRequest {
    pub reason: String,
}

/// Query for `GET /api/activation/test`.
#[derive(Debug, Clone, Deserialize)]
pub struct ActivationTestQuery {
    pub to: String,
}

// Response DTOs

/// Envelope for the admission count.
#[derive(Debug, Clone, Serialize)]
pub struct CountResponse {
    pub message: String,
    pub data: CountData,
}

#[derive(Debug, Clone, Serialize)]
pub struct CountData {
    pub count: u64,
}

/// Submission state after a moderation verdict.
#[derive(Debug, Clone, Serialize)]
pub struct SubmissionResponse {
    pub id: String,
    pub ticket_id: String,
    pub state: String,
    pub feedback: Option<String>,
}

impl From<Submission> for SubmissionResponse {
    fn from(submission: Submission) -> Self {
        Self {
            id: submission.id.to_string(),
            ticket_id: submission.ticket_id.to_string(),
            state: format!("{:?}", submission.state).to_lowercase(),
            feedback: submission.feedback,
        }
    }
}

/// Ticket state after a registration-level verdict.
#[derive(Debug, Clone, Serialize)]
pub struct TicketResponse {
    pub id: String,
    pub moderation: String,
    pub verified: bool,
    pub moderation_note: Option<String>,
}

impl From<Ticket> for TicketResponse {
    fn from(ticket: Ticket) -> Self {
        Self {
            id: ticket.id.to_string(),
            moderation: format!("{:?}", ticket.moderation).to_lowercase(),
            verified: ticket.is_verified(),
            moderation_note: ticket.moderation_note,
        }
    }
}

/// Acknowledgement for the payment webhook.
#[derive(Debug, Clone, Serialize)]
pub struct WebhookAckResponse {
    pub received: bool,
    /// `applied`, `already_applied` or `stale`.
    pub outcome: String,
}

/// Response for the activation test endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct ActivationTestResponse {
    pub message: String,
}

/// Standard error envelope.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
        }
    }
}
