//! Submission entity - reviewable content attached to a ticket.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{StateMachine, SubmissionId, TicketId, Timestamp, ValidationError};

use super::{Feedback, SubmissionState};

/// An abstract/paper under admin review for a competition track.
///
/// Terminal once approved or rejected. Re-submission after rejection
/// creates a new record for the same ticket; the rejected one stays for
/// audit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submission {
    pub id: SubmissionId,
    pub ticket_id: TicketId,
    /// Opaque reference to the submitted content (CMS/file storage).
    pub content_ref: String,
    /// Reviewer feedback recorded with the verdict.
    pub feedback: Option<String>,
    pub state: SubmissionState,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Submission {
    /// Creates a new pending submission for a ticket.
    pub fn create(ticket_id: TicketId, content_ref: impl Into<String>, now: Timestamp) -> Self {
        Self {
            id: SubmissionId::new(),
            ticket_id,
            content_ref: content_ref.into(),
            feedback: None,
            state: SubmissionState::Pending,
            created_at: now,
            updated_at: now,
        }
    }

    /// Records an approval verdict; feedback is optional.
    pub fn approve(&mut self, feedback: Feedback, now: Timestamp) -> Result<(), ValidationError> {
        self.state = self.state.transition_to(SubmissionState::Approved)?;
        self.feedback = Some(feedback.into_string());
        self.updated_at = now;
        Ok(())
    }

    /// Records a rejection verdict; feedback is mandatory and already
    /// validated by `Feedback::required`.
    pub fn reject(&mut self, feedback: Feedback, now: Timestamp) -> Result<(), ValidationError> {
        self.state = self.state.transition_to(SubmissionState::Rejected)?;
        self.feedback = Some(feedback.into_string());
        self.updated_at = now;
        Ok(())
    }

    /// Returns true while the submission awaits a verdict.
    pub fn is_pending(&self) -> bool {
        self.state == SubmissionState::Pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn submission() -> Submission {
        Submission::create(TicketId::new(), "cms://abstracts/42", Timestamp::now())
    }

    #[test]
    fn create_starts_pending_without_feedback() {
        let s = submission();
        assert!(s.is_pending());
        assert!(s.feedback.is_none());
    }

    #[test]
    fn approve_records_optional_feedback() {
        let mut s = submission();
        let fb = Feedback::optional("feedback", None).unwrap();
        s.approve(fb, Timestamp::now()).unwrap();
        assert_eq!(s.state, SubmissionState::Approved);
        assert_eq!(s.feedback.as_deref(), Some(""));
    }

    #[test]
    fn reject_records_mandatory_feedback() {
        let mut s = submission();
        let fb = Feedback::required("feedback", "Needs a clearer problem statement.").unwrap();
        s.reject(fb, Timestamp::now()).unwrap();
        assert_eq!(s.state, SubmissionState::Rejected);
        assert!(s.feedback.as_deref().unwrap().contains("problem statement"));
    }

    #[test]
    fn verdict_is_terminal() {
        let mut s = submission();
        let fb = Feedback::optional("feedback", None).unwrap();
        s.approve(fb, Timestamp::now()).unwrap();

        let late = Feedback::required("feedback", "changed my mind about this").unwrap();
        assert!(s.reject(late, Timestamp::now()).is_err());
        assert_eq!(s.state, SubmissionState::Approved);
    }
}
