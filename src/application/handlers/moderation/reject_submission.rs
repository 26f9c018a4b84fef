//! RejectSubmissionHandler - records an admin rejection verdict.

use std::sync::Arc;

use crate::application::handlers::signals::{SignalDispatcher, Signals};
use crate::domain::foundation::{AdminId, SubmissionId};
use crate::domain::ticket::{Feedback, ModerationError, ModerationState, Submission, SubmissionState};
use crate::ports::{Notification, SubmissionRepository, TicketRepository, TransitionOutcome};

/// Command to reject a pending submission. Feedback is mandatory so the
/// participant always learns why.
#[derive(Debug, Clone)]
pub struct RejectSubmissionCommand {
    pub admin: AdminId,
    pub submission_id: SubmissionId,
    pub feedback: String,
}

pub struct RejectSubmissionHandler {
    submissions: Arc<dyn SubmissionRepository>,
    tickets: Arc<dyn TicketRepository>,
    signals: SignalDispatcher,
}

impl RejectSubmissionHandler {
    pub fn new(
        submissions: Arc<dyn SubmissionRepository>,
        tickets: Arc<dyn TicketRepository>,
        signals: SignalDispatcher,
    ) -> Self {
        Self {
            submissions,
            tickets,
            signals,
        }
    }

    pub async fn handle(
        &self,
        cmd: RejectSubmissionCommand,
    ) -> Result<Submission, ModerationError> {
        // Validated before any storage access.
        let feedback = Feedback::required("feedback", cmd.feedback)?;

        let submission = self
            .submissions
            .find_by_id(cmd.submission_id)
            .await?
            .ok_or_else(|| ModerationError::submission_not_found(cmd.submission_id))?;

        if !submission.is_pending() {
            return Err(ModerationError::invalid_transition(
                format!("{:?}", submission.state),
                "reject",
            ));
        }

        let updated = match self
            .submissions
            .record_verdict(cmd.submission_id, SubmissionState::Rejected, feedback.as_str())
            .await?
        {
            TransitionOutcome::Applied(updated) => updated,
            TransitionOutcome::Conflict => {
                let current = self
                    .submissions
                    .find_by_id(cmd.submission_id)
                    .await?
                    .map(|s| format!("{:?}", s.state))
                    .unwrap_or_else(|| "missing".to_string());
                return Err(ModerationError::invalid_transition(current, "reject"));
            }
        };

        tracing::info!(
            admin = %cmd.admin,
            submission_id = %updated.id,
            ticket_id = %updated.ticket_id,
            "submission rejected"
        );

        if let TransitionOutcome::Conflict = self
            .tickets
            .set_moderation(
                updated.ticket_id,
                ModerationState::Submitted,
                ModerationState::Rejected,
                Some(feedback.as_str()),
            )
            .await?
        {
            tracing::warn!(
                ticket_id = %updated.ticket_id,
                "ticket moderation state did not follow submission rejection"
            );
        }

        let mut signals = Signals::new();
        if let Some(ticket) = self.tickets.find_by_id(updated.ticket_id).await? {
            signals.invalidate(ticket.status_path());
            signals.notify(Notification {
                to: ticket.holder.email.clone(),
                subject: "Your submission was not accepted".to_string(),
                html_body: format!(
                    "<p>Your submission was not accepted.</p><p>Reviewer feedback: {}</p>\
                     <p>You may submit a new entry.</p>",
                    feedback.as_str()
                ),
            });
        }
        if !self.signals.dispatch(signals).await {
            tracing::warn!(
                submission_id = %updated.id,
                "side effects partially delivered after rejection"
            );
        }

        Ok(updated)
    }
}
