//! ApproveSubmissionHandler - records an admin approval verdict.

use std::sync::Arc;

use crate::application::handlers::signals::{SignalDispatcher, Signals};
use crate::domain::foundation::{AdminId, SubmissionId};
use crate::domain::ticket::{Feedback, ModerationError, ModerationState, Submission, SubmissionState};
use crate::ports::{Notification, SubmissionRepository, TicketRepository, TransitionOutcome};

/// Command to approve a pending submission. Feedback is optional.
#[derive(Debug, Clone)]
pub struct ApproveSubmissionCommand {
    pub admin: AdminId,
    pub submission_id: SubmissionId,
    pub feedback: Option<String>,
}

/// Handler for submission approvals.
///
/// The verdict is a compare-and-set against the pending state; two
/// admins racing on the same submission produce exactly one verdict.
pub struct ApproveSubmissionHandler {
    submissions: Arc<dyn SubmissionRepository>,
    tickets: Arc<dyn TicketRepository>,
    signals: SignalDispatcher,
}

impl ApproveSubmissionHandler {
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
        cmd: ApproveSubmissionCommand,
    ) -> Result<Submission, ModerationError> {
        let feedback = Feedback::optional("feedback", cmd.feedback)?;

        let submission = self
            .submissions
            .find_by_id(cmd.submission_id)
            .await?
            .ok_or_else(|| ModerationError::submission_not_found(cmd.submission_id))?;

        if !submission.is_pending() {
            return Err(ModerationError::invalid_transition(
                format!("{:?}", submission.state),
                "approve",
            ));
        }

        let updated = match self
            .submissions
            .record_verdict(cmd.submission_id, SubmissionState::Approved, feedback.as_str())
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
                return Err(ModerationError::invalid_transition(current, "approve"));
            }
        };

        tracing::info!(
            admin = %cmd.admin,
            submission_id = %updated.id,
            ticket_id = %updated.ticket_id,
            "submission approved"
        );

        // The ticket moderation sub-state follows the verdict. A conflict
        // here means the ticket moved independently; the verdict stands.
        if let TransitionOutcome::Conflict = self
            .tickets
            .set_moderation(
                updated.ticket_id,
                ModerationState::Submitted,
                ModerationState::Approved,
                None,
            )
            .await?
        {
            tracing::warn!(
                ticket_id = %updated.ticket_id,
                "ticket moderation state did not follow submission approval"
            );
        }

        let mut signals = Signals::new();
        if let Some(ticket) = self.tickets.find_by_id(updated.ticket_id).await? {
            signals.invalidate(ticket.status_path());
            signals.notify(Notification {
                to: ticket.holder.email.clone(),
                subject: "Your submission was approved".to_string(),
                html_body: approval_body(updated.feedback.as_deref()),
            });
        }
        if !self.signals.dispatch(signals).await {
            tracing::warn!(
                submission_id = %updated.id,
                "side effects partially delivered after approval"
            );
        }

        Ok(updated)
    }
}

fn approval_body(feedback: Option<&str>) -> String {
    match feedback {
        Some(feedback) if !feedback.is_empty() => format!(
            "<p>Your submission was approved.</p><p>Reviewer notes: {}</p>",
            feedback
        ),
        _ => "<p>Your submission was approved.</p>".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::test_support::{
        InMemorySubmissions, InMemoryTickets, RecordingCache, RecordingSink,
    };
    use crate::domain::foundation::Timestamp;
    use crate::domain::ticket::{Holder, Ticket, TicketCategory};

    fn admin() -> AdminId {
        AdminId::new("admin-1").unwrap()
    }

    struct Fixture {
        submissions: Arc<InMemorySubmissions>,
        tickets: Arc<InMemoryTickets>,
        cache: Arc<RecordingCache>,
        sink: Arc<RecordingSink>,
        handler: ApproveSubmissionHandler,
        submission: Submission,
        ticket: Ticket,
    }

    fn fixture() -> Fixture {
        let now = Timestamp::now();
        let mut ticket = Ticket::register(
            Holder::new("Ada Lovelace", "ada@example.com", None).unwrap(),
            None,
            TicketCategory::CompetitionTrack,
            now,
        );
        ticket.enter_review(now).unwrap();
        let submission = Submission::create(ticket.id, "uploads/entry-1.pdf", now);

        let submissions = Arc::new(InMemorySubmissions::with_submission(submission.clone()));
        let tickets = Arc::new(InMemoryTickets::with_ticket(ticket.clone()));
        let cache = Arc::new(RecordingCache::new());
        let sink = Arc::new(RecordingSink::new());
        let handler = ApproveSubmissionHandler::new(
            submissions.clone(),
            tickets.clone(),
            SignalDispatcher::new(cache.clone(), sink.clone()),
        );

        Fixture {
            submissions,
            tickets,
            cache,
            sink,
            handler,
            submission,
            ticket,
        }
    }

    #[tokio::test]
    async fn approves_without_feedback() {
        let f = fixture();

        let updated = f
            .handler
            .handle(ApproveSubmissionCommand {
                admin: admin(),
                submission_id: f.submission.id,
                feedback: None,
            })
            .await
            .unwrap();

        assert_eq!(updated.state, SubmissionState::Approved);
        assert!(updated.feedback.is_none());
        assert_eq!(
            f.tickets.get(f.ticket.id).unwrap().moderation,
            ModerationState::Approved
        );
    }

    #[tokio::test]
    async fn approval_stores_optional_feedback_and_notifies() {
        let f = fixture();

        let updated = f
            .handler
            .handle(ApproveSubmissionCommand {
                admin: admin(),
                submission_id: f.submission.id,
                feedback: Some("Strong entry, well documented".to_string()),
            })
            .await
            .unwrap();

        assert_eq!(updated.feedback.as_deref(), Some("Strong entry, well documented"));
        let sent = f.sink.sent();
        assert_eq!(sent.len(), 1);
        assert!(sent[0].html_body.contains("Strong entry"));
        assert!(f.cache.invalidated().contains(&f.ticket.status_path()));
    }

    #[tokio::test]
    async fn second_verdict_is_rejected() {
        let f = fixture();
        let cmd = ApproveSubmissionCommand {
            admin: admin(),
            submission_id: f.submission.id,
            feedback: None,
        };

        f.handler.handle(cmd.clone()).await.unwrap();
        let result = f.handler.handle(cmd).await;

        assert!(matches!(
            result,
            Err(ModerationError::InvalidTransition { .. })
        ));
    }

    #[tokio::test]
    async fn unknown_submission_is_not_found() {
        let f = fixture();

        let result = f
            .handler
            .handle(ApproveSubmissionCommand {
                admin: admin(),
                submission_id: SubmissionId::new(),
                feedback: None,
            })
            .await;

        assert!(matches!(result, Err(ModerationError::SubmissionNotFound(_))));
    }

    #[tokio::test]
    async fn overlong_feedback_fails_before_storage() {
        let f = fixture();

        let result = f
            .handler
            .handle(ApproveSubmissionCommand {
                admin: admin(),
                submission_id: f.submission.id,
                feedback: Some("x".repeat(2000)),
            })
            .await;

        assert!(matches!(
            result,
            Err(ModerationError::ValidationFailed { ref field, .. }) if field == "feedback"
        ));
        assert!(f.submissions.get(f.submission.id).unwrap().is_pending());
    }
}
