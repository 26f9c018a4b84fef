//! RejectRegistrationHandler - rejects a whole registration.

use std::sync::Arc;

use crate::application::handlers::signals::{SignalDispatcher, Signals};
use crate::domain::foundation::{AdminId, StateMachine, TicketId};
use crate::domain::ticket::{Feedback, ModerationError, ModerationState, Ticket};
use crate::ports::{Notification, TicketRepository, TransitionOutcome};

/// Command to reject a registration outright, with a mandatory reason.
/// Works both before any submission exists and while one is under review.
#[derive(Debug, Clone)]
pub struct RejectRegistrationCommand {
    pub admin: AdminId,
    pub ticket_id: TicketId,
    pub reason: String,
}

pub struct RejectRegistrationHandler {
    tickets: Arc<dyn TicketRepository>,
    signals: SignalDispatcher,
}

impl RejectRegistrationHandler {
    pub fn new(tickets: Arc<dyn TicketRepository>, signals: SignalDispatcher) -> Self {
        Self { tickets, signals }
    }

    pub async fn handle(&self, cmd: RejectRegistrationCommand) -> Result<Ticket, ModerationError> {
        // Validated before any storage access.
        let reason = Feedback::required("reason", cmd.reason)?;

        let ticket = self
            .tickets
            .find_by_id(cmd.ticket_id)
            .await?
            .ok_or_else(|| ModerationError::ticket_not_found(cmd.ticket_id))?;

        if !ticket.moderation.can_transition_to(&ModerationState::Rejected) {
            return Err(ModerationError::invalid_transition(
                format!("{:?}", ticket.moderation),
                "reject",
            ));
        }

        let updated = match self
            .tickets
            .set_moderation(
                cmd.ticket_id,
                ticket.moderation,
                ModerationState::Rejected,
                Some(reason.as_str()),
            )
            .await?
        {
            TransitionOutcome::Applied(updated) => updated,
            TransitionOutcome::Conflict => {
                let current = self
                    .tickets
                    .find_by_id(cmd.ticket_id)
                    .await?
                    .map(|t| format!("{:?}", t.moderation))
                    .unwrap_or_else(|| "missing".to_string());
                return Err(ModerationError::invalid_transition(current, "reject"));
            }
        };

        tracing::info!(
            admin = %cmd.admin,
            ticket_id = %updated.id,
            "registration rejected"
        );

        let mut signals = Signals::new();
        signals.invalidate(updated.status_path());
        signals.notify(Notification {
            to: updated.holder.email.clone(),
            subject: "Your registration was not accepted".to_string(),
            html_body: format!(
                "<p>Your registration was not accepted.</p><p>Reason: {}</p>",
                reason.as_str()
            ),
        });
        if !self.signals.dispatch(signals).await {
            tracing::warn!(
                ticket_id = %updated.id,
                "side effects partially delivered after registration rejection"
            );
        }

        Ok(updated)
    }
}
