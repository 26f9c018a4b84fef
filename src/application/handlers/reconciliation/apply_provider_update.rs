//! ApplyProviderUpdateHandler - reconciles a provider report against the ledger.

use std::sync::Arc;

use crate::application::handlers::signals::{SignalDispatcher, Signals};
use crate::domain::payment::{
    ProviderUpdate, ReconcileDecision, ReconciliationError, Transaction, TransactionStatus,
};
use crate::ports::{TicketRepository, TransactionRepository, TransitionOutcome};

/// Command carrying a verified, parsed provider update.
///
/// Signature verification happens at the HTTP boundary before this
/// command is built; by the time it reaches the handler the payload is
/// authentic.
#[derive(Debug, Clone)]
pub struct ApplyProviderUpdateCommand {
    pub update: ProviderUpdate,
}

/// Outcome of applying a provider update.
#[derive(Debug, Clone)]
pub enum ApplyProviderUpdateResult {
    /// The ledger entry transitioned.
    Applied {
        transaction: Transaction,
        /// True if this update flipped the ticket to verified.
        verified: bool,
        /// True if an amount mismatch forced the entry to `Failed`.
        mismatch: bool,
    },
    /// The report matches what the ledger already says. No-op.
    AlreadyApplied(Transaction),
    /// The report disagrees with a closed ledger entry. Discarded.
    Stale(Transaction),
}

/// Handler for provider payment updates.
///
/// Idempotent: replaying the same update returns `AlreadyApplied`.
/// Terminal ledger entries always win over later reports.
pub struct ApplyProviderUpdateHandler {
    transactions: Arc<dyn TransactionRepository>,
    tickets: Arc<dyn TicketRepository>,
    signals: SignalDispatcher,
}

impl ApplyProviderUpdateHandler {
    pub fn new(
        transactions: Arc<dyn TransactionRepository>,
        tickets: Arc<dyn TicketRepository>,
        signals: SignalDispatcher,
    ) -> Self {
        Self {
            transactions,
            tickets,
            signals,
        }
    }

    pub async fn handle(
        &self,
        cmd: ApplyProviderUpdateCommand,
    ) -> Result<ApplyProviderUpdateResult, ReconciliationError> {
        let update = cmd.update;

        let reported = TransactionStatus::parse(&update.status).ok_or_else(|| {
            ReconciliationError::validation(
                "status",
                format!("'{}' is not a known payment status", update.status),
            )
        })?;

        let transaction = self
            .transactions
            .find_by_provider_ref(&update.reference)
            .await?
            .ok_or_else(|| ReconciliationError::unknown_reference(&update.reference))?;

        match transaction.reconcile(reported, update.amount) {
            ReconcileDecision::AlreadyApplied => {
                tracing::debug!(
                    provider_ref = %update.reference,
                    event_id = %update.event_id,
                    "duplicate provider report, already applied"
                );
                Ok(ApplyProviderUpdateResult::AlreadyApplied(transaction))
            }
            ReconcileDecision::Stale => {
                tracing::warn!(
                    provider_ref = %update.reference,
                    event_id = %update.event_id,
                    ledger_status = %transaction.status,
                    reported_status = %reported,
                    "stale provider report against closed ledger entry, discarded"
                );
                Ok(ApplyProviderUpdateResult::Stale(transaction))
            }
            ReconcileDecision::Apply { target, mismatch } => {
                if mismatch {
                    tracing::warn!(
                        provider_ref = %update.reference,
                        event_id = %update.event_id,
                        ledger_amount = transaction.amount,
                        reported_amount = update.amount,
                        "amount mismatch, forcing transaction to failed"
                    );
                }
                self.apply(transaction, target, mismatch).await
            }
        }
    }

    async fn apply(
        &self,
        transaction: Transaction,
        target: TransactionStatus,
        mismatch: bool,
    ) -> Result<ApplyProviderUpdateResult, ReconciliationError> {
        let settled = self
            .transactions
            .settle(transaction.id, transaction.status, target)
            .await?;

        let updated = match settled {
            TransitionOutcome::Applied(updated) => updated,
            TransitionOutcome::Conflict => {
                // A concurrent report settled this entry first. Re-read
                // and classify against the now-terminal ledger state.
                let refreshed = self
                    .transactions
                    .find_by_id(transaction.id)
                    .await?
                    .ok_or_else(|| {
                        ReconciliationError::unknown_reference(&transaction.provider_ref)
                    })?;
                return if refreshed.reconcile(target, refreshed.amount)
                    == ReconcileDecision::AlreadyApplied
                {
                    Ok(ApplyProviderUpdateResult::AlreadyApplied(refreshed))
                } else {
                    Ok(ApplyProviderUpdateResult::Stale(refreshed))
                };
            }
        };

        tracing::info!(
            transaction_id = %updated.id,
            provider_ref = %updated.provider_ref,
            status = %updated.status,
            "provider update applied"
        );

        let mut verified = false;
        let mut signals = Signals::new();
        signals.invalidate("/");

        match self.tickets.find_by_id(updated.ticket_id).await? {
            Some(ticket) => {
                signals.invalidate(ticket.status_path());

                if target == TransactionStatus::Success {
                    match self.tickets.set_verified(ticket.id).await? {
                        TransitionOutcome::Applied(_) => verified = true,
                        TransitionOutcome::Conflict => {
                            tracing::debug!(ticket_id = %ticket.id, "ticket already verified");
                        }
                    }
                }

                if let Some(notification) = payment_notification(&ticket.holder.email, target) {
                    signals.notify(notification);
                }
            }
            None => {
                // Ledger entry without a ticket row; the settle already
                // committed, so log for repair instead of failing.
                tracing::error!(
                    transaction_id = %updated.id,
                    ticket_id = %updated.ticket_id,
                    "settled transaction references a missing ticket"
                );
            }
        }

        if !self.signals.dispatch(signals).await {
            tracing::warn!(
                transaction_id = %updated.id,
                "side effects partially delivered after provider update"
            );
        }

        Ok(ApplyProviderUpdateResult::Applied {
            transaction: updated,
            verified,
            mismatch,
        })
    }
}

fn payment_notification(
    to: &str,
    target: TransactionStatus,
) -> Option<crate::ports::Notification> {
    let (subject, html_body) = match target {
        TransactionStatus::Success => (
            "Your registration is confirmed",
            "<p>Your payment was received and your ticket is confirmed.</p>",
        ),
        TransactionStatus::Failed => (
            "Your payment did not go through",
            "<p>Your payment could not be completed. Please try again.</p>",
        ),
        _ => return None,
    };
    Some(crate::ports::Notification {
        to: to.to_string(),
        subject: subject.to_string(),
        html_body: html_body.to_string(),
    })
}
