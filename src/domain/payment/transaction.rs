//! Transaction aggregate - one payment attempt in the ledger.
//!
//! A transaction is created `Pending` when a registration records a payment
//! attempt, and settles exactly once into a terminal state. The
//! reconciliation policy for provider reports lives here as a pure
//! function of ledger state plus input, so duplicate and out-of-order
//! webhooks are decided without touching storage.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::foundation::{StateMachine, TicketId, Timestamp, TransactionId, ValidationError};

use super::TransactionStatus;

/// One payment attempt tied to a ticket.
///
/// Source of truth for payment status. The ticket holds a non-owning
/// reference back; only the reconciliation handlers mutate this record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TransactionId,
    pub ticket_id: TicketId,
    pub status: TransactionStatus,
    /// Amount in minor currency units.
    pub amount: i64,
    /// Opaque reference shared with the payment provider.
    pub provider_ref: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Outcome of matching a provider report against the ledger entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileDecision {
    /// Transition the transaction to `target`. `mismatch` marks an
    /// amount disagreement that forced `Failed`.
    Apply {
        target: TransactionStatus,
        mismatch: bool,
    },
    /// The report matches what the ledger already says. No-op.
    AlreadyApplied,
    /// The ledger entry is closed and the report disagrees with it.
    /// The report is stale, not authoritative. Discard.
    Stale,
}

impl Transaction {
    /// Creates a new pending transaction for a payment attempt.
    pub fn record(ticket_id: TicketId, amount: i64, now: Timestamp) -> Self {
        Self {
            id: TransactionId::new(),
            ticket_id,
            status: TransactionStatus::Pending,
            amount,
            provider_ref: Self::new_provider_ref(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Mints an opaque provider reference for a new attempt.
    pub fn new_provider_ref() -> String {
        format!("tx_{}", Uuid::new_v4().simple())
    }

    /// Returns true while the transaction has not settled.
    pub fn is_open(&self) -> bool {
        !self.status.is_terminal()
    }

    /// Settles the transaction into a terminal state.
    ///
    /// Fails if the current state is already terminal or the target is
    /// not reachable. Persistence must re-check the expected current
    /// state with a conditional update; this method only validates the
    /// in-memory view.
    pub fn settle(&mut self, target: TransactionStatus, now: Timestamp) -> Result<(), ValidationError> {
        self.status = self.status.transition_to(target)?;
        self.updated_at = now;
        Ok(())
    }

    /// Decides how a provider report applies to this ledger entry.
    ///
    /// Terminal entries win over any later report; an amount mismatch on
    /// an open entry forces `Failed` regardless of the reported status.
    pub fn reconcile(&self, reported: TransactionStatus, reported_amount: i64) -> ReconcileDecision {
        if self.status.is_terminal() {
            if reported == self.status && reported_amount == self.amount {
                return ReconcileDecision::AlreadyApplied;
            }
            return ReconcileDecision::Stale;
        }

        if reported_amount != self.amount {
            return ReconcileDecision::Apply {
                target: TransactionStatus::Failed,
                mismatch: true,
            };
        }

        if reported == TransactionStatus::Pending {
            return ReconcileDecision::AlreadyApplied;
        }

        ReconcileDecision::Apply {
            target: reported,
            mismatch: false,
        }
    }
}
