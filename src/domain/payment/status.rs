//! Transaction status state machine.
//!
//! Defines the payment-ledger states and valid transitions. Transitions
//! are monotonic toward a terminal state; nothing leaves a terminal state.

use crate::domain::foundation::StateMachine;
use serde::{Deserialize, Serialize};

/// Status of one payment attempt in the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionStatus {
    /// Payment attempt created, awaiting the provider's verdict.
    Pending,

    /// Provider confirmed the payment. Terminal.
    Success,

    /// Provider reported the payment failed, or reconciliation forced
    /// failure on an amount mismatch. Terminal.
    Failed,

    /// Payment window elapsed without a provider verdict. Terminal.
    Expired,

    /// Participant or operator cancelled the attempt. Terminal.
    Cancelled,
}

impl TransactionStatus {
    /// Returns true if this status counts against event capacity.
    ///
    /// Pending is included: a live payment attempt reserves a seat until
    /// it resolves. See the admission counter for the policy discussion.
    pub fn counts_toward_admission(&self) -> bool {
        matches!(self, TransactionStatus::Pending | TransactionStatus::Success)
    }

    /// Parses a provider-reported status string.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(TransactionStatus::Pending),
            "success" => Some(TransactionStatus::Success),
            "failed" => Some(TransactionStatus::Failed),
            "expired" => Some(TransactionStatus::Expired),
            "cancelled" => Some(TransactionStatus::Cancelled),
            _ => None,
        }
    }

    /// Returns the canonical wire representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionStatus::Pending => "pending",
            TransactionStatus::Success => "success",
            TransactionStatus::Failed => "failed",
            TransactionStatus::Expired => "expired",
            TransactionStatus::Cancelled => "cancelled",
        }
    }
}

impl std::fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl StateMachine for TransactionStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        use TransactionStatus::*;
        matches!(
            (self, target),
            (Pending, Success) | (Pending, Failed) | (Pending, Expired) | (Pending, Cancelled)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use TransactionStatus::*;
        match self {
            Pending => vec![Success, Failed, Expired, Cancelled],
            Success | Failed | Expired | Cancelled => vec![],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const ALL: [TransactionStatus; 5] = [
        TransactionStatus::Pending,
        TransactionStatus::Success,
        TransactionStatus::Failed,
        TransactionStatus::Expired,
        TransactionStatus::Cancelled,
    ];

    #[test]
    fn pending_can_reach_every_terminal_state() {
        let pending = TransactionStatus::Pending;
        assert!(pending.can_transition_to(&TransactionStatus::Success));
        assert!(pending.can_transition_to(&TransactionStatus::Failed));
        assert!(pending.can_transition_to(&TransactionStatus::Expired));
        assert!(pending.can_transition_to(&TransactionStatus::Cancelled));
    }

    #[test]
    fn pending_cannot_stay_pending() {
        assert!(!TransactionStatus::Pending.can_transition_to(&TransactionStatus::Pending));
    }

    #[test]
    fn success_is_terminal() {
        assert!(TransactionStatus::Success.is_terminal());
        let result = TransactionStatus::Success.transition_to(TransactionStatus::Failed);
        assert!(result.is_err());
    }

    #[test]
    fn only_pending_is_non_terminal() {
        for status in ALL {
            assert_eq!(status.is_terminal(), status != TransactionStatus::Pending);
        }
    }

    #[test]
    fn pending_and_success_count_toward_admission() {
        assert!(TransactionStatus::Pending.counts_toward_admission());
        assert!(TransactionStatus::Success.counts_toward_admission());
        assert!(!TransactionStatus::Failed.counts_toward_admission());
        assert!(!TransactionStatus::Expired.counts_toward_admission());
        assert!(!TransactionStatus::Cancelled.counts_toward_admission());
    }

    #[test]
    fn parse_round_trips_canonical_strings() {
        for status in ALL {
            assert_eq!(TransactionStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(TransactionStatus::parse("refunded"), None);
    }

    proptest! {
        // Terminality: no pair of transitions escapes a terminal state.
        #[test]
        fn no_transition_leaves_a_terminal_state(from in 0usize..5, to in 0usize..5) {
            let from = ALL[from];
            let to = ALL[to];
            if from.is_terminal() {
                prop_assert!(from.transition_to(to).is_err());
            }
        }
    }
}
