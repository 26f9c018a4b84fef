//! Ticket lifecycle state machines.
//!
//! Three small machines govern a ticket: the moderation sub-state driven
//! by admins, the verification flag driven by payment reconciliation, and
//! the per-submission review state.

use crate::domain::foundation::StateMachine;
use serde::{Deserialize, Serialize};

/// Admin-facing moderation sub-state of a ticket.
///
/// `Submitted -> {Approved, Rejected}` happens at most once. Re-submission
/// after rejection creates a new Submission record, never a second pass
/// through this machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModerationState {
    /// Ticket has nothing under review.
    None,

    /// A submission is awaiting an admin verdict.
    Submitted,

    /// Admin approved the registration/submission. Terminal.
    Approved,

    /// Admin rejected. Terminal; the record stays for audit.
    Rejected,
}

impl StateMachine for ModerationState {
    fn can_transition_to(&self, target: &Self) -> bool {
        use ModerationState::*;
        matches!(
            (self, target),
            (None, Submitted)
                | (None, Rejected) // admin can reject a registration outright
                | (Submitted, Approved)
                | (Submitted, Rejected)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use ModerationState::*;
        match self {
            None => vec![Submitted, Rejected],
            Submitted => vec![Approved, Rejected],
            Approved | Rejected => vec![],
        }
    }
}

/// Per-ticket verification flag, flipped exactly once by a successful
/// payment. Unlocks gated content for the holder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationState {
    Unverified,
    Verified,
}

impl StateMachine for VerificationState {
    fn can_transition_to(&self, target: &Self) -> bool {
        matches!(
            (self, target),
            (VerificationState::Unverified, VerificationState::Verified)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        match self {
            VerificationState::Unverified => vec![VerificationState::Verified],
            VerificationState::Verified => vec![],
        }
    }
}

/// Review state of a submitted abstract/paper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionState {
    Pending,
    Approved,
    Rejected,
}

impl StateMachine for SubmissionState {
    fn can_transition_to(&self, target: &Self) -> bool {
        use SubmissionState::*;
        matches!((self, target), (Pending, Approved) | (Pending, Rejected))
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use SubmissionState::*;
        match self {
            Pending => vec![Approved, Rejected],
            Approved | Rejected => vec![],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Moderation sub-state

    #[test]
    fn moderation_none_can_enter_review() {
        assert!(ModerationState::None.can_transition_to(&ModerationState::Submitted));
    }

    #[test]
    fn moderation_none_can_be_rejected_outright() {
        let result = ModerationState::None.transition_to(ModerationState::Rejected);
        assert_eq!(result, Ok(ModerationState::Rejected));
    }

    #[test]
    fn moderation_none_cannot_skip_to_approved() {
        assert!(ModerationState::None
            .transition_to(ModerationState::Approved)
            .is_err());
    }

    #[test]
    fn moderation_verdict_happens_only_once() {
        let approved = ModerationState::Submitted
            .transition_to(ModerationState::Approved)
            .unwrap();
        assert!(approved.is_terminal());
        assert!(approved.transition_to(ModerationState::Rejected).is_err());
    }

    #[test]
    fn moderation_rejected_is_terminal() {
        assert!(ModerationState::Rejected.is_terminal());
    }

    // Verification flag

    #[test]
    fn verification_flips_once() {
        let verified = VerificationState::Unverified
            .transition_to(VerificationState::Verified)
            .unwrap();
        assert!(verified.is_terminal());
    }

    #[test]
    fn verification_cannot_be_revoked() {
        assert!(VerificationState::Verified
            .transition_to(VerificationState::Unverified)
            .is_err());
    }

    // Submission review state

    #[test]
    fn submission_pending_can_be_approved_or_rejected() {
        assert!(SubmissionState::Pending.can_transition_to(&SubmissionState::Approved));
        assert!(SubmissionState::Pending.can_transition_to(&SubmissionState::Rejected));
    }

    #[test]
    fn submission_verdicts_are_terminal() {
        assert!(SubmissionState::Approved.is_terminal());
        assert!(SubmissionState::Rejected.is_terminal());
    }

    #[test]
    fn machines_are_consistent_with_valid_transitions() {
        for state in [
            ModerationState::None,
            ModerationState::Submitted,
            ModerationState::Approved,
            ModerationState::Rejected,
        ] {
            for target in state.valid_transitions() {
                assert!(state.can_transition_to(&target));
            }
        }
    }
}
