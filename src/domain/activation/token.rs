//! ActivationToken entity - single-use email activation credential.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::foundation::{ActivationTokenId, Timestamp};

use super::ActivationError;

/// A single-use token proving control of an email address.
///
/// Valid only while unconsumed and before expiry. Consumption must be an
/// atomic check-and-set against the store; `mark_consumed` validates the
/// in-memory view and the repository re-checks with a conditional update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivationToken {
    pub id: ActivationTokenId,
    /// Unguessable token string handed to the user.
    pub token: String,
    /// Identity the token activates (from the identity provider).
    pub identity_id: String,
    pub expires_at: Timestamp,
    pub consumed_at: Option<Timestamp>,
    pub created_at: Timestamp,
}

impl ActivationToken {
    /// Issues a fresh unconsumed token with the given TTL.
    pub fn issue(identity_id: impl Into<String>, ttl_hours: i64, now: Timestamp) -> Self {
        Self {
            id: ActivationTokenId::new(),
            token: Self::generate_token(),
            identity_id: identity_id.into(),
            expires_at: now.add_hours(ttl_hours),
            consumed_at: None,
            created_at: now,
        }
    }

    /// Generates an unguessable token string (256 bits of UUIDv4 output).
    fn generate_token() -> String {
        format!("{}{}", Uuid::new_v4().simple(), Uuid::new_v4().simple())
    }

    /// Returns true if the expiry window has passed.
    pub fn is_expired(&self, now: Timestamp) -> bool {
        now.is_after(&self.expires_at)
    }

    /// Returns true if the token was already used.
    pub fn is_consumed(&self) -> bool {
        self.consumed_at.is_some()
    }

    /// Consumes the token, enforcing the single-use and expiry rules.
    ///
    /// Expiry is checked before consumption so a token that is both
    /// expired and consumed reports `Expired`.
    pub fn mark_consumed(&mut self, now: Timestamp) -> Result<(), ActivationError> {
        if self.is_expired(now) {
            return Err(ActivationError::Expired);
        }
        if self.is_consumed() {
            return Err(ActivationError::AlreadyConsumed);
        }
        self.consumed_at = Some(now);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issued_token_is_valid_and_unconsumed() {
        let now = Timestamp::now();
        let token = ActivationToken::issue("user-1", 24, now);
        assert!(!token.is_expired(now));
        assert!(!token.is_consumed());
        assert_eq!(token.identity_id, "user-1");
    }

    #[test]
    fn token_strings_are_long_and_unique() {
        let now = Timestamp::now();
        let a = ActivationToken::issue("user-1", 24, now);
        let b = ActivationToken::issue("user-1", 24, now);
        assert_eq!(a.token.len(), 64);
        assert_ne!(a.token, b.token);
    }

    #[test]
    fn consume_succeeds_once_then_conflicts() {
        let now = Timestamp::now();
        let mut token = ActivationToken::issue("user-1", 24, now);
        token.mark_consumed(now).unwrap();
        assert!(token.is_consumed());
        assert_eq!(token.mark_consumed(now), Err(ActivationError::AlreadyConsumed));
    }

    #[test]
    fn consume_fails_after_expiry() {
        let now = Timestamp::now();
        let mut token = ActivationToken::issue("user-1", 24, now);
        let later = now.add_hours(25);
        assert!(token.is_expired(later));
        assert_eq!(token.mark_consumed(later), Err(ActivationError::Expired));
        assert!(!token.is_consumed());
    }

    #[test]
    fn expiry_wins_over_consumed_in_reporting() {
        let now = Timestamp::now();
        let mut token = ActivationToken::issue("user-1", 1, now);
        token.mark_consumed(now).unwrap();
        let later = now.add_hours(2);
        assert_eq!(token.mark_consumed(later), Err(ActivationError::Expired));
    }
}
