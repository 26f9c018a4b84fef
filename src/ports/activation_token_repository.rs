use async_trait::async_trait;

use crate::domain::activation::ActivationToken;
use crate::domain::foundation::{DomainError, Timestamp};

/// Result of an atomic consume attempt.
///
/// The store classifies every losing path so callers can report the
/// precise reason without a second read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsumeOutcome {
    /// This caller consumed the token.
    Consumed(ActivationToken),
    /// The token was consumed before this call, by this or another request.
    AlreadyConsumed,
    /// The token's expiry passed before it was consumed.
    Expired,
    /// No token with that value exists.
    NotFound,
}

/// Storage contract for single-use activation tokens.
#[async_trait]
pub trait ActivationTokenRepository: Send + Sync {
    /// Persists a freshly issued token.
    ///
    /// # Errors
    ///
    /// Returns `DomainError` if the write fails.
    async fn insert(&self, token: &ActivationToken) -> Result<(), DomainError>;

    /// Looks a token up by its opaque value.
    ///
    /// # Errors
    ///
    /// Returns `DomainError` if the query fails.
    async fn find_by_token(&self, token: &str) -> Result<Option<ActivationToken>, DomainError>;

    /// Atomically consumes a token: a single conditional write that
    /// succeeds only for an unconsumed, unexpired token. Under
    /// concurrent calls with the same value exactly one caller
    /// receives `Consumed`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError` if the store is unreachable; all
    /// business-level failures arrive as `ConsumeOutcome` variants.
    async fn consume(&self, token: &str, now: Timestamp) -> Result<ConsumeOutcome, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trait_is_object_safe() {
        fn _assert(_: &dyn ActivationTokenRepository) {}
    }
}
