//! ConsumeTokenHandler - redeems an activation token exactly once.

use std::sync::Arc;

use crate::domain::activation::ActivationError;
use crate::domain::foundation::Timestamp;
use crate::ports::{ActivationTokenRepository, ConsumeOutcome};

/// Command to consume a presented token string.
#[derive(Debug, Clone)]
pub struct ConsumeTokenCommand {
    pub token: String,
}

/// Handler that redeems tokens. Consumption is delegated to the store's
/// atomic check-and-set, so concurrent presentations of the same token
/// yield exactly one winner.
pub struct ConsumeTokenHandler {
    tokens: Arc<dyn ActivationTokenRepository>,
}

impl ConsumeTokenHandler {
    pub fn new(tokens: Arc<dyn ActivationTokenRepository>) -> Self {
        Self { tokens }
    }

    /// Returns the activated identity id on success.
    pub async fn handle(&self, cmd: ConsumeTokenCommand) -> Result<String, ActivationError> {
        match self.tokens.consume(&cmd.token, Timestamp::now()).await? {
            ConsumeOutcome::Consumed(token) => {
                tracing::info!(
                    token_id = %token.id,
                    identity_id = %token.identity_id,
                    "activation token consumed"
                );
                Ok(token.identity_id)
            }
            ConsumeOutcome::AlreadyConsumed => Err(ActivationError::AlreadyConsumed),
            ConsumeOutcome::Expired => Err(ActivationError::Expired),
            ConsumeOutcome::NotFound => Err(ActivationError::NotFound),
        }
    }
}
