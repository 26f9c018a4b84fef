//! IssueTokenHandler - mints a single-use activation token.

use std::sync::Arc;

use crate::domain::activation::{ActivationError, ActivationToken};
use crate::domain::foundation::Timestamp;
use crate::ports::ActivationTokenRepository;

/// Command to issue an activation token for an identity.
#[derive(Debug, Clone)]
pub struct IssueTokenCommand {
    pub identity_id: String,
}

/// Handler that issues tokens. A resend is simply a re-issue: earlier
/// tokens stay valid until consumed or expired.
pub struct IssueTokenHandler {
    tokens: Arc<dyn ActivationTokenRepository>,
    ttl_hours: i64,
}

impl IssueTokenHandler {
    pub fn new(tokens: Arc<dyn ActivationTokenRepository>, ttl_hours: i64) -> Self {
        Self { tokens, ttl_hours }
    }

    pub async fn handle(&self, cmd: IssueTokenCommand) -> Result<ActivationToken, ActivationError> {
        if cmd.identity_id.trim().is_empty() {
            return Err(ActivationError::validation(
                "identity_id",
                "must not be empty",
            ));
        }

        let token = ActivationToken::issue(cmd.identity_id, self.ttl_hours, Timestamp::now());
        self.tokens.insert(&token).await?;

        tracing::info!(
            token_id = %token.id,
            identity_id = %token.identity_id,
            expires_at = %token.expires_at,
            "activation token issued"
        );

        Ok(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::test_support::InMemoryTokens;

    #[tokio::test]
    async fn issues_an_unconsumed_token_with_ttl() {
        let tokens = Arc::new(InMemoryTokens::new());
        let handler = IssueTokenHandler::new(tokens.clone(), 24);

        let token = handler
            .handle(IssueTokenCommand {
                identity_id: "user-1".to_string(),
            })
            .await
            .unwrap();

        assert!(!token.is_consumed());
        assert!(token.expires_at.is_after(&token.created_at));
        assert_eq!(tokens.all().len(), 1);
    }

    #[tokio::test]
    async fn reissue_leaves_earlier_tokens_valid() {
        let tokens = Arc::new(InMemoryTokens::new());
        let handler = IssueTokenHandler::new(tokens.clone(), 24);
        let cmd = IssueTokenCommand {
            identity_id: "user-1".to_string(),
        };

        let first = handler.handle(cmd.clone()).await.unwrap();
        let second = handler.handle(cmd).await.unwrap();

        assert_ne!(first.token, second.token);
        assert!(tokens.all().iter().all(|t| !t.is_consumed()));
    }

    #[tokio::test]
    async fn empty_identity_fails_before_storage() {
        let tokens = Arc::new(InMemoryTokens::new());
        let handler = IssueTokenHandler::new(tokens.clone(), 24);

        let result = handler
            .handle(IssueTokenCommand {
                identity_id: "  ".to_string(),
            })
            .await;

        assert!(matches!(
            result,
            Err(ActivationError::ValidationFailed { ref field, .. }) if field == "identity_id"
        ));
        assert!(tokens.all().is_empty());
    }
}
