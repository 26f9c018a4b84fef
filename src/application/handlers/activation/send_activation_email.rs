//! SendActivationEmailHandler - renders and dispatches the activation mail.

use std::sync::Arc;

use crate::domain::activation::ActivationError;
use crate::ports::{Notification, NotificationSink};

/// Command to send an activation email carrying a token link.
#[derive(Debug, Clone)]
pub struct SendActivationEmailCommand {
    pub to: String,
    pub name: String,
    pub token: String,
}

/// Handler that renders the activation mail and hands it to the sink.
///
/// Delivery failure never invalidates the token; the caller reports it
/// and the user can request a resend (which issues a fresh token).
pub struct SendActivationEmailHandler {
    sink: Arc<dyn NotificationSink>,
    activation_base_url: String,
}

impl SendActivationEmailHandler {
    pub fn new(sink: Arc<dyn NotificationSink>, activation_base_url: impl Into<String>) -> Self {
        Self {
            sink,
            activation_base_url: activation_base_url.into(),
        }
    }

    pub async fn handle(&self, cmd: SendActivationEmailCommand) -> Result<(), ActivationError> {
        if !cmd.to.contains('@') {
            return Err(ActivationError::validation("to", "not an email address"));
        }

        let link = format!(
            "{}/activate?token={}",
            self.activation_base_url.trim_end_matches('/'),
            cmd.token
        );
        let notification = Notification {
            to: cmd.to.clone(),
            subject: "Activate your account".to_string(),
            html_body: format!(
                "<p>Hi {},</p><p>Activate your account by following \
                 <a href=\"{}\">this link</a>. The link is valid once.</p>",
                cmd.name, link
            ),
        };

        self.sink
            .send(&notification)
            .await
            .map_err(|e| ActivationError::infrastructure(e.to_string()))?;

        tracing::info!(to = %cmd.to, "activation email dispatched");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::test_support::RecordingSink;

    fn cmd() -> SendActivationEmailCommand {
        SendActivationEmailCommand {
            to: "ada@example.com".to_string(),
            name: "Ada".to_string(),
            token: "tok123".to_string(),
        }
    }

    #[tokio::test]
    async fn renders_link_with_base_url_and_token() {
        let sink = Arc::new(RecordingSink::new());
        let handler = SendActivationEmailHandler::new(sink.clone(), "https://conf.example/");

        handler.handle(cmd()).await.unwrap();

        let sent = sink.sent();
        assert_eq!(sent.len(), 1);
        assert!(sent[0]
            .html_body
            .contains("https://conf.example/activate?token=tok123"));
    }

    #[tokio::test]
    async fn sink_failure_surfaces_as_infrastructure_error() {
        let handler =
            SendActivationEmailHandler::new(Arc::new(RecordingSink::failing()), "https://conf.example");

        let result = handler.handle(cmd()).await;

        assert!(matches!(result, Err(ActivationError::Infrastructure(_))));
    }

    #[tokio::test]
    async fn implausible_recipient_fails_validation() {
        let sink = Arc::new(RecordingSink::new());
        let handler = SendActivationEmailHandler::new(sink.clone(), "https://conf.example");

        let result = handler
            .handle(SendActivationEmailCommand {
                to: "not-an-address".to_string(),
                name: "Ada".to_string(),
                token: "tok123".to_string(),
            })
            .await;

        assert!(matches!(result, Err(ActivationError::ValidationFailed { .. })));
        assert!(sink.sent().is_empty());
    }
}
