use async_trait::async_trait;

use crate::domain::foundation::DomainError;

/// An outbound email, already rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub to: String,
    pub subject: String,
    pub html_body: String,
}

/// Contract for delivering notifications to the email provider.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    /// Sends one notification.
    ///
    /// # Errors
    ///
    /// Returns `DomainError` if delivery fails. Callers decide whether
    /// the triggering operation is rolled back (activation email) or
    /// merely logged (courtesy notifications).
    async fn send(&self, notification: &Notification) -> Result<(), DomainError>;
}
