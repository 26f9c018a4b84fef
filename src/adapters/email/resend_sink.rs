//! Resend HTTP implementation of NotificationSink.

use std::time::Duration;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;

use crate::domain::foundation::{DomainError, ErrorCode};
use crate::ports::{Notification, NotificationSink};

const DEFAULT_API_BASE_URL: &str = "https://api.resend.com";
const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Resend API configuration.
#[derive(Clone)]
pub struct ResendConfig {
    api_key: SecretString,
    /// Sender address, e.g. `Conf <noreply@conf.example>`.
    from: String,
    api_base_url: String,
}

impl ResendConfig {
    pub fn new(api_key: impl Into<String>, from: impl Into<String>) -> Self {
        Self {
            api_key: SecretString::new(api_key.into()),
            from: from.into(),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
        }
    }

    /// Set a custom API base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }
}

/// Notification sink delivering mail through the Resend HTTP API.
///
/// Every call is bounded by the client timeout; a slow provider can
/// delay a response but never hang a handler.
pub struct ResendNotificationSink {
    config: ResendConfig,
    http_client: reqwest::Client,
}

#[derive(Serialize)]
struct SendEmailRequest<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: &'a str,
    html: &'a str,
}

impl ResendNotificationSink {
    pub fn new(config: ResendConfig) -> Result<Self, DomainError> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| {
                DomainError::new(
                    ErrorCode::NotificationError,
                    format!("Failed to build HTTP client: {}", e),
                )
            })?;

        Ok(Self {
            config,
            http_client,
        })
    }
}

#[async_trait]
impl NotificationSink for ResendNotificationSink {
    async fn send(&self, notification: &Notification) -> Result<(), DomainError> {
        let request = SendEmailRequest {
            from: &self.config.from,
            to: [notification.to.as_str()],
            subject: &notification.subject,
            html: &notification.html_body,
        };

        let response = self
            .http_client
            .post(format!("{}/emails", self.config.api_base_url))
            .bearer_auth(self.config.api_key.expose_secret())
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                DomainError::new(
                    ErrorCode::NotificationError,
                    format!("Email request failed: {}", e),
                )
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(status = %status, body = %body, "email provider rejected request");
            return Err(DomainError::new(
                ErrorCode::NotificationError,
                format!("Email provider returned {}", status),
            ));
        }

        Ok(())
    }
}

impl std::fmt::Debug for ResendNotificationSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResendNotificationSink")
            .field("from", &self.config.from)
            .field("api_base_url", &self.config.api_base_url)
            .finish_non_exhaustive()
    }
}
