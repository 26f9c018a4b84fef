//! Payment provider configuration

use serde::Deserialize;

use super::error::ValidationError;

/// Payment provider configuration.
///
/// The provider authenticates its webhook callbacks with an HMAC
/// signature over the payload; `webhook_secret` is the shared signing
/// key.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PaymentConfig {
    /// Webhook signing secret shared with the provider
    pub webhook_secret: String,
}

impl PaymentConfig {
    /// Validate payment configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.webhook_secret.is_empty() {
            return Err(ValidationError::MissingRequired("PAYMENT_WEBHOOK_SECRET"));
        }
        // An HMAC key shorter than this is a misconfiguration, not a key.
        if self.webhook_secret.len() < 16 {
            return Err(ValidationError::WebhookSecretTooShort);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_rejects_missing_secret() {
        let config = PaymentConfig::default();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validation_rejects_short_secret() {
        let config = PaymentConfig {
            webhook_secret: "short".to_string(),
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn validation_accepts_real_secret() {
        let config = PaymentConfig {
            webhook_secret: "whsec_4f7a9c2e81b3d6f0".to_string(),
        };
        assert!(config.validate().is_ok());
    }
}
