//! Account activation configuration

use serde::Deserialize;

use super::error::ValidationError;

/// Configuration for activation token issuance and the mail link.
#[derive(Debug, Clone, Deserialize)]
pub struct ActivationConfig {
    /// Hours an issued token remains valid
    #[serde(default = "default_ttl_hours")]
    pub ttl_hours: i64,

    /// Public base URL the activation link points at
    pub base_url: String,
}

impl ActivationConfig {
    /// Validate activation configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.ttl_hours <= 0 {
            return Err(ValidationError::InvalidActivationTtl);
        }
        if self.base_url.is_empty() {
            return Err(ValidationError::MissingRequired("ACTIVATION_BASE_URL"));
        }
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ValidationError::InvalidActivationBaseUrl);
        }
        Ok(())
    }
}

impl Default for ActivationConfig {
    fn default() -> Self {
        Self {
            ttl_hours: default_ttl_hours(),
            base_url: String::new(),
        }
    }
}

fn default_ttl_hours() -> i64 {
    24
}
