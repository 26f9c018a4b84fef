//! Revalidation gateway configuration

use serde::Deserialize;

use super::error::ValidationError;

/// Configuration for the cache revalidation endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RevalidationConfig {
    /// Shared secret the content editor must present
    pub secret: String,
}

impl RevalidationConfig {
    /// Validate revalidation configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.secret.is_empty() {
            return Err(ValidationError::MissingRequired("REVALIDATION_SECRET"));
        }
        if self.secret.len() < 16 {
            return Err(ValidationError::RevalidationSecretTooShort);
        }
        Ok(())
    }
}
