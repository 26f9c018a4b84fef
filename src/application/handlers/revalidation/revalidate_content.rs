//! RevalidateContentHandler - authenticated page-cache invalidation.

use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};
use subtle::ConstantTimeEq;
use thiserror::Error;

use crate::ports::CacheInvalidator;

/// Errors raised by the revalidation gateway.
#[derive(Debug, Error)]
pub enum RevalidationError {
    /// The presented secret does not match the configured token.
    #[error("invalid revalidation secret")]
    Unauthorized,

    /// The request names no usable target.
    #[error("validation failed for '{field}': {message}")]
    ValidationFailed { field: String, message: String },

    /// One or more targets could not be invalidated.
    #[error("revalidation failed: {0}")]
    Failed(String),
}

/// Command describing which rendered pages to invalidate.
///
/// `path` wins when present; otherwise `page` (optionally with `id`)
/// expands to one or two site paths. An empty `page` means the site root.
#[derive(Debug, Clone, Default)]
pub struct RevalidateContentCommand {
    pub secret: String,
    pub path: Option<String>,
    pub page: Option<String>,
    pub id: Option<String>,
}

/// Handler guarding the cache-invalidation gateway with a shared secret.
///
/// The secret comparison is constant-time. On mismatch nothing is
/// attempted. Targets are invalidated independently; a failing target
/// does not stop the others, and any failure surfaces as `Failed`.
pub struct RevalidateContentHandler {
    cache: Arc<dyn CacheInvalidator>,
    secret: SecretString,
}

impl RevalidateContentHandler {
    pub fn new(cache: Arc<dyn CacheInvalidator>, secret: SecretString) -> Self {
        Self { cache, secret }
    }

    /// Returns the list of invalidated paths.
    pub async fn handle(
        &self,
        cmd: RevalidateContentCommand,
    ) -> Result<Vec<String>, RevalidationError> {
        if !constant_time_eq(cmd.secret.as_bytes(), self.secret.expose_secret().as_bytes()) {
            tracing::warn!("revalidation request with invalid secret");
            return Err(RevalidationError::Unauthorized);
        }

        let targets = expand_targets(&cmd)?;

        let mut failures = Vec::new();
        for target in &targets {
            if let Err(e) = self.cache.invalidate(target).await {
                tracing::warn!(path = %target, error = %e, "revalidation target failed");
                failures.push(target.clone());
            }
        }

        if failures.is_empty() {
            tracing::info!(targets = ?targets, "revalidated");
            Ok(targets)
        } else {
            Err(RevalidationError::Failed(failures.join(", ")))
        }
    }
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    a.len() == b.len() && bool::from(a.ct_eq(b))
}

fn expand_targets(cmd: &RevalidateContentCommand) -> Result<Vec<String>, RevalidationError> {
    if let Some(path) = &cmd.path {
        if path.is_empty() {
            return Err(RevalidationError::ValidationFailed {
                field: "path".to_string(),
                message: "must not be empty".to_string(),
            });
        }
        return Ok(vec![path.clone()]);
    }

    match &cmd.page {
        Some(page) if page.is_empty() => Ok(vec!["/".to_string()]),
        Some(page) => {
            let mut targets = vec![format!("/{}", page)];
            if let Some(id) = &cmd.id {
                targets.push(format!("/{}/{}", page, id));
            }
            Ok(targets)
        }
        None => Err(RevalidationError::ValidationFailed {
            field: "page".to_string(),
            message: "either path or page is required".to_string(),
        }),
    }
}
