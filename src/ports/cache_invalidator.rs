use async_trait::async_trait;

use crate::domain::foundation::DomainError;

/// Contract for dropping cached render output for a site path.
#[async_trait]
pub trait CacheInvalidator: Send + Sync {
    /// Invalidates the cached output for one path (e.g. `/tickets/abc`).
    ///
    /// # Errors
    ///
    /// Returns `DomainError` if the cache backend fails. Callers treat
    /// this as non-fatal: the source of truth has already been updated.
    async fn invalidate(&self, path: &str) -> Result<(), DomainError>;
}
