use async_trait::async_trait;

use crate::domain::foundation::DomainError;
use crate::domain::payment::TransactionStatus;

/// Read-side contract for admission counting.
#[async_trait]
pub trait AdmissionReader: Send + Sync {
    /// Counts transactions whose status is in `statuses`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError` if the query fails.
    async fn count_by_status(&self, statuses: &[TransactionStatus]) -> Result<u64, DomainError>;
}
