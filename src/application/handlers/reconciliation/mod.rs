//! Payment reconciliation handlers.

mod apply_provider_update;
mod record_attempt;

pub use apply_provider_update::{
    ApplyProviderUpdateCommand, ApplyProviderUpdateHandler, ApplyProviderUpdateResult,
};
pub use record_attempt::{RecordAttemptCommand, RecordAttemptHandler};
