//! Payment domain - transaction ledger and provider reconciliation.

mod errors;
mod status;
mod transaction;
mod webhook;

pub use errors::ReconciliationError;
pub use status::TransactionStatus;
pub use transaction::{ReconcileDecision, Transaction};
pub use webhook::{ProviderUpdate, SignatureHeader, WebhookError, WebhookVerifier};

#[cfg(test)]
pub use webhook::compute_test_signature;
