//! Command and query handlers, one file per operation.

pub mod activation;
pub mod admission;
pub mod moderation;
pub mod reconciliation;
pub mod revalidation;
pub mod signals;

#[cfg(test)]
pub(crate) mod test_support;

pub use signals::{SignalDispatcher, Signals};
