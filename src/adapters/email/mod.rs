//! Outbound email adapters.

mod resend_sink;

pub use resend_sink::{ResendConfig, ResendNotificationSink};
