//! Activation token handlers.

mod consume_token;
mod issue_token;
mod send_activation_email;

pub use consume_token::{ConsumeTokenCommand, ConsumeTokenHandler};
pub use issue_token::{IssueTokenCommand, IssueTokenHandler};
pub use send_activation_email::{SendActivationEmailCommand, SendActivationEmailHandler};
