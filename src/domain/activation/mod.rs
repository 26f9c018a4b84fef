//! Activation domain - single-use email activation tokens.

mod errors;
mod token;

pub use errors::ActivationError;
pub use token::ActivationToken;
