//! HTTP adapters - REST API implementations.
//!
//! Each domain module has its own HTTP adapter for endpoint exposure.

pub mod registration;
pub mod revalidation;

pub use registration::registration_router;
pub use registration::RegistrationAppState;
pub use revalidation::revalidation_router;
pub use revalidation::RevalidationAppState;
