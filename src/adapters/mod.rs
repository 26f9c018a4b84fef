//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `postgres` - sqlx-backed repositories
//! - `cache` - Redis page-cache invalidation
//! - `email` - Resend notification delivery
//! - `http` - Axum REST endpoints

pub mod cache;
pub mod email;
pub mod http;
pub mod postgres;

pub use cache::RedisCacheInvalidator;
pub use email::{ResendConfig, ResendNotificationSink};
