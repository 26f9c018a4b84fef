//! HTTP adapter for the cache revalidation gateway.
//!
//! - `POST /api/revalidate` - Invalidate cached pages after a content
//!   change, authenticated by a shared secret.

pub mod dto;
pub mod handlers;
pub mod routes;

pub use handlers::RevalidationAppState;
pub use routes::revalidation_router;
