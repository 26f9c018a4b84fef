//! HTTP adapter for the registration and moderation endpoints.
//!
//! Exposes the ticket lifecycle via REST:
//! - `GET /api/registrations/count` - Admission headcount
//! - `POST /api/registrations/:id/reject` - Reject a registration
//! - `POST /api/submissions/:id/approve` - Approve a submission
//! - `POST /api/submissions/:id/reject` - Reject a submission
//! - `POST /api/webhooks/payment` - Payment provider callback
//! - `GET /api/activation/test` - Activation mail diagnostics

pub mod dto;
pub mod handlers;
pub mod routes;

pub use handlers::{AdminContext, ApiError, RegistrationAppState};
pub use routes::registration_router;
