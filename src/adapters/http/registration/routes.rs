//! Axum router configuration for the registration endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{
    activation_test, approve_submission, count_registrations, handle_payment_webhook,
    reject_registration, reject_submission, RegistrationAppState,
};

/// Create the registration API router.
///
/// # Routes
///
/// ## Public Endpoints
/// - `GET /registrations/count` - Current admission headcount
///
/// ## Admin Endpoints (require `X-Admin-Id`)
/// - `POST /registrations/:id/reject` - Reject a registration outright
/// - `POST /submissions/:id/approve` - Approve a pending submission
/// - `POST /submissions/:id/reject` - Reject a pending submission
///
/// ## Diagnostics
/// - `GET /activation/test` - Send a test activation mail
pub fn registration_routes() -> Router<RegistrationAppState> {
    Router::new()
        .route("/registrations/count", get(count_registrations))
        .route("/registrations/:id/reject", post(reject_registration))
        .route("/submissions/:id/approve", post(approve_submission))
        .route("/submissions/:id/reject", post(reject_submission))
        .route("/activation/test", get(activation_test))
}

/// Create the payment webhook router.
///
/// Separate from the main routes because the provider callback carries
/// no admin identity; it is authenticated by its HMAC signature instead.
pub fn webhook_routes() -> Router<RegistrationAppState> {
    Router::new().route("/payment", post(handle_payment_webhook))
}

/// Create the complete registration module router, suitable for
/// mounting at `/api`.
pub fn registration_router() -> Router<RegistrationAppState> {
    Router::new()
        .merge(registration_routes())
        .nest("/webhooks", webhook_routes())
}
