//! Axum router configuration for the revalidation endpoint.

use axum::{routing::post, Router};

use super::handlers::{revalidate, RevalidationAppState};

/// Create the revalidation router, suitable for mounting at `/api`.
///
/// # Routes
/// - `POST /revalidate` - Invalidate cached pages (secret protected)
pub fn revalidation_router() -> Router<RevalidationAppState> {
    Router::new().route("/revalidate", post(revalidate))
}
