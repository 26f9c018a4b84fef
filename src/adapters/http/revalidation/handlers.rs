//! HTTP handler for the cache revalidation gateway.

use std::sync::Arc;

use axum::extract::{Json, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use secrecy::SecretString;

use crate::application::handlers::revalidation::{
    RevalidateContentCommand, RevalidateContentHandler, RevalidationError,
};
use crate::domain::foundation::Timestamp;
use crate::ports::CacheInvalidator;

use super::super::registration::dto::ErrorResponse;
use super::dto::{RevalidateBody, RevalidateQuery, RevalidateResponse};

/// Shared state for the revalidation endpoint.
#[derive(Clone)]
pub struct RevalidationAppState {
    pub cache: Arc<dyn CacheInvalidator>,
    pub secret: SecretString,
}

impl RevalidationAppState {
    pub fn handler(&self) -> RevalidateContentHandler {
        RevalidateContentHandler::new(self.cache.clone(), self.secret.clone())
    }
}

/// POST /api/revalidate - invalidate cached pages on content change
pub async fn revalidate(
    State(state): State<RevalidationAppState>,
    Query(query): Query<RevalidateQuery>,
    body: Option<Json<RevalidateBody>>,
) -> Result<impl IntoResponse, RevalidationApiError> {
    let Json(body) = body.unwrap_or_default();

    let targets = state
        .handler()
        .handle(RevalidateContentCommand {
            secret: query.secret,
            path: query.path,
            page: body.page_to_revalidate,
            id: body.id_to_revalidate,
        })
        .await?;

    Ok(Json(RevalidateResponse {
        revalidated: true,
        now: Timestamp::now().as_datetime().timestamp_millis(),
        message: format!("Revalidated {}", targets.join(", ")),
    }))
}

/// Wrapper giving [`RevalidationError`] an HTTP representation.
#[derive(Debug)]
pub struct RevalidationApiError(RevalidationError);

impl From<RevalidationError> for RevalidationApiError {
    fn from(err: RevalidationError) -> Self {
        Self(err)
    }
}

impl IntoResponse for RevalidationApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, code) = match &self.0 {
            RevalidationError::Unauthorized => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            RevalidationError::ValidationFailed { .. } => {
                (StatusCode::BAD_REQUEST, "VALIDATION_FAILED")
            }
            RevalidationError::Failed(_) => (StatusCode::INTERNAL_SERVER_ERROR, "CACHE_ERROR"),
        };
        let body = ErrorResponse::new(code, self.0.to_string());
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unauthorized_maps_to_401() {
        let err = RevalidationApiError(RevalidationError::Unauthorized);
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn missing_target_maps_to_400() {
        let err = RevalidationApiError(RevalidationError::ValidationFailed {
            field: "pageToRevalidate".to_string(),
            message: "a page or path is required".to_string(),
        });
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn cache_failure_maps_to_500() {
        let err = RevalidationApiError(RevalidationError::Failed("/".to_string()));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
