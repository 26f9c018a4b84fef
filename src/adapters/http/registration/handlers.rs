//! HTTP handlers for the registration, moderation and webhook endpoints.

use std::sync::Arc;

use axum::extract::{Json, Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use uuid::Uuid;

use crate::application::handlers::activation::{
    IssueTokenCommand, IssueTokenHandler, SendActivationEmailCommand, SendActivationEmailHandler,
};
use crate::application::handlers::admission::{CountAdmissionsHandler, CountAdmissionsQuery};
use crate::application::handlers::moderation::{
    ApproveSubmissionCommand, ApproveSubmissionHandler, RejectRegistrationCommand,
    RejectRegistrationHandler, RejectSubmissionCommand, RejectSubmissionHandler,
};
use crate::application::handlers::reconciliation::{
    ApplyProviderUpdateCommand, ApplyProviderUpdateHandler, ApplyProviderUpdateResult,
};
use crate::application::handlers::SignalDispatcher;
use crate::domain::activation::ActivationError;
use crate::domain::foundation::{AdminId, ErrorCode, SubmissionId, TicketId};
use crate::domain::payment::{ReconciliationError, WebhookError, WebhookVerifier};
use crate::domain::ticket::ModerationError;
use crate::ports::{
    ActivationTokenRepository, AdmissionReader, CacheInvalidator, NotificationSink,
    SubmissionRepository, TicketRepository, TransactionRepository,
};

use super::dto::{
    ActivationTestQuery, ActivationTestResponse, ApproveSubmissionRequest, CountData,
    CountResponse, ErrorResponse, RejectRegistrationRequest, RejectSubmissionRequest,
    SubmissionResponse, TicketResponse, WebhookAckResponse,
};

/// Signature header sent by the payment provider on each callback.
const SIGNATURE_HEADER: &str = "X-Payment-Signature";

/// Shared state for the registration API, cloned per request.
#[derive(Clone)]
pub struct RegistrationAppState {
    pub tickets: Arc<dyn TicketRepository>,
    pub transactions: Arc<dyn TransactionRepository>,
    pub submissions: Arc<dyn SubmissionRepository>,
    pub admissions: Arc<dyn AdmissionReader>,
    pub activation_tokens: Arc<dyn ActivationTokenRepository>,
    pub cache: Arc<dyn CacheInvalidator>,
    pub notifications: Arc<dyn NotificationSink>,
    pub webhook_verifier: Arc<WebhookVerifier>,
    pub activation_ttl_hours: i64,
    pub activation_base_url: String,
}

impl RegistrationAppState {
    fn dispatcher(&self) -> SignalDispatcher {
        SignalDispatcher::new(self.cache.clone(), self.notifications.clone())
    }

    pub fn count_handler(&self) -> CountAdmissionsHandler {
        CountAdmissionsHandler::new(self.admissions.clone())
    }

    pub fn apply_provider_update_handler(&self) -> ApplyProviderUpdateHandler {
        ApplyProviderUpdateHandler::new(
            self.transactions.clone(),
            self.tickets.clone(),
            self.dispatcher(),
        )
    }

    pub fn approve_submission_handler(&self) -> ApproveSubmissionHandler {
        ApproveSubmissionHandler::new(
            self.submissions.clone(),
            self.tickets.clone(),
            self.dispatcher(),
        )
    }

    pub fn reject_submission_handler(&self) -> RejectSubmissionHandler {
        RejectSubmissionHandler::new(
            self.submissions.clone(),
            self.tickets.clone(),
            self.dispatcher(),
        )
    }

    pub fn reject_registration_handler(&self) -> RejectRegistrationHandler {
        RejectRegistrationHandler::new(self.tickets.clone(), self.dispatcher())
    }

    pub fn issue_token_handler(&self) -> IssueTokenHandler {
        IssueTokenHandler::new(self.activation_tokens.clone(), self.activation_ttl_hours)
    }

    pub fn send_activation_email_handler(&self) -> SendActivationEmailHandler {
        SendActivationEmailHandler::new(
            self.notifications.clone(),
            self.activation_base_url.clone(),
        )
    }
}

/// Admin identity extracted from the identity-provider header.
///
/// Authentication itself is an external collaborator; by the time a
/// request reaches this service the gateway has already validated the
/// session and forwarded the admin id.
#[derive(Debug, Clone)]
pub struct AdminContext {
    pub admin: AdminId,
}

pub struct AdminRequired;

impl IntoResponse for AdminRequired {
    fn into_response(self) -> axum::response::Response {
        let error = ErrorResponse::new("UNAUTHORIZED", "Admin identity is required");
        (StatusCode::UNAUTHORIZED, Json(error)).into_response()
    }
}

impl<S> axum::extract::FromRequestParts<S> for AdminContext
where
    S: Send + Sync,
{
    type Rejection = AdminRequired;

    fn from_request_parts<'life0, 'life1, 'async_trait>(
        parts: &'life0 mut axum::http::request::Parts,
        _state: &'life1 S,
    ) -> std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self, Self::Rejection>> + Send + 'async_trait>,
    >
    where
        'life0: 'async_trait,
        'life1: 'async_trait,
        Self: 'async_trait,
    {
        Box::pin(async move {
            let admin = parts
                .headers
                .get("X-Admin-Id")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| AdminId::new(s).ok())
                .ok_or(AdminRequired)?;

            Ok(AdminContext { admin })
        })
    }
}

/// GET /api/registrations/count - current admission headcount
pub async fn count_registrations(
    State(state): State<RegistrationAppState>,
) -> Result<impl IntoResponse, ApiError> {
    let count = state
        .count_handler()
        .handle(CountAdmissionsQuery::default())
        .await?;

    Ok(Json(CountResponse {
        message: "Registration count retrieved".to_string(),
        data: CountData { count },
    }))
}

/// POST /api/submissions/{id}/approve
pub async fn approve_submission(
    State(state): State<RegistrationAppState>,
    admin: AdminContext,
    Path(id): Path<Uuid>,
    Json(request): Json<ApproveSubmissionRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let submission = state
        .approve_submission_handler()
        .handle(ApproveSubmissionCommand {
            admin: admin.admin,
            submission_id: SubmissionId::from_uuid(id),
            feedback: request.feedback,
        })
        .await?;

    Ok(Json(SubmissionResponse::from(submission)))
}

/// POST /api/submissions/{id}/reject
pub async fn reject_submission(
    State(state): State<RegistrationAppState>,
    admin: AdminContext,
    Path(id): Path<Uuid>,
    Json(request): Json<RejectSubmissionRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let submission = state
        .reject_submission_handler()
        .handle(RejectSubmissionCommand {
            admin: admin.admin,
            submission_id: SubmissionId::from_uuid(id),
            feedback: request.feedback,
        })
        .await?;

    Ok(Json(SubmissionResponse::from(submission)))
}

/// POST /api/registrations/{id}/reject
pub async fn reject_registration(
    State(state): State<RegistrationAppState>,
    admin: AdminContext,
    Path(id): Path<Uuid>,
    Json(request): Json<RejectRegistrationRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let ticket = state
        .reject_registration_handler()
        .handle(RejectRegistrationCommand {
            admin: admin.admin,
            ticket_id: TicketId::from_uuid(id),
            reason: request.reason,
        })
        .await?;

    Ok(Json(TicketResponse::from(ticket)))
}

/// POST /api/webhooks/payment - provider callback, signature verified
pub async fn handle_payment_webhook(
    State(state): State<RegistrationAppState>,
    headers: axum::http::HeaderMap,
    body: axum::body::Bytes,
) -> Result<impl IntoResponse, ApiError> {
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| {
            ApiError::new(
                ErrorCode::Unauthorized,
                format!("Missing {} header", SIGNATURE_HEADER),
            )
        })?;

    let update = state.webhook_verifier.verify_and_parse(&body, signature)?;

    let result = state
        .apply_provider_update_handler()
        .handle(ApplyProviderUpdateCommand { update })
        .await?;

    let outcome = match result {
        ApplyProviderUpdateResult::Applied { .. } => "applied",
        ApplyProviderUpdateResult::AlreadyApplied(_) => "already_applied",
        ApplyProviderUpdateResult::Stale(_) => "stale",
    };

    Ok(Json(WebhookAckResponse {
        received: true,
        outcome: outcome.to_string(),
    }))
}

/// Token value used by the diagnostics send. Never persisted, so the
/// activation link in the test mail is inert.
const DIAGNOSTICS_TOKEN: &str = "diagnostics-send-check";

/// GET /api/activation/test - diagnostics-only activation send
///
/// Exercises the mail rendering and delivery path without touching the
/// token store; the real activation flow issues its tokens elsewhere.
pub async fn activation_test(
    State(state): State<RegistrationAppState>,
    Query(query): Query<ActivationTestQuery>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .send_activation_email_handler()
        .handle(SendActivationEmailCommand {
            to: query.to.clone(),
            name: "there".to_string(),
            token: DIAGNOSTICS_TOKEN.to_string(),
        })
        .await?;

    Ok(Json(ActivationTestResponse {
        message: format!("Activation email sent to {}", query.to),
    }))
}

/// API error type converting domain errors into HTTP responses.
///
/// Human-readable messages only; diagnostics stay in the tracing logs.
#[derive(Debug)]
pub struct ApiError {
    code: ErrorCode,
    message: String,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl From<ReconciliationError> for ApiError {
    fn from(err: ReconciliationError) -> Self {
        Self::new(err.code(), err.message())
    }
}

impl From<ModerationError> for ApiError {
    fn from(err: ModerationError) -> Self {
        Self::new(err.code(), err.message())
    }
}

impl From<ActivationError> for ApiError {
    fn from(err: ActivationError) -> Self {
        Self::new(err.code(), err.message())
    }
}

impl From<WebhookError> for ApiError {
    fn from(err: WebhookError) -> Self {
        match err {
            WebhookError::ParseError(_) => Self::new(ErrorCode::ValidationFailed, err.to_string()),
            _ => Self::new(ErrorCode::Unauthorized, err.to_string()),
        }
    }
}

pub(crate) fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::ValidationFailed | ErrorCode::EmptyField | ErrorCode::InvalidFormat => {
            StatusCode::BAD_REQUEST
        }
        ErrorCode::TicketNotFound
        | ErrorCode::TransactionNotFound
        | ErrorCode::SubmissionNotFound
        | ErrorCode::TokenNotFound => StatusCode::NOT_FOUND,
        ErrorCode::InvalidStateTransition
        | ErrorCode::DuplicateActive
        | ErrorCode::AlreadyConsumed => StatusCode::CONFLICT,
        ErrorCode::TokenExpired => StatusCode::GONE,
        ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
        ErrorCode::Forbidden => StatusCode::FORBIDDEN,
        ErrorCode::DatabaseError
        | ErrorCode::CacheError
        | ErrorCode::NotificationError
        | ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = status_for(self.code);
        if status.is_server_error() {
            tracing::error!(code = %self.code, message = %self.message, "request failed");
        }
        let body = ErrorResponse::new(self.code.to_string(), self.message);
        (status, Json(body)).into_response()
    }
}
