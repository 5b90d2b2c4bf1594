//! Feedback submission handler.
//!
//! ```text
//! POST /feedback {"message":"More pairing please","targetName":"Grace","targetEmail":"grace@example.com"}
//! ```

use actix_web::{HttpResponse, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::ports::SubmitFeedbackResponse;
use crate::domain::{Error, FeedbackSubmission};
use crate::inbound::http::ApiResult;
use crate::inbound::http::identity::Claims;
use crate::inbound::http::state::HttpState;

/// Request body for `POST /feedback`.
///
/// `name` and `email` are read only when the development identity fallback
/// is enabled and the claims lack them.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackRequest {
    /// Free-text feedback; contact details are redacted before storage.
    #[schema(example = "Standups run long; could we timebox them?")]
    pub message: Option<String>,
    /// Peer-review target display name.
    pub target_name: Option<String>,
    /// Peer-review target email.
    pub target_email: Option<String>,
    /// Development-only submitter name.
    pub name: Option<String>,
    /// Development-only submitter email.
    pub email: Option<String>,
}

/// Response body for a stored submission.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackCreatedResponse {
    /// Identifier of the stored record.
    #[schema(value_type = String, format = Uuid)]
    pub feedback_id: Uuid,
    /// Whether the record was stored as a peer review.
    pub is_peer_review: bool,
}

impl From<SubmitFeedbackResponse> for FeedbackCreatedResponse {
    fn from(value: SubmitFeedbackResponse) -> Self {
        Self {
            feedback_id: *value.feedback_id.as_uuid(),
            is_peer_review: value.is_peer_review,
        }
    }
}

/// Store feedback, optionally as a peer review.
///
/// Enrichment happens after the record is stored and never changes the
/// response.
#[utoipa::path(
    post,
    path = "/feedback",
    request_body = FeedbackRequest,
    params(
        ("X-Claim-Name" = Option<String>, Header, description = "Submitter display name"),
        ("X-Claim-Email" = Option<String>, Header, description = "Submitter email"),
        ("X-Claim-Department" = Option<String>, Header, description = "Submitter department"),
    ),
    responses(
        (status = 201, description = "Feedback stored", body = FeedbackCreatedResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["feedback"],
    operation_id = "submitFeedback"
)]
#[post("/feedback")]
pub async fn submit_feedback(
    state: web::Data<HttpState>,
    claims: Claims,
    payload: web::Json<FeedbackRequest>,
) -> ApiResult<HttpResponse> {
    let FeedbackRequest {
        message,
        target_name,
        target_email,
        name,
        email,
    } = payload.into_inner();

    let mut caller = claims.into_inner();
    if state.allow_body_identity {
        caller = caller.with_fallback(name, email);
    }
    let submission = FeedbackSubmission {
        caller,
        message,
        target_name,
        target_email,
    };

    let stored = state.feedback.submit(submission).await?;
    Ok(HttpResponse::Created().json(FeedbackCreatedResponse::from(stored)))
}
