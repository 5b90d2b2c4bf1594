//! Peer reviews received by the caller.
//!
//! ```text
//! GET /my-reviews
//! ```

use actix_web::{get, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::ports::PeerReview;
use crate::domain::{Error, Sentiment};
use crate::inbound::http::ApiResult;
use crate::inbound::http::identity::Claims;
use crate::inbound::http::state::HttpState;

/// One peer review; carries nothing that identifies its author.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReviewDto {
    /// Record identifier.
    #[schema(value_type = String, format = Uuid)]
    pub feedback_id: Uuid,
    /// When the review was written.
    pub timestamp: DateTime<Utc>,
    /// Sentiment, once enriched.
    pub sentiment: Option<Sentiment>,
    /// Summary, once enriched.
    pub summary: Option<String>,
    /// Topics, empty until enriched.
    pub topics: Vec<String>,
}

impl From<PeerReview> for ReviewDto {
    fn from(review: PeerReview) -> Self {
        Self {
            feedback_id: *review.feedback_id.as_uuid(),
            timestamp: review.created_at,
            sentiment: review.sentiment,
            summary: review.summary,
            topics: review.topics,
        }
    }
}

/// Response body for `GET /my-reviews`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReviewsResponse {
    /// Reviews, newest first.
    pub reviews: Vec<ReviewDto>,
    /// Number of reviews.
    pub total_reviews: usize,
}

/// List peer reviews whose target is the caller, newest first.
#[utoipa::path(
    get,
    path = "/my-reviews",
    params(
        ("X-Claim-Email" = String, Header, description = "Caller email"),
    ),
    responses(
        (status = 200, description = "Peer reviews about the caller", body = ReviewsResponse),
        (status = 400, description = "Caller email missing", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["reviews"],
    operation_id = "listMyReviews"
)]
#[get("/my-reviews")]
pub async fn list_my_reviews(
    state: web::Data<HttpState>,
    claims: Claims,
) -> ApiResult<web::Json<ReviewsResponse>> {
    let reviews: Vec<ReviewDto> = state
        .reviews
        .reviews_for(&claims.into_inner())
        .await?
        .into_iter()
        .map(ReviewDto::from)
        .collect();
    Ok(web::Json(ReviewsResponse {
        total_reviews: reviews.len(),
        reviews,
    }))
}
