//! Personal growth roadmap handler.
//!
//! ```text
//! GET /my-roadmap
//! ```

use actix_web::{get, web};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::{
    CurrentState, Error, FocusArea, GrowthPlan, NOT_ENOUGH_DATA_MESSAGE, RoadmapOutcome,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::identity::Claims;
use crate::inbound::http::state::HttpState;

/// Response body for `GET /my-roadmap`.
///
/// When `hasEnoughData` is false only `totalSubmissions` and `message`
/// accompany it; otherwise the roadmap sections sit at the top level.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RoadmapResponse {
    /// Whether a roadmap was generated.
    pub has_enough_data: bool,
    /// Self-submitted records for the caller.
    pub total_submissions: usize,
    /// Records fed to the model.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analyzed_submissions: Option<usize>,
    /// Explanation when no roadmap was generated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Where the employee stands today.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_state: Option<CurrentState>,
    /// Areas to prioritise.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub focus_areas: Option<Vec<FocusArea>>,
    /// Month-by-month growth plan.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan: Option<GrowthPlan>,
    /// Closing note from the model.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub encouragement: Option<String>,
}

impl From<RoadmapOutcome> for RoadmapResponse {
    fn from(outcome: RoadmapOutcome) -> Self {
        match outcome {
            RoadmapOutcome::NotEnoughData { total_submissions } => Self {
                has_enough_data: false,
                total_submissions,
                analyzed_submissions: None,
                message: Some(NOT_ENOUGH_DATA_MESSAGE.to_owned()),
                current_state: None,
                focus_areas: None,
                plan: None,
                encouragement: None,
            },
            RoadmapOutcome::Generated {
                total_submissions,
                analyzed_submissions,
                roadmap,
            } => Self {
                has_enough_data: true,
                total_submissions,
                analyzed_submissions: Some(analyzed_submissions),
                message: None,
                current_state: Some(roadmap.current_state),
                focus_areas: Some(roadmap.focus_areas),
                plan: Some(roadmap.plan),
                encouragement: Some(roadmap.encouragement),
            },
        }
    }
}

/// Generate a growth roadmap from the caller's own feedback history.
#[utoipa::path(
    get,
    path = "/my-roadmap",
    params(
        ("X-Claim-Email" = String, Header, description = "Caller email"),
        ("X-Claim-Name" = Option<String>, Header, description = "Caller display name"),
    ),
    responses(
        (status = 200, description = "Roadmap or not-enough-data notice", body = RoadmapResponse),
        (status = 400, description = "Caller email missing", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["roadmap"],
    operation_id = "getMyRoadmap"
)]
#[get("/my-roadmap")]
pub async fn get_my_roadmap(
    state: web::Data<HttpState>,
    claims: Claims,
) -> ApiResult<web::Json<RoadmapResponse>> {
    let outcome = state.roadmap.roadmap_for(&claims.into_inner()).await?;
    Ok(web::Json(RoadmapResponse::from(outcome)))
}
