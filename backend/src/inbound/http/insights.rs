//! Insight aggregation handler.
//!
//! ```text
//! GET /insights
//! ```

use std::collections::BTreeMap;

use actix_web::{get, web};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::{
    DepartmentScore, Error, InsightDetail, InsightReport, MINIMUM_GROUP_SIZE, MonthlyTrendEntry,
    Role, SentimentCounts, SummaryEntry,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::identity::Claims;
use crate::inbound::http::state::HttpState;

/// Response body for `GET /insights`.
///
/// The detail fields are omitted when the k-anonymity gate withholds them.
/// `departmentScores` is `null` for managers.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InsightsResponse {
    /// Whether the group was large enough to disclose detail.
    pub minimum_threshold_met: bool,
    /// Smallest group for which detail is disclosed.
    #[schema(example = 5)]
    pub minimum_group_size: usize,
    /// Self-submitted records in scope.
    pub total_submissions: usize,
    /// Caller role.
    pub role: Role,
    /// Department the report is restricted to.
    pub scoped_to_department: Option<String>,
    /// Sentiment tally of disclosed records.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sentiment_counts: Option<SentimentCounts>,
    /// Non-empty summaries in record order.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summaries: Option<Vec<SummaryEntry>>,
    /// Every topic across disclosed records.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub topics: Option<Vec<String>>,
    /// Per-month sentiment counts.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub monthly_trend: Option<Vec<MonthlyTrendEntry>>,
    /// Per-department scores; `null` for managers.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub department_scores: Option<Option<BTreeMap<String, DepartmentScore>>>,
}

impl From<InsightReport> for InsightsResponse {
    fn from(report: InsightReport) -> Self {
        let minimum_threshold_met = report.minimum_threshold_met();
        let InsightReport {
            scope,
            total_submissions,
            detail,
        } = report;
        let mut response = Self {
            minimum_threshold_met,
            minimum_group_size: MINIMUM_GROUP_SIZE,
            total_submissions,
            role: scope.role,
            scoped_to_department: scope.department,
            sentiment_counts: None,
            summaries: None,
            topics: None,
            monthly_trend: None,
            department_scores: None,
        };
        if let Some(InsightDetail {
            sentiment_counts,
            summaries,
            topics,
            monthly_trend,
            department_scores,
        }) = detail
        {
            response.sentiment_counts = Some(sentiment_counts);
            response.summaries = Some(summaries);
            response.topics = Some(topics);
            response.monthly_trend = Some(monthly_trend);
            response.department_scores = Some(department_scores);
        }
        response
    }
}

/// Read role-scoped sentiment insights.
///
/// Managers see their own department and only once it holds at least
/// five self-submitted records; HR and super admins see the whole
/// organisation with per-department scores.
#[utoipa::path(
    get,
    path = "/insights",
    params(
        ("X-Claim-Groups" = Option<String>, Header, description = "Comma-separated groups"),
        ("X-Claim-Department" = Option<String>, Header, description = "Caller department"),
    ),
    responses(
        (status = 200, description = "Insight report", body = InsightsResponse),
        (status = 403, description = "Forbidden", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["insights"],
    operation_id = "getInsights"
)]
#[get("/insights")]
pub async fn get_insights(
    state: web::Data<HttpState>,
    claims: Claims,
) -> ApiResult<web::Json<InsightsResponse>> {
    let report = state.insights.insights(&claims.into_inner()).await?;
    Ok(web::Json(InsightsResponse::from(report)))
}
