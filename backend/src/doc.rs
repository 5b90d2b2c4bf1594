//! OpenAPI documentation configuration.
//!
//! This module defines the [`ApiDoc`] struct which generates the OpenAPI
//! specification for the REST API. It registers every feedback endpoint, the
//! health probes, and the gateway claim headers used to identify callers.
//!
//! The generated specification is used by Swagger UI (debug builds) and
//! exported via `cargo run --bin openapi-dump` for external tooling.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{
    CurrentState, DepartmentScore, Error, ErrorCode, FocusArea, GrowthPlan, MonthlyTrendEntry,
    Role, Sentiment, SentimentCounts, SummaryEntry, Trend,
};
use crate::inbound::http::feedback::{FeedbackCreatedResponse, FeedbackRequest};
use crate::inbound::http::insights::InsightsResponse;
use crate::inbound::http::reviews::{ReviewDto, ReviewsResponse};
use crate::inbound::http::roadmap::RoadmapResponse;

/// Document the gateway-issued email claim as the security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "GatewayClaims",
            SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::with_description(
                "X-Claim-Email",
                "Verified identity claims forwarded by the authenticating gateway.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
/// Swagger UI is enabled in debug builds only and used by tooling.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Anonymous feedback API",
        description = "Anonymous employee feedback with role-scoped insights, peer reviews, and growth roadmaps."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("GatewayClaims" = [])),
    paths(
        crate::inbound::http::feedback::submit_feedback,
        crate::inbound::http::insights::get_insights,
        crate::inbound::http::reviews::list_my_reviews,
        crate::inbound::http::roadmap::get_my_roadmap,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        FeedbackRequest,
        FeedbackCreatedResponse,
        InsightsResponse,
        SentimentCounts,
        SummaryEntry,
        MonthlyTrendEntry,
        DepartmentScore,
        Role,
        Sentiment,
        ReviewsResponse,
        ReviewDto,
        RoadmapResponse,
        CurrentState,
        FocusArea,
        GrowthPlan,
        Trend,
    )),
    tags(
        (name = "feedback", description = "Submitting feedback"),
        (name = "insights", description = "Role-scoped aggregate insights"),
        (name = "reviews", description = "Peer reviews about the caller"),
        (name = "roadmap", description = "Personal growth roadmap"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
