//! Roadmap service: the caller's own history fed through the growth prompt.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{error, info};

use crate::domain::feedback_reads::{drain_query, map_repository_error};
use crate::domain::peer_review_service::IDENTITY_MISSING_MESSAGE;
use crate::domain::ports::{
    CompletionRequest, FeedbackQuery, FeedbackRepository, LanguageModel, RoadmapQuery,
};
use crate::domain::{
    CallerIdentity, DEFAULT_EMPLOYEE_NAME, Error, ROADMAP_MAX_TOKENS, ROADMAP_TEMPERATURE,
    Roadmap, RoadmapError, RoadmapHistory, RoadmapOutcome, hash_identity, parse_roadmap, roadmap_prompt,
};

/// Roadmap service implementing [`RoadmapQuery`].
#[derive(Clone)]
pub struct RoadmapService {
    repository: Arc<dyn FeedbackRepository>,
    model: Arc<dyn LanguageModel>,
}

impl RoadmapService {
    /// Create a new roadmap service.
    pub fn new(repository: Arc<dyn FeedbackRepository>, model: Arc<dyn LanguageModel>) -> Self {
        Self { repository, model }
    }

    async fn generate(
        &self,
        name: &str,
        history: &RoadmapHistory,
    ) -> Result<Roadmap, RoadmapError> {
        let request = CompletionRequest {
            prompt: roadmap_prompt(name, &history.window),
            max_tokens: ROADMAP_MAX_TOKENS,
            temperature: ROADMAP_TEMPERATURE,
        };
        let text = self.model.complete(&request).await?;
        parse_roadmap(&text)
    }
}

#[async_trait]
impl RoadmapQuery for RoadmapService {
    async fn roadmap_for(&self, caller: &CallerIdentity) -> Result<RoadmapOutcome, Error> {
        let email = caller
            .email()
            .ok_or_else(|| Error::invalid_request(IDENTITY_MISSING_MESSAGE))?;
        let name = caller.name().unwrap_or(DEFAULT_EMPLOYEE_NAME);

        let query = FeedbackQuery::by_submitter(hash_identity(email));
        let records = drain_query(self.repository.as_ref(), &query)
            .await
            .map_err(map_repository_error)?;
        let history = RoadmapHistory::from_records(records);

        if !history.has_enough_data() {
            return Ok(RoadmapOutcome::NotEnoughData {
                total_submissions: history.total_submissions,
            });
        }

        let roadmap = self.generate(name, &history).await.map_err(|err| {
            error!(error = %err, "roadmap generation failed");
            Error::internal(format!("roadmap generation failed: {err}"))
        })?;
        info!(
            analyzed = history.window.len(),
            total = history.total_submissions,
            "roadmap generated"
        );

        Ok(RoadmapOutcome::Generated {
            total_submissions: history.total_submissions,
            analyzed_submissions: history.window.len(),
            roadmap,
        })
    }
}

#[cfg(test)]
#[path = "roadmap_service_tests.rs"]
mod tests;
