//! Feedback submission service.
//!
//! Implements [`FeedbackCommand`]: validate, anonymise, write, then hand the
//! stored record to the enrichment pipeline. The write is the durability
//! boundary; nothing after it can fail the request.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::info;

use crate::domain::feedback_reads::map_repository_error;
use crate::domain::ports::{FeedbackCommand, FeedbackRepository, SubmitFeedbackResponse};
use crate::domain::{
    EnrichmentPipeline, Error, FeedbackId, FeedbackRecord, FeedbackRecordDraft,
    FeedbackSubmission, PeerTarget, SubmissionError, TraceId, ValidatedSubmission, redact_pii,
};

/// How the enrichment pipeline runs after a successful write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EnrichmentDispatch {
    /// Await the pipeline before responding.
    Inline,
    /// Spawn the pipeline on the runtime, carrying the request trace id.
    #[default]
    Detached,
}

/// Feedback service implementing the submission driving port.
#[derive(Clone)]
pub struct FeedbackService {
    repository: Arc<dyn FeedbackRepository>,
    pipeline: Option<EnrichmentPipeline>,
    clock: Arc<dyn Clock>,
    dispatch: EnrichmentDispatch,
}

impl FeedbackService {
    /// Create a service that stores feedback without enrichment.
    pub fn new(repository: Arc<dyn FeedbackRepository>, clock: Arc<dyn Clock>) -> Self {
        Self {
            repository,
            pipeline: None,
            clock,
            dispatch: EnrichmentDispatch::default(),
        }
    }

    /// Enrich stored records with `pipeline`.
    #[must_use]
    pub fn with_enrichment(
        mut self,
        pipeline: EnrichmentPipeline,
        dispatch: EnrichmentDispatch,
    ) -> Self {
        self.pipeline = Some(pipeline);
        self.dispatch = dispatch;
        self
    }

    fn build_record(&self, submission: ValidatedSubmission) -> Result<FeedbackRecord, Error> {
        let ValidatedSubmission {
            name,
            email,
            department,
            message,
            target,
        } = submission;
        let draft = FeedbackRecordDraft {
            id: FeedbackId::random(),
            submitter_name: name,
            submitter_handle: email.handle(),
            message: redact_pii(&message),
            department,
            target: target.map(|target| PeerTarget {
                handle: target.email.handle(),
                name: target.name,
            }),
            enrichment: None,
            created_at: self.clock.utc(),
        };
        FeedbackRecord::new(draft).map_err(|_| SubmissionError::SelfReview.into())
    }

    async fn dispatch_enrichment(&self, record: FeedbackRecord) {
        let Some(pipeline) = self.pipeline.clone() else {
            return;
        };
        match self.dispatch {
            EnrichmentDispatch::Inline => pipeline.run(record).await,
            EnrichmentDispatch::Detached => {
                tokio::spawn(TraceId::propagate(async move { pipeline.run(record).await }));
            }
        }
    }
}

#[async_trait]
impl FeedbackCommand for FeedbackService {
    async fn submit(
        &self,
        submission: FeedbackSubmission,
    ) -> Result<SubmitFeedbackResponse, Error> {
        let validated = submission.validate()?;
        let record = self.build_record(validated)?;

        self.repository
            .insert(&record)
            .await
            .map_err(map_repository_error)?;

        let response = SubmitFeedbackResponse {
            feedback_id: record.id(),
            is_peer_review: record.is_peer_review(),
        };
        info!(
            feedback_id = %response.feedback_id,
            is_peer_review = response.is_peer_review,
            "feedback stored"
        );

        self.dispatch_enrichment(record).await;
        Ok(response)
    }
}

#[cfg(test)]
#[path = "feedback_service_tests.rs"]
mod tests;
