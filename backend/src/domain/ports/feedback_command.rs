//! Driving port for feedback submission.

use async_trait::async_trait;

use crate::domain::{Error, FeedbackId, FeedbackSubmission};

/// Response from a successful submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmitFeedbackResponse {
    /// Identifier of the stored record.
    pub feedback_id: FeedbackId,
    /// Whether the record was stored as a peer review.
    pub is_peer_review: bool,
}

/// Driving port for storing new feedback.
///
/// Implementations validate, anonymise, and write the record; enrichment runs
/// afterwards and never affects the result.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FeedbackCommand: Send + Sync {
    /// Validate and store a submission.
    ///
    /// # Errors
    ///
    /// Returns [`Error`] with `InvalidRequest` for validation failures and
    /// `InternalError` when the store write fails.
    async fn submit(&self, submission: FeedbackSubmission)
    -> Result<SubmitFeedbackResponse, Error>;
}

/// Fixture implementation that accepts everything without storing it.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureFeedbackCommand;

#[async_trait]
impl FeedbackCommand for FixtureFeedbackCommand {
    async fn submit(
        &self,
        submission: FeedbackSubmission,
    ) -> Result<SubmitFeedbackResponse, Error> {
        let validated = submission.validate()?;
        Ok(SubmitFeedbackResponse {
            feedback_id: FeedbackId::random(),
            is_peer_review: validated.target.is_some(),
        })
    }
}
