//! Driving port for reading peer reviews about the caller.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{CallerIdentity, Error, FeedbackId, FeedbackRecord, Sentiment};

/// A peer review stripped of every submitter- and target-identifying field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeerReview {
    /// Record identifier.
    pub feedback_id: FeedbackId,
    /// Write timestamp.
    pub created_at: DateTime<Utc>,
    /// Sentiment, once enriched.
    pub sentiment: Option<Sentiment>,
    /// Summary, once enriched.
    pub summary: Option<String>,
    /// Topics, empty until enriched.
    pub topics: Vec<String>,
}

impl From<&FeedbackRecord> for PeerReview {
    fn from(record: &FeedbackRecord) -> Self {
        Self {
            feedback_id: record.id(),
            created_at: record.created_at(),
            sentiment: record.sentiment(),
            summary: record.summary().map(str::to_owned),
            topics: record.topics().to_vec(),
        }
    }
}

/// Driving port for the caller's received peer reviews.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PeerReviewQuery: Send + Sync {
    /// Peer reviews whose target is the caller, newest first.
    ///
    /// # Errors
    ///
    /// Returns `InvalidRequest` when the caller has no email claim and
    /// `InternalError` when the store read fails.
    async fn reviews_for(&self, caller: &CallerIdentity) -> Result<Vec<PeerReview>, Error>;
}

/// Fixture implementation with no reviews.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixturePeerReviewQuery;

#[async_trait]
impl PeerReviewQuery for FixturePeerReviewQuery {
    async fn reviews_for(&self, _caller: &CallerIdentity) -> Result<Vec<PeerReview>, Error> {
        Ok(Vec::new())
    }
}
