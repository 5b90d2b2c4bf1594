//! Peer-review reader: reviews about the caller, stripped of submitter data.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::feedback_reads::{drain_query, map_repository_error};
use crate::domain::ports::{FeedbackQuery, FeedbackRepository, PeerReview, PeerReviewQuery};
use crate::domain::{CallerIdentity, Error, hash_identity};

/// Message returned when the caller carries no email claim.
pub const IDENTITY_MISSING_MESSAGE: &str = "Could not identify user from token";

/// Peer-review service implementing [`PeerReviewQuery`].
#[derive(Clone)]
pub struct PeerReviewService {
    repository: Arc<dyn FeedbackRepository>,
}

impl PeerReviewService {
    /// Create a new peer-review service over `repository`.
    pub fn new(repository: Arc<dyn FeedbackRepository>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl PeerReviewQuery for PeerReviewService {
    async fn reviews_for(&self, caller: &CallerIdentity) -> Result<Vec<PeerReview>, Error> {
        let email = caller
            .email()
            .ok_or_else(|| Error::invalid_request(IDENTITY_MISSING_MESSAGE))?;
        let query = FeedbackQuery::by_target(hash_identity(email));
        let records = drain_query(self.repository.as_ref(), &query)
            .await
            .map_err(map_repository_error)?;
        Ok(records
            .iter()
            .filter(|record| record.is_peer_review())
            .map(PeerReview::from)
            .collect())
    }
}
