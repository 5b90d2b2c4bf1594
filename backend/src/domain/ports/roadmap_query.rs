//! Driving port for the caller's growth roadmap.

use async_trait::async_trait;

use crate::domain::{CallerIdentity, Error, RoadmapOutcome};

/// Driving port for generating a personal roadmap.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RoadmapQuery: Send + Sync {
    /// Generate a roadmap from the caller's own feedback history.
    ///
    /// # Errors
    ///
    /// Returns `InvalidRequest` when the caller has no email claim and
    /// `InternalError` when the store read or the model call fails.
    async fn roadmap_for(&self, caller: &CallerIdentity) -> Result<RoadmapOutcome, Error>;
}

/// Fixture implementation that never has enough data.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureRoadmapQuery;

#[async_trait]
impl RoadmapQuery for FixtureRoadmapQuery {
    async fn roadmap_for(&self, _caller: &CallerIdentity) -> Result<RoadmapOutcome, Error> {
        Ok(RoadmapOutcome::NotEnoughData {
            total_submissions: 0,
        })
    }
}
