//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driving ports (`FeedbackCommand`, `InsightsQuery`, `PeerReviewQuery`,
//! `RoadmapQuery`) are called by inbound adapters. Driven ports
//! (`FeedbackRepository`, `LanguageModel`, `FeedbackArchive`) are implemented
//! by outbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod feedback_archive;
mod feedback_command;
mod feedback_repository;
mod insights_query;
mod language_model;
mod peer_review_query;
mod roadmap_query;

#[cfg(test)]
pub use feedback_archive::MockFeedbackArchive;
pub use feedback_archive::{ArchiveObject, FeedbackArchive, FeedbackArchiveError};
#[cfg(test)]
pub use feedback_command::MockFeedbackCommand;
pub use feedback_command::{FeedbackCommand, FixtureFeedbackCommand, SubmitFeedbackResponse};
#[cfg(test)]
pub use feedback_repository::MockFeedbackRepository;
pub use feedback_repository::{
    EnrichmentWrite, FeedbackQuery, FeedbackRepository, FeedbackRepositoryError, FeedbackScope,
    FixtureFeedbackRepository, TimeOrder,
};
#[cfg(test)]
pub use insights_query::MockInsightsQuery;
pub use insights_query::{FixtureInsightsQuery, InsightsQuery};
#[cfg(test)]
pub use language_model::MockLanguageModel;
pub use language_model::{
    CompletionRequest, FixtureLanguageModel, LanguageModel, LanguageModelError,
};
#[cfg(test)]
pub use peer_review_query::MockPeerReviewQuery;
pub use peer_review_query::{FixturePeerReviewQuery, PeerReview, PeerReviewQuery};
#[cfg(test)]
pub use roadmap_query::MockRoadmapQuery;
pub use roadmap_query::{FixtureRoadmapQuery, RoadmapQuery};
