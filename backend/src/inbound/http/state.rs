//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    FeedbackCommand, FixtureFeedbackCommand, FixtureInsightsQuery, FixturePeerReviewQuery,
    FixtureRoadmapQuery, InsightsQuery, PeerReviewQuery, RoadmapQuery,
};

/// Parameter object bundling all port implementations for HTTP handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub feedback: Arc<dyn FeedbackCommand>,
    pub insights: Arc<dyn InsightsQuery>,
    pub reviews: Arc<dyn PeerReviewQuery>,
    pub roadmap: Arc<dyn RoadmapQuery>,
}

impl Default for HttpStatePorts {
    fn default() -> Self {
        Self {
            feedback: Arc::new(FixtureFeedbackCommand),
            insights: Arc::new(FixtureInsightsQuery),
            reviews: Arc::new(FixturePeerReviewQuery),
            roadmap: Arc::new(FixtureRoadmapQuery),
        }
    }
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub feedback: Arc<dyn FeedbackCommand>,
    pub insights: Arc<dyn InsightsQuery>,
    pub reviews: Arc<dyn PeerReviewQuery>,
    pub roadmap: Arc<dyn RoadmapQuery>,
    /// Accept `name`/`email` from submission bodies when claims lack them.
    pub allow_body_identity: bool,
}

impl From<HttpStatePorts> for HttpState {
    fn from(ports: HttpStatePorts) -> Self {
        Self::new(ports)
    }
}

impl HttpState {
    /// Construct state from a ports bundle with the body identity fallback
    /// disabled.
    ///
    /// # Examples
    /// ```
    /// use backend::inbound::http::state::{HttpState, HttpStatePorts};
    ///
    /// let state = HttpState::new(HttpStatePorts::default());
    /// assert!(!state.allow_body_identity);
    /// ```
    pub fn new(ports: HttpStatePorts) -> Self {
        let HttpStatePorts {
            feedback,
            insights,
            reviews,
            roadmap,
        } = ports;
        Self {
            feedback,
            insights,
            reviews,
            roadmap,
            allow_body_identity: false,
        }
    }

    /// Toggle the development identity fallback.
    #[must_use]
    pub fn with_body_identity(mut self, allow: bool) -> Self {
        self.allow_body_identity = allow;
        self
    }
}
