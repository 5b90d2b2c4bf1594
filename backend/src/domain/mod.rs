//! Domain primitives, algorithms, and services.
//!
//! Purpose: define the anonymised feedback model, the role and k-anonymity
//! rules that govern reads, and the services behind each driving port. Keep
//! types immutable and document invariants and serialisation contracts
//! (serde) in each type's Rustdoc.
//!
//! Public surface:
//! - Error (alias to `error::Error`) — API error response payload.
//! - FeedbackRecord — the unit of persistence.
//! - CallerIdentity / Role — per-request identity and access level.
//! - FeedbackService, InsightsService, PeerReviewService, RoadmapService —
//!   driving port implementations.

pub mod enrichment;
pub mod error;
pub mod feedback;
mod feedback_reads;
pub mod feedback_service;
pub mod identity;
pub mod insights;
pub mod insights_service;
pub mod llm_json;
pub mod peer_review_service;
pub mod ports;
pub mod roadmap;
pub mod roadmap_service;
pub mod role;
pub mod submission;
pub mod trace_id;

pub use self::enrichment::{
    ENRICHMENT_MAX_TOKENS, ENRICHMENT_TEMPERATURE, EnrichmentError, EnrichmentOutcome,
    EnrichmentPipeline, archive_key, archive_object, enrichment_prompt, parse_enrichment,
};
pub use self::error::{Error, ErrorCode};
pub use self::feedback::{
    Enrichment, FeedbackId, FeedbackRecord, FeedbackRecordDraft, FeedbackRecordError,
    PeerTarget, Sentiment, UnknownSentiment,
};
pub use self::feedback_service::{EnrichmentDispatch, FeedbackService};
pub use self::identity::{
    CallerIdentity, DEFAULT_DEPARTMENT, EMAIL_MAX, EmailAddress, IdentityHandle,
    IdentityValidationError, REDACTION_TOKEN, hash_identity, redact_pii,
};
pub use self::insights::{
    DepartmentScore, InsightDetail, InsightReport, InsightScope, MINIMUM_GROUP_SIZE,
    MonthlyTrendEntry, SentimentCounts, SummaryEntry, aggregate, percentage,
};
pub use self::insights_service::InsightsService;
pub use self::llm_json::{ModelJsonError, extract_json};
pub use self::peer_review_service::PeerReviewService;
pub use self::roadmap::{
    CurrentState, DEFAULT_EMPLOYEE_NAME, FocusArea, GrowthPlan, MAX_FOCUS_AREAS,
    NOT_ENOUGH_DATA_MESSAGE, ROADMAP_MAX_TOKENS, ROADMAP_MIN_RECORDS, ROADMAP_TEMPERATURE,
    ROADMAP_WINDOW, Roadmap, RoadmapError, RoadmapHistory, RoadmapOutcome, Trend,
    parse_roadmap, roadmap_prompt,
};
pub use self::roadmap_service::RoadmapService;
pub use self::role::Role;
pub use self::submission::{
    FeedbackSubmission, MESSAGE_MAX, NAME_MAX, SubmissionError, ValidatedSubmission,
    ValidatedTarget,
};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
