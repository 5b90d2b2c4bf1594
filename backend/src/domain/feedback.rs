//! Feedback record entity and its enrichment metadata.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::IdentityHandle;

/// Opaque feedback record identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeedbackId(Uuid);

impl FeedbackId {
    /// Generate a new random identifier.
    #[must_use]
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Access the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for FeedbackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Sentiment label attached by enrichment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    /// Favourable feedback.
    Positive,
    /// Unfavourable feedback.
    Negative,
    /// Neither, or unclear.
    Neutral,
}

impl Sentiment {
    /// Lowercase label used in storage and prompts.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Positive => "positive",
            Self::Negative => "negative",
            Self::Neutral => "neutral",
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raised when a sentiment label is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown sentiment label: {label}")]
pub struct UnknownSentiment {
    /// The rejected label.
    pub label: String,
}

impl FromStr for Sentiment {
    type Err = UnknownSentiment;

    /// Parse a label case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "positive" => Ok(Self::Positive),
            "negative" => Ok(Self::Negative),
            "neutral" => Ok(Self::Neutral),
            _ => Err(UnknownSentiment {
                label: s.to_owned(),
            }),
        }
    }
}

/// AI-derived metadata set once per record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enrichment {
    /// Overall sentiment.
    pub sentiment: Sentiment,
    /// Short topic labels in model order.
    pub topics: Vec<String>,
    /// One-sentence summary.
    pub summary: String,
}

/// Subject of a peer review.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeerTarget {
    /// Target display name as supplied by the submitter.
    pub name: String,
    /// Handle of the target's email; a lookup key only.
    pub handle: IdentityHandle,
}

/// Raised when a record would violate its structural invariants.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FeedbackRecordError {
    /// The peer-review target is the submitter.
    #[error("peer review target must differ from the submitter")]
    SelfReview,
}

/// Input for [`FeedbackRecord::new`].
#[derive(Debug, Clone)]
pub struct FeedbackRecordDraft {
    /// Record identifier.
    pub id: FeedbackId,
    /// Submitter display name.
    pub submitter_name: String,
    /// Submitter handle.
    pub submitter_handle: IdentityHandle,
    /// Redacted message text.
    pub message: String,
    /// Department scope.
    pub department: String,
    /// Peer-review target, when the record is a peer review.
    pub target: Option<PeerTarget>,
    /// Enrichment metadata, when already applied.
    pub enrichment: Option<Enrichment>,
    /// Write timestamp.
    pub created_at: DateTime<Utc>,
}

/// Unit of persistence for one piece of feedback.
///
/// ## Invariants
/// - A record is a peer review iff it carries a [`PeerTarget`].
/// - The target handle never equals the submitter handle.
///
/// # Examples
/// ```
/// use backend::domain::{hash_identity, FeedbackId, FeedbackRecord, FeedbackRecordDraft};
/// use chrono::Utc;
///
/// let record = FeedbackRecord::new(FeedbackRecordDraft {
///     id: FeedbackId::random(),
///     submitter_name: "Ada".into(),
///     submitter_handle: hash_identity("ada@example.com"),
///     message: "Great sprint".into(),
///     department: "engineering".into(),
///     target: None,
///     enrichment: None,
///     created_at: Utc::now(),
/// })
/// .expect("valid record");
/// assert!(!record.is_peer_review());
/// assert!(record.enrichment().is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedbackRecord {
    id: FeedbackId,
    submitter_name: String,
    submitter_handle: IdentityHandle,
    message: String,
    department: String,
    target: Option<PeerTarget>,
    enrichment: Option<Enrichment>,
    created_at: DateTime<Utc>,
}

impl FeedbackRecord {
    /// Validate and build a record.
    pub fn new(draft: FeedbackRecordDraft) -> Result<Self, FeedbackRecordError> {
        let FeedbackRecordDraft {
            id,
            submitter_name,
            submitter_handle,
            message,
            department,
            target,
            enrichment,
            created_at,
        } = draft;

        if target
            .as_ref()
            .is_some_and(|target| target.handle == submitter_handle)
        {
            return Err(FeedbackRecordError::SelfReview);
        }

        Ok(Self {
            id,
            submitter_name,
            submitter_handle,
            message,
            department,
            target,
            enrichment,
            created_at,
        })
    }

    /// Record identifier.
    #[must_use]
    pub const fn id(&self) -> FeedbackId {
        self.id
    }

    /// Submitter display name.
    #[must_use]
    pub fn submitter_name(&self) -> &str {
        &self.submitter_name
    }

    /// Submitter handle.
    #[must_use]
    pub const fn submitter_handle(&self) -> &IdentityHandle {
        &self.submitter_handle
    }

    /// Redacted message text.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Department scope.
    #[must_use]
    pub fn department(&self) -> &str {
        &self.department
    }

    /// Peer-review target, if any.
    #[must_use]
    pub const fn target(&self) -> Option<&PeerTarget> {
        self.target.as_ref()
    }

    /// Whether the record is a peer review.
    #[must_use]
    pub const fn is_peer_review(&self) -> bool {
        self.target.is_some()
    }

    /// Enrichment metadata, once applied.
    #[must_use]
    pub const fn enrichment(&self) -> Option<&Enrichment> {
        self.enrichment.as_ref()
    }

    /// Sentiment, when enriched.
    #[must_use]
    pub fn sentiment(&self) -> Option<Sentiment> {
        self.enrichment.as_ref().map(|e| e.sentiment)
    }

    /// Topics, empty until enriched.
    #[must_use]
    pub fn topics(&self) -> &[String] {
        self.enrichment
            .as_ref()
            .map(|e| e.topics.as_slice())
            .unwrap_or_default()
    }

    /// Summary, when enriched.
    #[must_use]
    pub fn summary(&self) -> Option<&str> {
        self.enrichment.as_ref().map(|e| e.summary.as_str())
    }

    /// Write timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Year-month bucket key, `YYYY-MM`.
    #[must_use]
    pub fn month_key(&self) -> String {
        self.created_at.format("%Y-%m").to_string()
    }

    /// Return a copy with enrichment applied, unless already enriched.
    #[must_use]
    pub fn with_enrichment(mut self, enrichment: Enrichment) -> Self {
        if self.enrichment.is_none() {
            self.enrichment = Some(enrichment);
        }
        self
    }
}
