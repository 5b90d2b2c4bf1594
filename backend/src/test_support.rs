//! Shared builders for unit tests inside the crate.

use chrono::{DateTime, TimeZone, Utc};

use crate::domain::{
    Enrichment, FeedbackId, FeedbackRecord, FeedbackRecordDraft, PeerTarget, Sentiment,
    hash_identity,
};

/// Fluent builder for [`FeedbackRecord`] values.
#[derive(Debug, Clone)]
pub(crate) struct RecordBuilder {
    draft: FeedbackRecordDraft,
}

/// Midday UTC on the given date.
pub(crate) fn at(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 12, 0, 0)
        .single()
        .unwrap_or_else(|| panic!("invalid test date {year}-{month}-{day}"))
}

impl RecordBuilder {
    /// Self-feedback from `email` in `department`.
    pub(crate) fn new(email: &str, department: &str) -> Self {
        Self {
            draft: FeedbackRecordDraft {
                id: FeedbackId::random(),
                submitter_name: "Submitter".into(),
                submitter_handle: hash_identity(email),
                message: "Feedback text".into(),
                department: department.into(),
                target: None,
                enrichment: None,
                created_at: at(2026, 1, 15),
            },
        }
    }

    pub(crate) fn message(mut self, message: &str) -> Self {
        self.draft.message = message.into();
        self
    }

    pub(crate) fn created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.draft.created_at = created_at;
        self
    }

    pub(crate) fn peer_review_of(mut self, email: &str) -> Self {
        self.draft.target = Some(PeerTarget {
            name: "Target".into(),
            handle: hash_identity(email),
        });
        self
    }

    pub(crate) fn enriched(mut self, sentiment: Sentiment, topics: &[&str], summary: &str) -> Self {
        self.draft.enrichment = Some(Enrichment {
            sentiment,
            topics: topics.iter().map(|t| (*t).to_owned()).collect(),
            summary: summary.into(),
        });
        self
    }

    pub(crate) fn sentiment(self, sentiment: Sentiment) -> Self {
        self.enriched(sentiment, &[], "Summary.")
    }

    pub(crate) fn build(self) -> FeedbackRecord {
        FeedbackRecord::new(self.draft).unwrap_or_else(|err| panic!("invalid test record: {err}"))
    }
}
