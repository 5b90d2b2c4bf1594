//! Keyset cursor shared by the feedback repository adapters.
//!
//! Pages are ordered on `(created_at, id)`; the cursor carries the key of the
//! last record returned so the next page resumes strictly after it.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use pagination::ContinuationToken;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::FeedbackRecord;
use crate::domain::ports::{FeedbackRepositoryError, TimeOrder};

/// Position of the last record on a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct FeedbackCursor {
    pub(crate) created_at: DateTime<Utc>,
    pub(crate) id: Uuid,
}

impl FeedbackCursor {
    pub(crate) fn of(record: &FeedbackRecord) -> Self {
        Self {
            created_at: record.created_at(),
            id: *record.id().as_uuid(),
        }
    }

    pub(crate) fn encode(&self) -> Result<ContinuationToken, FeedbackRepositoryError> {
        ContinuationToken::encode(self)
            .map_err(|err| FeedbackRepositoryError::cursor(err.to_string()))
    }

    pub(crate) fn decode(token: &ContinuationToken) -> Result<Self, FeedbackRepositoryError> {
        token
            .decode()
            .map_err(|err| FeedbackRepositoryError::cursor(err.to_string()))
    }

    fn key(&self) -> (DateTime<Utc>, Uuid) {
        (self.created_at, self.id)
    }

    /// Compare two positions under `order`.
    pub(crate) fn cmp_in(&self, other: &Self, order: TimeOrder) -> Ordering {
        match order {
            TimeOrder::OldestFirst => self.key().cmp(&other.key()),
            TimeOrder::NewestFirst => other.key().cmp(&self.key()),
        }
    }
}
