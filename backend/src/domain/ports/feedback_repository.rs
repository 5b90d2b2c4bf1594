//! Port for feedback record persistence and scoped, paged reads.

use async_trait::async_trait;
use pagination::{ContinuationToken, Page};

use crate::domain::{Enrichment, FeedbackId, FeedbackRecord, IdentityHandle};

use super::define_port_error;

define_port_error! {
    /// Errors raised by feedback repository adapters.
    pub enum FeedbackRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "feedback repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "feedback repository query failed: {message}",
        /// A continuation token could not be decoded.
        Cursor { message: String } =>
            "feedback repository continuation token rejected: {message}",
    }
}

/// Access pattern for a paged read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedbackScope {
    /// Every record.
    All,
    /// Records written by the holder of this handle.
    Submitter(IdentityHandle),
    /// Peer reviews whose target is the holder of this handle.
    Target(IdentityHandle),
    /// Records in one department.
    Department(String),
}

/// Ordering on `created_at`, ties broken by id in the same direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeOrder {
    /// Ascending.
    OldestFirst,
    /// Descending.
    NewestFirst,
}

/// Scoped, ordered query over feedback records.
///
/// The constructors encode the supported access patterns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedbackQuery {
    /// Which records to return.
    pub scope: FeedbackScope,
    /// Result ordering.
    pub order: TimeOrder,
}

impl FeedbackQuery {
    /// Unscoped scan, oldest first.
    #[must_use]
    pub const fn all() -> Self {
        Self {
            scope: FeedbackScope::All,
            order: TimeOrder::OldestFirst,
        }
    }

    /// Records by submitter handle, oldest first.
    #[must_use]
    pub const fn by_submitter(handle: IdentityHandle) -> Self {
        Self {
            scope: FeedbackScope::Submitter(handle),
            order: TimeOrder::OldestFirst,
        }
    }

    /// Records by target handle, newest first.
    #[must_use]
    pub const fn by_target(handle: IdentityHandle) -> Self {
        Self {
            scope: FeedbackScope::Target(handle),
            order: TimeOrder::NewestFirst,
        }
    }

    /// Records by department, oldest first.
    #[must_use]
    pub fn by_department(department: impl Into<String>) -> Self {
        Self {
            scope: FeedbackScope::Department(department.into()),
            order: TimeOrder::OldestFirst,
        }
    }

    /// Whether `record` falls inside this query's scope.
    #[must_use]
    pub fn matches(&self, record: &FeedbackRecord) -> bool {
        match &self.scope {
            FeedbackScope::All => true,
            FeedbackScope::Submitter(handle) => record.submitter_handle() == handle,
            FeedbackScope::Target(handle) => {
                record.target().is_some_and(|target| &target.handle == handle)
            }
            FeedbackScope::Department(department) => record.department() == department,
        }
    }
}

/// Outcome of a conditional enrichment update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnrichmentWrite {
    /// The three enrichment fields were set.
    Applied,
    /// The record was already enriched; nothing changed.
    AlreadyEnriched,
    /// No record with the given id exists.
    Missing,
}

/// Port for writing feedback records and reading them back by access pattern.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FeedbackRepository: Send + Sync {
    /// Persist a new record.
    async fn insert(&self, record: &FeedbackRecord) -> Result<(), FeedbackRepositoryError>;

    /// Find a record by id.
    async fn find_by_id(
        &self,
        id: &FeedbackId,
    ) -> Result<Option<FeedbackRecord>, FeedbackRepositoryError>;

    /// Set the enrichment fields iff the record is still unenriched.
    async fn apply_enrichment(
        &self,
        id: &FeedbackId,
        enrichment: &Enrichment,
    ) -> Result<EnrichmentWrite, FeedbackRepositoryError>;

    /// Read one page of records matching `query`, resuming after `after`.
    async fn query(
        &self,
        query: &FeedbackQuery,
        after: Option<ContinuationToken>,
    ) -> Result<Page<FeedbackRecord>, FeedbackRepositoryError>;
}

/// Fixture implementation for tests that do not exercise persistence.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureFeedbackRepository;

#[async_trait]
impl FeedbackRepository for FixtureFeedbackRepository {
    async fn insert(&self, _record: &FeedbackRecord) -> Result<(), FeedbackRepositoryError> {
        Ok(())
    }

    async fn find_by_id(
        &self,
        _id: &FeedbackId,
    ) -> Result<Option<FeedbackRecord>, FeedbackRepositoryError> {
        Ok(None)
    }

    async fn apply_enrichment(
        &self,
        _id: &FeedbackId,
        _enrichment: &Enrichment,
    ) -> Result<EnrichmentWrite, FeedbackRepositoryError> {
        Ok(EnrichmentWrite::Missing)
    }

    async fn query(
        &self,
        _query: &FeedbackQuery,
        _after: Option<ContinuationToken>,
    ) -> Result<Page<FeedbackRecord>, FeedbackRepositoryError> {
        Ok(Page::last(Vec::new()))
    }
}
