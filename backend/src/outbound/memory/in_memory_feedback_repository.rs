//! `FeedbackRepository` held in process memory.
//!
//! Used when no database is configured and by the HTTP integration tests.
//! Paging follows the same keyset rules as the PostgreSQL adapter.

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use pagination::{ContinuationToken, Page};

use crate::domain::ports::{
    EnrichmentWrite, FeedbackQuery, FeedbackRepository, FeedbackRepositoryError,
};
use crate::domain::{Enrichment, FeedbackId, FeedbackRecord};
use crate::outbound::feedback_cursor::FeedbackCursor;

/// Default number of records per page.
pub const DEFAULT_PAGE_SIZE: usize = 100;

/// Thread-safe in-memory feedback store.
#[derive(Debug, Clone)]
pub struct InMemoryFeedbackRepository {
    records: Arc<RwLock<Vec<FeedbackRecord>>>,
    page_size: usize,
}

impl Default for InMemoryFeedbackRepository {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl InMemoryFeedbackRepository {
    /// Create an empty store returning at most `page_size` records per page.
    #[must_use]
    pub fn new(page_size: usize) -> Self {
        Self {
            records: Arc::new(RwLock::new(Vec::new())),
            page_size: page_size.max(1),
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Vec<FeedbackRecord>>, FeedbackRepositoryError> {
        self.records
            .read()
            .map_err(|_| FeedbackRepositoryError::connection("in-memory store poisoned"))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Vec<FeedbackRecord>>, FeedbackRepositoryError> {
        self.records
            .write()
            .map_err(|_| FeedbackRepositoryError::connection("in-memory store poisoned"))
    }
}

#[async_trait]
impl FeedbackRepository for InMemoryFeedbackRepository {
    async fn insert(&self, record: &FeedbackRecord) -> Result<(), FeedbackRepositoryError> {
        let mut records = self.write()?;
        if records.iter().any(|existing| existing.id() == record.id()) {
            return Err(FeedbackRepositoryError::query(format!(
                "duplicate feedback id {}",
                record.id()
            )));
        }
        records.push(record.clone());
        Ok(())
    }

    async fn find_by_id(
        &self,
        id: &FeedbackId,
    ) -> Result<Option<FeedbackRecord>, FeedbackRepositoryError> {
        Ok(self.read()?.iter().find(|record| record.id() == *id).cloned())
    }

    async fn apply_enrichment(
        &self,
        id: &FeedbackId,
        enrichment: &Enrichment,
    ) -> Result<EnrichmentWrite, FeedbackRepositoryError> {
        let mut records = self.write()?;
        let Some(slot) = records.iter_mut().find(|record| record.id() == *id) else {
            return Ok(EnrichmentWrite::Missing);
        };
        if slot.enrichment().is_some() {
            return Ok(EnrichmentWrite::AlreadyEnriched);
        }
        *slot = slot.clone().with_enrichment(enrichment.clone());
        Ok(EnrichmentWrite::Applied)
    }

    async fn query(
        &self,
        query: &FeedbackQuery,
        after: Option<ContinuationToken>,
    ) -> Result<Page<FeedbackRecord>, FeedbackRepositoryError> {
        let after = after.as_ref().map(FeedbackCursor::decode).transpose()?;
        let mut matching: Vec<FeedbackRecord> = self
            .read()?
            .iter()
            .filter(|record| query.matches(record))
            .filter(|record| {
                after.is_none_or(|cursor| {
                    FeedbackCursor::of(record).cmp_in(&cursor, query.order).is_gt()
                })
            })
            .cloned()
            .collect();
        matching.sort_by(|a, b| FeedbackCursor::of(a).cmp_in(&FeedbackCursor::of(b), query.order));

        if matching.len() <= self.page_size {
            return Ok(Page::last(matching));
        }
        matching.truncate(self.page_size);
        let next = matching
            .last()
            .map(|record| FeedbackCursor::of(record).encode())
            .transpose()?;
        Ok(Page::new(matching, next))
    }
}
