//! PostgreSQL-backed `FeedbackRepository` implementation using Diesel ORM.
//!
//! Reads use keyset pagination on `(created_at, id)`; the enrichment update is
//! guarded by `sentiment IS NULL` so it applies at most once.

use async_trait::async_trait;
use diesel::dsl::exists;
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use pagination::{ContinuationToken, Page};

use crate::domain::ports::{
    EnrichmentWrite, FeedbackQuery, FeedbackRepository, FeedbackRepositoryError, FeedbackScope,
    TimeOrder,
};
use crate::domain::{
    Enrichment, FeedbackId, FeedbackRecord, FeedbackRecordDraft, IdentityHandle, PeerTarget,
    Sentiment,
};
use crate::outbound::feedback_cursor::FeedbackCursor;

use super::diesel_error_mapping::{map_diesel_error, map_pool_error};
use super::models::{EnrichmentUpdate, FeedbackRow, NewFeedbackRow};
use super::pool::DbPool;
use super::schema::feedback;

type FeedbackSelection = diesel::dsl::SqlTypeOf<diesel::dsl::AsSelect<FeedbackRow, Pg>>;
type BoxedFeedbackQuery<'a> = feedback::BoxedQuery<'a, Pg, FeedbackSelection>;

/// Diesel-backed implementation of the feedback repository port.
#[derive(Clone)]
pub struct DieselFeedbackRepository {
    pool: DbPool,
    page_size: usize,
}

impl DieselFeedbackRepository {
    /// Create a repository returning at most `page_size` records per page.
    pub fn new(pool: DbPool, page_size: usize) -> Self {
        Self {
            pool,
            page_size: page_size.max(1),
        }
    }

    fn fetch_limit(&self) -> i64 {
        i64::try_from(self.page_size.saturating_add(1)).unwrap_or(i64::MAX)
    }
}

fn decode_error(message: impl std::fmt::Display) -> FeedbackRepositoryError {
    FeedbackRepositoryError::query(format!("stored feedback is malformed: {message}"))
}

/// Convert a database row into a validated domain record.
fn row_to_record(row: FeedbackRow) -> Result<FeedbackRecord, FeedbackRepositoryError> {
    let FeedbackRow {
        id,
        submitter_name,
        submitter_handle,
        message,
        department,
        is_peer_review,
        target_name,
        target_handle,
        sentiment,
        topics,
        summary,
        created_at,
    } = row;

    let target = match (is_peer_review, target_name, target_handle) {
        (true, Some(name), Some(handle)) => Some(PeerTarget {
            name,
            handle: IdentityHandle::try_from(handle).map_err(decode_error)?,
        }),
        (false, _, _) => None,
        (true, _, _) => return Err(decode_error("peer review without target")),
    };
    let enrichment = match (sentiment, summary) {
        (Some(label), Some(summary)) => Some(Enrichment {
            sentiment: label.parse::<Sentiment>().map_err(decode_error)?,
            topics,
            summary,
        }),
        _ => None,
    };

    FeedbackRecord::new(FeedbackRecordDraft {
        id: FeedbackId::from_uuid(id),
        submitter_name,
        submitter_handle: IdentityHandle::try_from(submitter_handle).map_err(decode_error)?,
        message,
        department,
        target,
        enrichment,
        created_at,
    })
    .map_err(decode_error)
}

fn scoped(query: &FeedbackQuery) -> BoxedFeedbackQuery<'static> {
    let statement = feedback::table.select(FeedbackRow::as_select()).into_boxed();
    match &query.scope {
        FeedbackScope::All => statement,
        FeedbackScope::Submitter(handle) => {
            statement.filter(feedback::submitter_handle.eq(handle.as_str().to_owned()))
        }
        FeedbackScope::Target(handle) => statement
            .filter(feedback::is_peer_review.eq(true))
            .filter(feedback::target_handle.eq(handle.as_str().to_owned())),
        FeedbackScope::Department(department) => {
            statement.filter(feedback::department.eq(department.clone()))
        }
    }
}

fn resume_after(
    statement: BoxedFeedbackQuery<'static>,
    cursor: FeedbackCursor,
    order: TimeOrder,
) -> BoxedFeedbackQuery<'static> {
    let same_instant = feedback::created_at.eq(cursor.created_at);
    match order {
        TimeOrder::OldestFirst => statement.filter(
            feedback::created_at
                .gt(cursor.created_at)
                .or(same_instant.and(feedback::id.gt(cursor.id))),
        ),
        TimeOrder::NewestFirst => statement.filter(
            feedback::created_at
                .lt(cursor.created_at)
                .or(same_instant.and(feedback::id.lt(cursor.id))),
        ),
    }
}

fn ordered(
    statement: BoxedFeedbackQuery<'static>,
    order: TimeOrder,
) -> BoxedFeedbackQuery<'static> {
    match order {
        TimeOrder::OldestFirst => {
            statement.order((feedback::created_at.asc(), feedback::id.asc()))
        }
        TimeOrder::NewestFirst => {
            statement.order((feedback::created_at.desc(), feedback::id.desc()))
        }
    }
}

#[async_trait]
impl FeedbackRepository for DieselFeedbackRepository {
    async fn insert(&self, record: &FeedbackRecord) -> Result<(), FeedbackRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let enrichment = record.enrichment();
        let row = NewFeedbackRow {
            id: *record.id().as_uuid(),
            submitter_name: record.submitter_name(),
            submitter_handle: record.submitter_handle().as_str(),
            message: record.message(),
            department: record.department(),
            is_peer_review: record.is_peer_review(),
            target_name: record.target().map(|t| t.name.as_str()),
            target_handle: record.target().map(|t| t.handle.as_str()),
            sentiment: enrichment.map(|e| e.sentiment.as_str()),
            topics: record.topics(),
            summary: enrichment.map(|e| e.summary.as_str()),
            created_at: record.created_at(),
        };

        diesel::insert_into(feedback::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn find_by_id(
        &self,
        id: &FeedbackId,
    ) -> Result<Option<FeedbackRecord>, FeedbackRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = feedback::table
            .filter(feedback::id.eq(id.as_uuid()))
            .select(FeedbackRow::as_select())
            .first::<FeedbackRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_record).transpose()
    }

    async fn apply_enrichment(
        &self,
        id: &FeedbackId,
        enrichment: &Enrichment,
    ) -> Result<EnrichmentWrite, FeedbackRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let changes = EnrichmentUpdate {
            sentiment: enrichment.sentiment.as_str(),
            topics: &enrichment.topics,
            summary: &enrichment.summary,
        };

        let updated = diesel::update(
            feedback::table
                .filter(feedback::id.eq(id.as_uuid()))
                .filter(feedback::sentiment.is_null()),
        )
        .set(&changes)
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;
        if updated > 0 {
            return Ok(EnrichmentWrite::Applied);
        }

        let present = diesel::select(exists(
            feedback::table.filter(feedback::id.eq(id.as_uuid())),
        ))
        .get_result::<bool>(&mut conn)
        .await
        .map_err(map_diesel_error)?;
        Ok(if present {
            EnrichmentWrite::AlreadyEnriched
        } else {
            EnrichmentWrite::Missing
        })
    }

    async fn query(
        &self,
        query: &FeedbackQuery,
        after: Option<ContinuationToken>,
    ) -> Result<Page<FeedbackRecord>, FeedbackRepositoryError> {
        let cursor = after.as_ref().map(FeedbackCursor::decode).transpose()?;
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let mut statement = scoped(query);
        if let Some(cursor) = cursor {
            statement = resume_after(statement, cursor, query.order);
        }
        let rows: Vec<FeedbackRow> = ordered(statement, query.order)
            .limit(self.fetch_limit())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        let mut records = rows
            .into_iter()
            .map(row_to_record)
            .collect::<Result<Vec<_>, _>>()?;
        if records.len() <= self.page_size {
            return Ok(Page::last(records));
        }
        records.truncate(self.page_size);
        let next = records
            .last()
            .map(|record| FeedbackCursor::of(record).encode())
            .transpose()?;
        Ok(Page::new(records, next))
    }
}

#[cfg(test)]
mod tests {
    //! Row decoding coverage; SQL paths need a live database.

    use chrono::Utc;
    use rstest::rstest;
    use uuid::Uuid;

    use super::*;
    use crate::domain::hash_identity;

    fn row() -> FeedbackRow {
        FeedbackRow {
            id: Uuid::new_v4(),
            submitter_name: "Ada".into(),
            submitter_handle: hash_identity("ada@example.com").as_str().to_owned(),
            message: "Great sprint".into(),
            department: "engineering".into(),
            is_peer_review: false,
            target_name: None,
            target_handle: None,
            sentiment: None,
            topics: Vec::new(),
            summary: None,
            created_at: Utc::now(),
        }
    }

    #[rstest]
    fn raw_rows_decode_without_enrichment() {
        let record = row_to_record(row()).expect("valid row");
        assert!(record.enrichment().is_none());
        assert!(!record.is_peer_review());
    }

    #[rstest]
    fn enriched_peer_rows_decode_fully() {
        let mut peer = row();
        peer.is_peer_review = true;
        peer.target_name = Some("Grace".into());
        peer.target_handle = Some(hash_identity("grace@example.com").as_str().to_owned());
        peer.sentiment = Some("positive".into());
        peer.topics = vec!["pairing".into()];
        peer.summary = Some("Helpful.".into());

        let record = row_to_record(peer).expect("valid row");
        assert!(record.is_peer_review());
        assert_eq!(record.sentiment(), Some(Sentiment::Positive));
        assert_eq!(record.topics(), ["pairing".to_owned()]);
    }

    #[rstest]
    #[case::peer_without_target(|r: &mut FeedbackRow| r.is_peer_review = true)]
    #[case::bad_handle(|r: &mut FeedbackRow| r.submitter_handle = "nope".into())]
    #[case::unknown_sentiment(|r: &mut FeedbackRow| {
        r.sentiment = Some("ecstatic".into());
        r.summary = Some("x".into());
    })]
    fn malformed_rows_are_query_errors(#[case] corrupt: fn(&mut FeedbackRow)) {
        let mut bad = row();
        corrupt(&mut bad);
        assert!(matches!(
            row_to_record(bad),
            Err(FeedbackRepositoryError::Query { .. })
        ));
    }
}
