//! Fully drained reads over the paged feedback repository.

use pagination::ContinuationToken;
use tracing::debug;

use crate::domain::Error;
use crate::domain::FeedbackRecord;
use crate::domain::ports::{FeedbackQuery, FeedbackRepository, FeedbackRepositoryError};

/// Map repository failures to a generic internal error, logging the detail.
pub(crate) fn map_repository_error(error: FeedbackRepositoryError) -> Error {
    tracing::error!(%error, "feedback repository call failed");
    Error::internal(format!("feedback repository error: {error}"))
}

/// Read every page of `query`, in order, until no continuation remains.
pub(crate) async fn drain_query(
    repository: &dyn FeedbackRepository,
    query: &FeedbackQuery,
) -> Result<Vec<FeedbackRecord>, FeedbackRepositoryError> {
    let mut records = Vec::new();
    let mut after: Option<ContinuationToken> = None;
    let mut pages = 0_usize;
    loop {
        let (items, next) = repository.query(query, after.take()).await?.into_parts();
        records.extend(items);
        pages += 1;
        match next {
            Some(token) => after = Some(token),
            None => break,
        }
    }
    debug!(pages, records = records.len(), "drained feedback query");
    Ok(records)
}

#[cfg(test)]
mod tests {
    //! Coverage for page draining.

    use pagination::Page;

    use super::*;
    use crate::domain::ports::MockFeedbackRepository;
    use crate::test_support::RecordBuilder;

    #[tokio::test]
    async fn follows_continuation_tokens_to_the_last_page() {
        let first = ContinuationToken::encode(&1_u8).expect("token");
        let second = ContinuationToken::encode(&2_u8).expect("token");

        let mut repository = MockFeedbackRepository::new();
        let (t1, t2) = (first, second);
        repository
            .expect_query()
            .times(3)
            .returning(move |_, after| {
                let record = RecordBuilder::new("a@example.com", "ops").build();
                let next = match after.as_ref() {
                    None => Some(t1.clone()),
                    Some(token) if *token == t1 => Some(t2.clone()),
                    Some(_) => None,
                };
                Ok(Page::new(vec![record], next))
            });

        let records = drain_query(&repository, &FeedbackQuery::all())
            .await
            .expect("drain succeeds");
        assert_eq!(records.len(), 3);
    }

    #[tokio::test]
    async fn stops_on_repository_error() {
        let mut repository = MockFeedbackRepository::new();
        repository
            .expect_query()
            .times(1)
            .returning(|_, _| Err(FeedbackRepositoryError::connection("pool exhausted")));

        let result = drain_query(&repository, &FeedbackQuery::all()).await;
        assert!(matches!(
            result,
            Err(FeedbackRepositoryError::Connection { .. })
        ));
    }
}
