//! Insight service: role gate, scoped read, then in-memory aggregation.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::domain::feedback_reads::{drain_query, map_repository_error};
use crate::domain::ports::{FeedbackQuery, FeedbackRepository, InsightsQuery};
use crate::domain::{CallerIdentity, Error, InsightReport, InsightScope, aggregate};

const FORBIDDEN_MESSAGE: &str = "Forbidden: insufficient permissions";

/// Resolve the scope `caller` may read, or reject them.
///
/// Managers are pinned to their own department, falling back to the default
/// department rather than the whole organisation.
pub(crate) fn resolve_scope(caller: &CallerIdentity) -> Result<InsightScope, Error> {
    let role = caller
        .role()
        .filter(|role| role.can_view_insights())
        .ok_or_else(|| Error::forbidden(FORBIDDEN_MESSAGE))?;
    let department = (!role.sees_organisation()).then(|| caller.department().to_owned());
    Ok(InsightScope { role, department })
}

fn query_for(scope: &InsightScope) -> FeedbackQuery {
    match &scope.department {
        Some(department) => FeedbackQuery::by_department(department.clone()),
        None => FeedbackQuery::all(),
    }
}

/// Insight service implementing [`InsightsQuery`].
#[derive(Clone)]
pub struct InsightsService {
    repository: Arc<dyn FeedbackRepository>,
}

impl InsightsService {
    /// Create a new insight service over `repository`.
    pub fn new(repository: Arc<dyn FeedbackRepository>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl InsightsQuery for InsightsService {
    async fn insights(&self, caller: &CallerIdentity) -> Result<InsightReport, Error> {
        let scope = resolve_scope(caller)?;
        let records = drain_query(self.repository.as_ref(), &query_for(&scope))
            .await
            .map_err(map_repository_error)?;
        debug!(
            role = %scope.role,
            scoped = scope.department.is_some(),
            records = records.len(),
            "aggregating insights"
        );
        Ok(aggregate(scope, &records))
    }
}

#[cfg(test)]
mod tests {
    //! Role gating and scope selection for insight reads.

    use rstest::rstest;

    use super::*;
    use crate::domain::{ErrorCode, Role};
    use crate::domain::ports::{FeedbackScope, FeedbackRepositoryError, MockFeedbackRepository};
    use crate::test_support::RecordBuilder;
    use pagination::Page;

    fn caller(groups: &[&str], department: Option<&str>) -> CallerIdentity {
        CallerIdentity::new(
            Some("Reader".into()),
            Some("reader@example.com".into()),
            department.map(str::to_owned),
            groups.iter().map(|g| (*g).to_owned()).collect(),
        )
    }

    fn repository_with(
        expected: FeedbackScope,
        records: Vec<crate::domain::FeedbackRecord>,
    ) -> MockFeedbackRepository {
        let mut repository = MockFeedbackRepository::new();
        repository
            .expect_query()
            .withf(move |query, after| query.scope == expected && after.is_none())
            .times(1)
            .return_once(move |_, _| Ok(Page::last(records)));
        repository
    }

    #[rstest]
    #[case(&[])]
    #[case(&["employees"])]
    #[case(&["contractors"])]
    #[tokio::test]
    async fn rejects_callers_without_insight_access(#[case] groups: &[&str]) {
        let mut repository = MockFeedbackRepository::new();
        repository.expect_query().times(0);
        let service = InsightsService::new(Arc::new(repository));

        let error = service
            .insights(&caller(groups, Some("ops")))
            .await
            .expect_err("forbidden");
        assert_eq!(error.code(), ErrorCode::Forbidden);
        assert_eq!(error.message(), FORBIDDEN_MESSAGE);
    }

    #[tokio::test]
    async fn managers_read_only_their_department() {
        let records = (0..5)
            .map(|_| RecordBuilder::new("a@example.com", "ops").build())
            .collect();
        let repository = repository_with(FeedbackScope::Department("ops".into()), records);
        let service = InsightsService::new(Arc::new(repository));

        let report = service
            .insights(&caller(&["managers", "employees"], Some("ops")))
            .await
            .expect("insights");
        assert_eq!(report.scope.role, Role::Manager);
        assert_eq!(report.scope.department.as_deref(), Some("ops"));
        assert!(report.minimum_threshold_met());
    }

    #[tokio::test]
    async fn managers_without_department_are_not_widened() {
        let repository = repository_with(FeedbackScope::Department("unknown".into()), Vec::new());
        let service = InsightsService::new(Arc::new(repository));

        let report = service
            .insights(&caller(&["manager"], None))
            .await
            .expect("insights");
        assert!(!report.minimum_threshold_met());
        assert_eq!(report.total_submissions, 0);
    }

    #[rstest]
    #[case("hr-admins")]
    #[case("super-admins")]
    #[tokio::test]
    async fn admins_read_the_whole_organisation(#[case] group: &str) {
        let records = vec![RecordBuilder::new("a@example.com", "ops").build()];
        let repository = repository_with(FeedbackScope::All, records);
        let service = InsightsService::new(Arc::new(repository));

        let report = service
            .insights(&caller(&[group], Some("ops")))
            .await
            .expect("insights");
        let detail = report.detail.expect("admins are never gated");
        assert!(detail.department_scores.is_some());
    }

    #[tokio::test]
    async fn store_failures_are_internal() {
        let mut repository = MockFeedbackRepository::new();
        repository
            .expect_query()
            .return_once(|_, _| Err(FeedbackRepositoryError::connection("refused")));
        let service = InsightsService::new(Arc::new(repository));

        let error = service
            .insights(&caller(&["hr-admins"], None))
            .await
            .expect_err("store failed");
        assert_eq!(error.code(), ErrorCode::InternalError);
    }
}
