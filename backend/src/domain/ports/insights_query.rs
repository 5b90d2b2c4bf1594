//! Driving port for role-scoped insights.

use async_trait::async_trait;

use crate::domain::insights_service::resolve_scope;
use crate::domain::{CallerIdentity, Error, InsightReport, aggregate};

/// Driving port for reading aggregate insights.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait InsightsQuery: Send + Sync {
    /// Compute insights visible to `caller`.
    ///
    /// # Errors
    ///
    /// Returns `Forbidden` when the caller has no role or only the employee
    /// role, and `InternalError` when the store read fails.
    async fn insights(&self, caller: &CallerIdentity) -> Result<InsightReport, Error>;
}

/// Fixture implementation reporting an empty organisation.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureInsightsQuery;

#[async_trait]
impl InsightsQuery for FixtureInsightsQuery {
    async fn insights(&self, caller: &CallerIdentity) -> Result<InsightReport, Error> {
        Ok(aggregate(resolve_scope(caller)?, &[]))
    }
}
