//! Role-scoped insight aggregation with a k-anonymity gate.
//!
//! Aggregation is a pure function over records that have already been read
//! for the caller's scope. Peer reviews are dropped first; every count below
//! is over self-submitted feedback only.

use std::collections::BTreeMap;

use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::{FeedbackRecord, Role, Sentiment};

/// Smallest department group for which detail is disclosed to managers.
pub const MINIMUM_GROUP_SIZE: usize = 5;

/// Scope an insight report was computed for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsightScope {
    /// Caller role.
    pub role: Role,
    /// Department the report is restricted to; `None` for the whole
    /// organisation.
    pub department: Option<String>,
}

/// Sentiment tally; records without sentiment count as neutral.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct SentimentCounts {
    /// Positive records.
    pub positive: u64,
    /// Negative records.
    pub negative: u64,
    /// Neutral or unenriched records.
    pub neutral: u64,
}

impl SentimentCounts {
    fn record(&mut self, sentiment: Option<Sentiment>) {
        match sentiment.unwrap_or(Sentiment::Neutral) {
            Sentiment::Positive => self.positive += 1,
            Sentiment::Negative => self.negative += 1,
            Sentiment::Neutral => self.neutral += 1,
        }
    }

    /// Sum of the three counts.
    #[must_use]
    pub const fn total(&self) -> u64 {
        self.positive + self.negative + self.neutral
    }
}

/// Summary text paired with the record's department.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct SummaryEntry {
    /// Enrichment summary.
    pub summary: String,
    /// Department of the summarised record.
    pub department: String,
}

/// Per-month sentiment bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct MonthlyTrendEntry {
    /// Bucket key, `YYYY-MM`.
    #[schema(example = "2026-03")]
    pub month: String,
    /// Positive records.
    pub positive: u64,
    /// Negative records.
    pub negative: u64,
    /// Neutral or unenriched records.
    pub neutral: u64,
    /// All records in the bucket.
    pub total: u64,
}

/// Per-department sentiment score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct DepartmentScore {
    /// Positive records.
    pub positive: u64,
    /// Negative records.
    pub negative: u64,
    /// Neutral or unenriched records.
    pub neutral: u64,
    /// All records in the department.
    pub total: u64,
    /// Share of positive records as a whole percentage, rounded half-up.
    pub score: u64,
}

/// Detail disclosed once the k-anonymity gate passes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsightDetail {
    /// Sentiment tally.
    pub sentiment_counts: SentimentCounts,
    /// Non-empty summaries in record order.
    pub summaries: Vec<SummaryEntry>,
    /// Every topic across records, duplicates kept.
    pub topics: Vec<String>,
    /// Buckets sorted by month ascending.
    pub monthly_trend: Vec<MonthlyTrendEntry>,
    /// Department scores; only for organisation-wide roles.
    pub department_scores: Option<BTreeMap<String, DepartmentScore>>,
}

/// Result of an insight aggregation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsightReport {
    /// Scope the report covers.
    pub scope: InsightScope,
    /// Self-submitted records in scope.
    pub total_submissions: usize,
    /// `None` when the k-anonymity gate withheld detail.
    pub detail: Option<InsightDetail>,
}

impl InsightReport {
    /// Whether detail was disclosed.
    #[must_use]
    pub const fn minimum_threshold_met(&self) -> bool {
        self.detail.is_some()
    }
}

/// Percentage of `part` in `total`, rounded half-up; 0 when `total` is 0.
///
/// # Examples
/// ```
/// use backend::domain::percentage;
///
/// assert_eq!(percentage(3, 4), 75);
/// assert_eq!(percentage(1, 8), 13);
/// assert_eq!(percentage(0, 0), 0);
/// ```
#[must_use]
pub const fn percentage(part: u64, total: u64) -> u64 {
    if total == 0 {
        return 0;
    }
    (part * 200 + total) / (total * 2)
}

/// Aggregate `records` for `scope`.
///
/// Department-scoped reports below [`MINIMUM_GROUP_SIZE`] carry only the
/// total.
#[must_use]
pub fn aggregate(scope: InsightScope, records: &[FeedbackRecord]) -> InsightReport {
    let own: Vec<&FeedbackRecord> = records.iter().filter(|r| !r.is_peer_review()).collect();
    let total_submissions = own.len();

    if scope.department.is_some() && total_submissions < MINIMUM_GROUP_SIZE {
        return InsightReport {
            scope,
            total_submissions,
            detail: None,
        };
    }

    let scores = scope
        .role
        .sees_organisation()
        .then(|| department_scores(&own));
    let detail = InsightDetail {
        sentiment_counts: tally(&own),
        summaries: summaries(&own),
        topics: own
            .iter()
            .flat_map(|record| record.topics().iter().cloned())
            .collect(),
        monthly_trend: monthly_trend(&own),
        department_scores: scores,
    };

    InsightReport {
        scope,
        total_submissions,
        detail: Some(detail),
    }
}

fn tally(records: &[&FeedbackRecord]) -> SentimentCounts {
    let mut counts = SentimentCounts::default();
    for record in records {
        counts.record(record.sentiment());
    }
    counts
}

fn summaries(records: &[&FeedbackRecord]) -> Vec<SummaryEntry> {
    records
        .iter()
        .filter_map(|record| {
            record
                .summary()
                .filter(|summary| !summary.is_empty())
                .map(|summary| SummaryEntry {
                    summary: summary.to_owned(),
                    department: record.department().to_owned(),
                })
        })
        .collect()
}

fn monthly_trend(records: &[&FeedbackRecord]) -> Vec<MonthlyTrendEntry> {
    let mut buckets: BTreeMap<String, SentimentCounts> = BTreeMap::new();
    for record in records {
        buckets
            .entry(record.month_key())
            .or_default()
            .record(record.sentiment());
    }
    buckets
        .into_iter()
        .map(|(month, counts)| MonthlyTrendEntry {
            month,
            positive: counts.positive,
            negative: counts.negative,
            neutral: counts.neutral,
            total: counts.total(),
        })
        .collect()
}

fn department_scores(records: &[&FeedbackRecord]) -> BTreeMap<String, DepartmentScore> {
    let mut buckets: BTreeMap<String, SentimentCounts> = BTreeMap::new();
    for record in records {
        buckets
            .entry(record.department().to_owned())
            .or_default()
            .record(record.sentiment());
    }
    buckets
        .into_iter()
        .map(|(department, counts)| {
            let total = counts.total();
            let score = DepartmentScore {
                positive: counts.positive,
                negative: counts.negative,
                neutral: counts.neutral,
                total,
                score: percentage(counts.positive, total),
            };
            (department, score)
        })
        .collect()
}

#[cfg(test)]
#[path = "insights_tests.rs"]
mod tests;
