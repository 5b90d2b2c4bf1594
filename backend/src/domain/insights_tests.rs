//! Tests for insight aggregation.

use rstest::rstest;

use super::*;
use crate::test_support::{RecordBuilder, at};

fn manager_scope(department: &str) -> InsightScope {
    InsightScope {
        role: Role::Manager,
        department: Some(department.to_owned()),
    }
}

fn organisation_scope(role: Role) -> InsightScope {
    InsightScope {
        role,
        department: None,
    }
}

fn self_feedback(count: usize, department: &str) -> Vec<FeedbackRecord> {
    (0..count)
        .map(|i| {
            RecordBuilder::new(&format!("user{i}@example.com"), department)
                .sentiment(Sentiment::Positive)
                .build()
        })
        .collect()
}

#[rstest]
#[case(4, false)]
#[case(5, true)]
fn manager_gate_opens_at_minimum_group_size(#[case] count: usize, #[case] met: bool) {
    let report = aggregate(manager_scope("sales"), &self_feedback(count, "sales"));
    assert_eq!(report.total_submissions, count);
    assert_eq!(report.minimum_threshold_met(), met);
}

#[rstest]
fn peer_reviews_do_not_count_towards_the_gate() {
    let mut records = self_feedback(4, "sales");
    records.push(
        RecordBuilder::new("peer@example.com", "sales")
            .peer_review_of("someone@example.com")
            .sentiment(Sentiment::Negative)
            .build(),
    );
    let report = aggregate(manager_scope("sales"), &records);
    assert_eq!(report.total_submissions, 4);
    assert!(report.detail.is_none());
}

#[rstest]
#[case(Role::HrAdmin)]
#[case(Role::SuperAdmin)]
fn organisation_roles_bypass_the_gate(#[case] role: Role) {
    let report = aggregate(organisation_scope(role), &self_feedback(1, "sales"));
    assert!(report.minimum_threshold_met());
}

#[rstest]
fn manager_reports_have_no_department_scores() {
    let report = aggregate(manager_scope("sales"), &self_feedback(5, "sales"));
    let detail = report.detail.expect("gate passes");
    assert!(detail.department_scores.is_none());
}

#[rstest]
fn unenriched_records_count_as_neutral() {
    let records = vec![
        RecordBuilder::new("a@example.com", "ops").build(),
        RecordBuilder::new("b@example.com", "ops")
            .sentiment(Sentiment::Negative)
            .build(),
    ];
    let detail = aggregate(organisation_scope(Role::HrAdmin), &records)
        .detail
        .expect("no gate");
    assert_eq!(
        detail.sentiment_counts,
        SentimentCounts {
            positive: 0,
            negative: 1,
            neutral: 1,
        }
    );
}

#[rstest]
fn peer_reviews_are_excluded_from_every_total() {
    let records = vec![
        RecordBuilder::new("a@example.com", "ops")
            .sentiment(Sentiment::Positive)
            .build(),
        RecordBuilder::new("b@example.com", "ops")
            .peer_review_of("c@example.com")
            .enriched(Sentiment::Negative, &["conflict"], "Peer summary.")
            .build(),
    ];
    let detail = aggregate(organisation_scope(Role::SuperAdmin), &records)
        .detail
        .expect("no gate");

    assert_eq!(detail.sentiment_counts.total(), 1);
    assert_eq!(
        detail.monthly_trend.iter().map(|m| m.total).sum::<u64>(),
        1
    );
    let scores = detail.department_scores.expect("admin scores");
    assert_eq!(scores.get("ops").map(|s| s.total), Some(1));
    assert!(!detail.topics.contains(&"conflict".to_owned()));
    assert!(detail.summaries.iter().all(|s| s.summary != "Peer summary."));
}

#[rstest]
fn monthly_trend_is_sorted_and_consistent() {
    let records = vec![
        RecordBuilder::new("a@example.com", "ops")
            .created_at(at(2026, 3, 2))
            .sentiment(Sentiment::Positive)
            .build(),
        RecordBuilder::new("b@example.com", "ops")
            .created_at(at(2025, 12, 30))
            .sentiment(Sentiment::Negative)
            .build(),
        RecordBuilder::new("c@example.com", "ops")
            .created_at(at(2026, 3, 20))
            .build(),
        RecordBuilder::new("d@example.com", "ops")
            .created_at(at(2026, 1, 5))
            .sentiment(Sentiment::Positive)
            .build(),
    ];
    let trend = aggregate(organisation_scope(Role::HrAdmin), &records)
        .detail
        .expect("no gate")
        .monthly_trend;

    let months: Vec<&str> = trend.iter().map(|m| m.month.as_str()).collect();
    assert_eq!(months, ["2025-12", "2026-01", "2026-03"]);
    for bucket in &trend {
        assert_eq!(bucket.positive + bucket.negative + bucket.neutral, bucket.total);
    }
    let march = trend.last().expect("march bucket");
    assert_eq!((march.positive, march.neutral, march.total), (1, 1, 2));
}

#[rstest]
fn department_score_is_rounded_percentage_of_positive() {
    let mut records: Vec<FeedbackRecord> = (0..3)
        .map(|i| {
            RecordBuilder::new(&format!("p{i}@example.com"), "finance")
                .sentiment(Sentiment::Positive)
                .build()
        })
        .collect();
    records.push(
        RecordBuilder::new("n@example.com", "finance")
            .sentiment(Sentiment::Negative)
            .build(),
    );
    let scores = aggregate(organisation_scope(Role::HrAdmin), &records)
        .detail
        .and_then(|d| d.department_scores)
        .expect("admin scores");
    assert_eq!(
        scores.get("finance"),
        Some(&DepartmentScore {
            positive: 3,
            negative: 1,
            neutral: 0,
            total: 4,
            score: 75,
        })
    );
}

#[rstest]
fn summaries_and_topics_follow_record_order() {
    let records = vec![
        RecordBuilder::new("a@example.com", "ops")
            .enriched(Sentiment::Positive, &["tooling", "ci"], "CI is fast.")
            .build(),
        RecordBuilder::new("b@example.com", "hr").build(),
        RecordBuilder::new("c@example.com", "hr")
            .enriched(Sentiment::Neutral, &["tooling"], "Laptops are fine.")
            .build(),
    ];
    let detail = aggregate(organisation_scope(Role::HrAdmin), &records)
        .detail
        .expect("no gate");
    assert_eq!(detail.topics, ["tooling", "ci", "tooling"]);
    assert_eq!(
        detail.summaries,
        vec![
            SummaryEntry {
                summary: "CI is fast.".into(),
                department: "ops".into(),
            },
            SummaryEntry {
                summary: "Laptops are fine.".into(),
                department: "hr".into(),
            },
        ]
    );
}

#[rstest]
#[case(0, 0, 0)]
#[case(1, 2, 50)]
#[case(2, 3, 67)]
#[case(1, 3, 33)]
#[case(4, 4, 100)]
fn percentage_rounds_half_up(#[case] part: u64, #[case] total: u64, #[case] expected: u64) {
    assert_eq!(percentage(part, total), expected);
}
