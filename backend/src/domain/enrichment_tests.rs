//! Tests for the enrichment pipeline.

use std::sync::Arc;

use mockall::predicate::eq;
use rstest::{fixture, rstest};
use serde_json::json;

use super::*;
use crate::domain::ports::{MockFeedbackArchive, MockFeedbackRepository, MockLanguageModel};
use crate::test_support::{RecordBuilder, at};

const ANALYSIS: &str =
    r#"{"sentiment": "positive", "topics": ["mentoring", "career growth"], "summary": "Mentoring helps."}"#;

#[fixture]
fn record() -> FeedbackRecord {
    RecordBuilder::new("ada@example.com", "engineering")
        .message("My mentor is great")
        .created_at(at(2026, 4, 2))
        .build()
}

fn model_returning(text: &'static str) -> MockLanguageModel {
    let mut model = MockLanguageModel::new();
    model
        .expect_complete()
        .withf(|request| {
            request.max_tokens == ENRICHMENT_MAX_TOKENS
                && request.prompt.contains("\"\"\"My mentor is great\"\"\"")
        })
        .times(1)
        .return_once(move |_| Ok(text.to_owned()));
    model
}

fn repository_answering(write: EnrichmentWrite, id: FeedbackId) -> MockFeedbackRepository {
    let mut repository = MockFeedbackRepository::new();
    repository
        .expect_apply_enrichment()
        .with(eq(id), mockall::predicate::always())
        .times(1)
        .return_once(move |_, _| Ok(write));
    repository
}

#[rstest]
fn prompt_wraps_message_in_triple_quotes() {
    let prompt = enrichment_prompt("hello");
    assert!(prompt.starts_with("You are an HR analytics assistant."));
    assert!(prompt.ends_with("Feedback:\n\"\"\"hello\"\"\""));
}

#[rstest]
#[case(json!({"sentiment": "neutral", "summary": "Fine."}), 0)]
#[case(json!({"sentiment": "neutral", "topics": null, "summary": "Fine."}), 0)]
#[case(json!({"sentiment": "NEUTRAL", "topics": ["a", "b"], "summary": "Fine."}), 2)]
fn parse_accepts_valid_shapes(#[case] payload: serde_json::Value, #[case] topics: usize) {
    let enrichment = parse_enrichment(&payload.to_string()).expect("valid analysis");
    assert_eq!(enrichment.sentiment, Sentiment::Neutral);
    assert_eq!(enrichment.topics.len(), topics);
}

#[rstest]
#[case(json!(["positive"]))]
#[case(json!({"sentiment": "mixed", "topics": [], "summary": "x"}))]
#[case(json!({"topics": [], "summary": "x"}))]
#[case(json!({"sentiment": "positive", "topics": "tooling", "summary": "x"}))]
#[case(json!({"sentiment": "positive", "topics": [1], "summary": "x"}))]
#[case(json!({"sentiment": "positive", "topics": []}))]
#[case(json!({"sentiment": "positive", "topics": [], "summary": "  "}))]
fn parse_rejects_invalid_shapes(#[case] payload: serde_json::Value) {
    let result = parse_enrichment(&payload.to_string());
    assert!(matches!(result, Err(EnrichmentError::Schema { .. })));
}

#[rstest]
fn parse_reports_non_json_text() {
    assert!(matches!(
        parse_enrichment("I cannot help with that."),
        Err(EnrichmentError::Json(_))
    ));
}

#[rstest]
fn archive_object_uses_month_key_and_camel_case(record: FeedbackRecord) {
    let enriched = record.with_enrichment(Enrichment {
        sentiment: Sentiment::Positive,
        topics: vec!["mentoring".into()],
        summary: "Mentoring helps.".into(),
    });
    let object = archive_object(&enriched).expect("serialises");
    assert_eq!(object.key, format!("exports/2026-04/{}.json", enriched.id()));
    assert_eq!(object.content_type, "application/json");

    let body: serde_json::Value = serde_json::from_slice(&object.body).expect("json body");
    assert_eq!(body["feedbackId"], json!(enriched.id().to_string()));
    assert_eq!(body["emailHash"], json!(enriched.submitter_handle().as_str()));
    assert_eq!(body["isPeerReview"], json!(false));
    assert_eq!(body["sentiment"], json!("positive"));
    assert!(body.get("targetEmailHash").is_none());
    assert!(body.get("email").is_none());
}

#[rstest]
#[tokio::test]
async fn enrich_applies_and_archives(record: FeedbackRecord) {
    let mut archive = MockFeedbackArchive::new();
    let expected_key = archive_key(&record);
    archive
        .expect_put()
        .withf(move |object| object.key == expected_key)
        .times(1)
        .return_once(|_| Ok(()));

    let pipeline = EnrichmentPipeline::new(
        Arc::new(model_returning(ANALYSIS)),
        Arc::new(repository_answering(EnrichmentWrite::Applied, record.id())),
    )
    .with_archive(Arc::new(archive));

    let outcome = pipeline.enrich(&record).await.expect("enrichment succeeds");
    assert_eq!(outcome, EnrichmentOutcome::Enriched { archived: true });
}

#[rstest]
#[tokio::test]
async fn archive_failure_keeps_enrichment(record: FeedbackRecord) {
    let mut archive = MockFeedbackArchive::new();
    archive
        .expect_put()
        .times(1)
        .return_once(|_| Err(FeedbackArchiveError::io("disk full")));

    let pipeline = EnrichmentPipeline::new(
        Arc::new(model_returning(ANALYSIS)),
        Arc::new(repository_answering(EnrichmentWrite::Applied, record.id())),
    )
    .with_archive(Arc::new(archive));

    let outcome = pipeline.enrich(&record).await.expect("enrichment succeeds");
    assert_eq!(outcome, EnrichmentOutcome::Enriched { archived: false });
}

#[rstest]
#[tokio::test]
async fn already_enriched_records_skip_the_archive(record: FeedbackRecord) {
    let mut archive = MockFeedbackArchive::new();
    archive.expect_put().times(0);

    let pipeline = EnrichmentPipeline::new(
        Arc::new(model_returning(ANALYSIS)),
        Arc::new(repository_answering(
            EnrichmentWrite::AlreadyEnriched,
            record.id(),
        )),
    )
    .with_archive(Arc::new(archive));

    let outcome = pipeline.enrich(&record).await.expect("no error");
    assert_eq!(outcome, EnrichmentOutcome::AlreadyEnriched);
}

#[rstest]
#[tokio::test]
async fn malformed_analysis_never_touches_the_store(record: FeedbackRecord) {
    let mut repository = MockFeedbackRepository::new();
    repository.expect_apply_enrichment().times(0);

    let pipeline = EnrichmentPipeline::new(
        Arc::new(model_returning(r#"{"sentiment": "ecstatic"}"#)),
        Arc::new(repository),
    );

    let result = pipeline.enrich(&record).await;
    assert!(matches!(result, Err(EnrichmentError::Schema { .. })));
}

#[rstest]
#[tokio::test]
async fn model_errors_propagate_as_enrichment_errors(record: FeedbackRecord) {
    let mut model = MockLanguageModel::new();
    model
        .expect_complete()
        .return_once(|_| Err(LanguageModelError::transport("timed out")));
    let mut repository = MockFeedbackRepository::new();
    repository.expect_apply_enrichment().times(0);

    let pipeline = EnrichmentPipeline::new(Arc::new(model), Arc::new(repository));
    let result = pipeline.enrich(&record).await;
    assert!(matches!(result, Err(EnrichmentError::Model(_))));
}

#[rstest]
#[tokio::test]
async fn run_swallows_failures(record: FeedbackRecord) {
    let mut model = MockLanguageModel::new();
    model
        .expect_complete()
        .times(1)
        .return_once(|_| Err(LanguageModelError::status(500_u16, "boom")));
    let pipeline = EnrichmentPipeline::new(Arc::new(model), Arc::new(MockFeedbackRepository::new()));
    pipeline.run(record).await;
}
