//! Tests for the feedback submission service.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use mockable::MockClock;
use rstest::{fixture, rstest};

use super::*;
use crate::domain::ports::{
    EnrichmentWrite, FeedbackRepositoryError, LanguageModelError, MockFeedbackRepository,
    MockLanguageModel,
};
use crate::domain::{CallerIdentity, ErrorCode, REDACTION_TOKEN, hash_identity};
use crate::test_support::at;

const ANALYSIS: &str = r#"{"sentiment": "negative", "topics": ["on-call"], "summary": "Too many pages."}"#;

fn caller() -> CallerIdentity {
    CallerIdentity::new(
        Some("Ada".into()),
        Some("Ada@Example.com".into()),
        Some("engineering".into()),
        vec!["employees".into()],
    )
}

#[fixture]
fn submission() -> FeedbackSubmission {
    FeedbackSubmission {
        caller: caller(),
        message: Some("Ping me at ada@example.com about on-call".into()),
        target_name: None,
        target_email: None,
    }
}

fn fixed_clock() -> Arc<MockClock> {
    let mut clock = MockClock::new();
    clock.expect_utc().return_const(at(2026, 3, 9));
    Arc::new(clock)
}

fn failing_model() -> MockLanguageModel {
    let mut model = MockLanguageModel::new();
    model
        .expect_complete()
        .times(1)
        .return_once(|_| Err(LanguageModelError::transport("connection reset")));
    model
}

#[rstest]
#[tokio::test]
async fn stores_an_anonymised_redacted_record(submission: FeedbackSubmission) {
    let stored = Arc::new(Mutex::new(None));
    let sink = Arc::clone(&stored);
    let mut repository = MockFeedbackRepository::new();
    repository
        .expect_insert()
        .times(1)
        .returning(move |record| {
            *sink.lock().expect("record sink") = Some(record.clone());
            Ok(())
        });

    let service = FeedbackService::new(Arc::new(repository), fixed_clock());
    let response = service.submit(submission).await.expect("submission stored");
    assert!(!response.is_peer_review);

    let record = stored
        .lock()
        .expect("record sink")
        .clone()
        .expect("record written");
    assert_eq!(record.id(), response.feedback_id);
    assert_eq!(record.submitter_handle(), &hash_identity("ada@example.com"));
    assert_eq!(record.department(), "engineering");
    assert_eq!(record.created_at(), at(2026, 3, 9));
    assert_eq!(
        record.message(),
        format!("Ping me at {REDACTION_TOKEN} about on-call")
    );
    assert!(record.enrichment().is_none());
}

#[rstest]
#[tokio::test]
async fn peer_reviews_carry_the_target_handle(mut submission: FeedbackSubmission) {
    submission.target_name = Some("Grace".into());
    submission.target_email = Some("grace@example.com".into());

    let mut repository = MockFeedbackRepository::new();
    repository
        .expect_insert()
        .withf(|record| {
            record
                .target()
                .is_some_and(|target| target.handle == hash_identity("GRACE@example.com"))
        })
        .times(1)
        .returning(|_| Ok(()));

    let service = FeedbackService::new(Arc::new(repository), fixed_clock());
    let response = service.submit(submission).await.expect("peer review stored");
    assert!(response.is_peer_review);
}

#[rstest]
#[case(Some("ADA@example.com"), "self_review")]
#[case(Some("not-an-email"), "invalid_email")]
#[tokio::test]
async fn invalid_submissions_never_reach_the_store(
    mut submission: FeedbackSubmission,
    #[case] target_email: Option<&str>,
    #[case] code: &str,
) {
    submission.target_name = Some("Someone".into());
    submission.target_email = target_email.map(str::to_owned);

    let mut repository = MockFeedbackRepository::new();
    repository.expect_insert().times(0);

    let service = FeedbackService::new(Arc::new(repository), Arc::new(MockClock::new()));
    let error = service.submit(submission).await.expect_err("rejected");
    assert_eq!(error.code(), ErrorCode::InvalidRequest);
    assert_eq!(
        error.details().and_then(|d| d.get("code")).and_then(|c| c.as_str()),
        Some(code)
    );
}

#[rstest]
#[tokio::test]
async fn store_failures_become_internal_errors(submission: FeedbackSubmission) {
    let mut repository = MockFeedbackRepository::new();
    repository
        .expect_insert()
        .times(1)
        .returning(|_| Err(FeedbackRepositoryError::query("disk full")));

    let service = FeedbackService::new(Arc::new(repository), fixed_clock());
    let error = service.submit(submission).await.expect_err("store failed");
    assert_eq!(error.code(), ErrorCode::InternalError);
}

#[rstest]
#[tokio::test]
async fn enrichment_failure_does_not_fail_the_submission(submission: FeedbackSubmission) {
    let mut repository = MockFeedbackRepository::new();
    repository.expect_insert().times(1).returning(|_| Ok(()));
    repository.expect_apply_enrichment().times(0);
    let repository: Arc<dyn FeedbackRepository> = Arc::new(repository);

    let pipeline = EnrichmentPipeline::new(Arc::new(failing_model()), Arc::clone(&repository));
    let service = FeedbackService::new(repository, fixed_clock())
        .with_enrichment(pipeline, EnrichmentDispatch::Inline);

    let response = service.submit(submission).await;
    assert!(response.is_ok());
}

#[rstest]
#[tokio::test]
async fn inline_enrichment_applies_before_responding(submission: FeedbackSubmission) {
    let mut model = MockLanguageModel::new();
    model
        .expect_complete()
        .times(1)
        .return_once(|_| Ok(ANALYSIS.to_owned()));
    let mut repository = MockFeedbackRepository::new();
    repository.expect_insert().times(1).returning(|_| Ok(()));
    repository
        .expect_apply_enrichment()
        .withf(|_, enrichment| enrichment.topics == ["on-call"])
        .times(1)
        .returning(|_, _| Ok(EnrichmentWrite::Applied));
    let repository: Arc<dyn FeedbackRepository> = Arc::new(repository);

    let pipeline = EnrichmentPipeline::new(Arc::new(model), Arc::clone(&repository));
    let service = FeedbackService::new(repository, fixed_clock())
        .with_enrichment(pipeline, EnrichmentDispatch::Inline);

    service.submit(submission).await.expect("submission stored");
}

#[rstest]
#[tokio::test]
async fn detached_enrichment_runs_inside_the_request_trace(submission: FeedbackSubmission) {
    let trace_id = TraceId::generate();
    let observed = Arc::new(Mutex::new(None));
    let done = Arc::new(AtomicBool::new(false));

    let mut model = MockLanguageModel::new();
    let observed_sink = Arc::clone(&observed);
    let done_flag = Arc::clone(&done);
    model.expect_complete().times(1).returning(move |_| {
        *observed_sink.lock().expect("trace sink") = TraceId::current();
        done_flag.store(true, Ordering::SeqCst);
        Err(LanguageModelError::unavailable("offline"))
    });
    let mut repository = MockFeedbackRepository::new();
    repository.expect_insert().times(1).returning(|_| Ok(()));
    let repository: Arc<dyn FeedbackRepository> = Arc::new(repository);

    let pipeline = EnrichmentPipeline::new(Arc::new(model), Arc::clone(&repository));
    let service = FeedbackService::new(repository, fixed_clock())
        .with_enrichment(pipeline, EnrichmentDispatch::Detached);

    TraceId::scope(trace_id, service.submit(submission))
        .await
        .expect("submission stored");

    tokio::time::timeout(Duration::from_secs(5), async {
        while !done.load(Ordering::SeqCst) {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("detached enrichment ran");
    assert_eq!(*observed.lock().expect("trace sink"), Some(trace_id));
}
