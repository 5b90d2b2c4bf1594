//! Service stack over in-memory adapters for HTTP integration tests.
//!
//! The stack wires the real domain services to the in-memory repository and a
//! scripted language model so requests exercise every layer except I/O.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use actix_web::test::TestRequest;
use async_trait::async_trait;
use backend::domain::ports::{
    ArchiveObject, CompletionRequest, FeedbackArchive, FeedbackArchiveError, FeedbackQuery,
    FeedbackRepository, LanguageModel, LanguageModelError,
};
use backend::domain::{
    EnrichmentDispatch, EnrichmentPipeline, FeedbackRecord, FeedbackService, InsightsService,
    PeerReviewService, RoadmapService,
};
use backend::inbound::http::identity::{
    CLAIM_DEPARTMENT_HEADER, CLAIM_EMAIL_HEADER, CLAIM_GROUPS_HEADER, CLAIM_NAME_HEADER,
};
use backend::inbound::http::state::{HttpState, HttpStatePorts};
use backend::outbound::memory::InMemoryFeedbackRepository;
use mockable::DefaultClock;

pub(crate) const ANALYSIS_PROMPT_PREFIX: &str = "You are an HR analytics assistant.";

pub(crate) const POSITIVE_ANALYSIS: &str =
    r#"{"sentiment": "positive", "topics": ["mentoring"], "summary": "Mentoring is working."}"#;

pub(crate) const ROADMAP_ANSWER: &str = r#"Sure! {
    "currentState": {
        "dominantSentiment": "positive",
        "trend": "improving",
        "recurringTopics": ["mentoring"],
        "summary": "Steady progress."
    },
    "focusAreas": [
        {"area": "Delegation", "reason": "Workload", "action": "Hand off one task"},
        {"area": "Visibility", "reason": "Growth", "action": "Demo your work"}
    ],
    "plan": {
        "thirtyDays": "List recurring tasks.",
        "sixtyDays": "Delegate two of them.",
        "ninetyDays": "Review the outcome."
    },
    "encouragement": "Keep going."
}"#;

/// Language model answering analysis and roadmap prompts from fixed text.
///
/// `None` makes the corresponding prompt fail with a status error.
#[derive(Debug, Default)]
pub(crate) struct ScriptedModel {
    analysis: Option<&'static str>,
    roadmap: Option<&'static str>,
    calls: AtomicUsize,
}

impl ScriptedModel {
    pub(crate) fn new(analysis: Option<&'static str>, roadmap: Option<&'static str>) -> Self {
        Self {
            analysis,
            roadmap,
            calls: AtomicUsize::new(0),
        }
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LanguageModel for ScriptedModel {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, LanguageModelError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let answer = if request.prompt.starts_with(ANALYSIS_PROMPT_PREFIX) {
            self.analysis
        } else {
            self.roadmap
        };
        answer
            .map(str::to_owned)
            .ok_or_else(|| LanguageModelError::status(503_u16, "model overloaded"))
    }
}

/// Archive that refuses every object.
#[derive(Debug, Default)]
pub(crate) struct FailingArchive;

#[async_trait]
impl FeedbackArchive for FailingArchive {
    async fn put(&self, _object: &ArchiveObject) -> Result<(), FeedbackArchiveError> {
        Err(FeedbackArchiveError::io("archive volume unavailable"))
    }
}

/// Real services over an in-memory store.
pub(crate) struct Stack {
    pub(crate) repository: Arc<InMemoryFeedbackRepository>,
    pub(crate) model: Arc<ScriptedModel>,
    pub(crate) state: HttpState,
}

impl Stack {
    /// Build a stack whose store pages every `page_size` records.
    pub(crate) fn new(page_size: usize, model: ScriptedModel) -> Self {
        Self::with_archive(page_size, model, None)
    }

    pub(crate) fn with_archive(
        page_size: usize,
        model: ScriptedModel,
        archive: Option<Arc<dyn FeedbackArchive>>,
    ) -> Self {
        let repository = Arc::new(InMemoryFeedbackRepository::new(page_size));
        let model = Arc::new(model);
        let store: Arc<dyn FeedbackRepository> = repository.clone();
        let language_model: Arc<dyn LanguageModel> = model.clone();

        let mut pipeline = EnrichmentPipeline::new(language_model.clone(), store.clone());
        if let Some(archive) = archive {
            pipeline = pipeline.with_archive(archive);
        }
        let feedback = FeedbackService::new(store.clone(), Arc::new(DefaultClock))
            .with_enrichment(pipeline, EnrichmentDispatch::Inline);

        let state = HttpState::new(HttpStatePorts {
            feedback: Arc::new(feedback),
            insights: Arc::new(InsightsService::new(store.clone())),
            reviews: Arc::new(PeerReviewService::new(store.clone())),
            roadmap: Arc::new(RoadmapService::new(store, language_model)),
        });

        Self {
            repository,
            model,
            state,
        }
    }

    /// Every stored record, oldest first.
    pub(crate) async fn stored(&self) -> Vec<FeedbackRecord> {
        let mut records = Vec::new();
        let mut after = None;
        loop {
            let (items, next) = self
                .repository
                .query(&FeedbackQuery::all(), after.take())
                .await
                .expect("in-memory query")
                .into_parts();
            records.extend(items);
            match next {
                Some(token) => after = Some(token),
                None => return records,
            }
        }
    }
}

/// Gateway claims for one caller.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Caller<'a> {
    pub(crate) name: &'a str,
    pub(crate) email: &'a str,
    pub(crate) department: &'a str,
    pub(crate) groups: &'a str,
}

impl<'a> Caller<'a> {
    pub(crate) const fn employee(name: &'a str, email: &'a str, department: &'a str) -> Self {
        Self {
            name,
            email,
            department,
            groups: "employees",
        }
    }

    pub(crate) const fn in_groups(mut self, groups: &'a str) -> Self {
        self.groups = groups;
        self
    }

    pub(crate) fn apply(self, req: TestRequest) -> TestRequest {
        req.insert_header((CLAIM_NAME_HEADER, self.name))
            .insert_header((CLAIM_EMAIL_HEADER, self.email))
            .insert_header((CLAIM_DEPARTMENT_HEADER, self.department))
            .insert_header((CLAIM_GROUPS_HEADER, self.groups))
    }
}
