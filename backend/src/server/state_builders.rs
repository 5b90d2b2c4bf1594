//! Builders for driven adapters and the HTTP state wired over them.

use std::sync::Arc;

use color_eyre::eyre::{Context, Result};
use mockable::DefaultClock;
use reqwest::Url;
use tracing::{info, warn};

use backend::domain::ports::{
    FeedbackArchive, FeedbackRepository, FixtureLanguageModel, LanguageModel,
};
use backend::domain::{
    EnrichmentDispatch, EnrichmentPipeline, FeedbackService, InsightsService, PeerReviewService,
    RoadmapService,
};
use backend::inbound::http::state::{HttpState, HttpStatePorts};
use backend::outbound::archive::CapStdFeedbackArchive;
use backend::outbound::llm::{AnthropicHttpModel, AnthropicIdentity};
use backend::outbound::memory::InMemoryFeedbackRepository;
use backend::outbound::persistence::{
    DbPool, DieselFeedbackRepository, PoolConfig, run_migrations,
};
use backend::settings::AppSettings;

use super::config::Adapters;

/// PostgreSQL when a URL is configured, otherwise the in-memory store.
async fn build_repository(settings: &AppSettings) -> Result<Arc<dyn FeedbackRepository>> {
    let page_size = settings.store_page_size();
    let Some(url) = settings.database_url.as_deref() else {
        warn!("no database configured; feedback is kept in memory only");
        return Ok(Arc::new(InMemoryFeedbackRepository::new(page_size)));
    };

    run_migrations(url)
        .await
        .wrap_err("database migrations failed")?;
    let pool = DbPool::new(PoolConfig::new(url))
        .await
        .wrap_err("database pool construction failed")?;
    info!(page_size, "using PostgreSQL feedback store");
    Ok(Arc::new(DieselFeedbackRepository::new(pool, page_size)))
}

/// The Messages API client when a key is configured, otherwise a fixture
/// that always fails.
fn build_language_model(settings: &AppSettings) -> Result<Arc<dyn LanguageModel>> {
    let Some(api_key) = settings.llm_api_key.clone() else {
        warn!("no language model key configured; enrichment and roadmaps are disabled");
        return Ok(Arc::new(FixtureLanguageModel));
    };

    let endpoint = Url::parse(settings.llm_endpoint())
        .wrap_err_with(|| format!("invalid model endpoint {}", settings.llm_endpoint()))?;
    let identity = AnthropicIdentity {
        api_key,
        model: settings.llm_model().to_owned(),
    };
    let model = AnthropicHttpModel::new(endpoint, settings.llm_timeout(), identity)
        .wrap_err("failed to build model HTTP client")?;
    Ok(Arc::new(model))
}

fn build_archive(settings: &AppSettings) -> Result<Option<Arc<dyn FeedbackArchive>>> {
    let Some(dir) = settings.archive_dir.as_ref() else {
        return Ok(None);
    };
    let archive = CapStdFeedbackArchive::open(dir)
        .wrap_err_with(|| format!("failed to open archive directory {}", dir.display()))?;
    info!(path = %dir.display(), "archiving enriched feedback");
    Ok(Some(Arc::new(archive)))
}

/// Construct every driven adapter from settings.
pub(crate) async fn build_adapters(settings: &AppSettings) -> Result<Adapters> {
    Ok(Adapters::new(
        build_repository(settings).await?,
        build_language_model(settings)?,
        build_archive(settings)?,
    ))
}

/// Wire the domain services over `adapters`.
///
/// Enrichment runs detached so responses never wait on the model.
pub(super) fn build_http_state(adapters: &Adapters, allow_body_identity: bool) -> HttpState {
    let Adapters {
        repository,
        model,
        archive,
    } = adapters.clone();

    let mut pipeline = EnrichmentPipeline::new(model.clone(), repository.clone());
    if let Some(archive) = archive {
        pipeline = pipeline.with_archive(archive);
    }
    let feedback = FeedbackService::new(repository.clone(), Arc::new(DefaultClock))
        .with_enrichment(pipeline, EnrichmentDispatch::Detached);

    HttpState::new(HttpStatePorts {
        feedback: Arc::new(feedback),
        insights: Arc::new(InsightsService::new(repository.clone())),
        reviews: Arc::new(PeerReviewService::new(repository.clone())),
        roadmap: Arc::new(RoadmapService::new(repository, model)),
    })
    .with_body_identity(allow_body_identity)
}
