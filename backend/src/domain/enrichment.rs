//! Best-effort AI enrichment of stored feedback.
//!
//! The pipeline asks the language model for sentiment, topics, and a summary,
//! validates the answer, applies it to the stored record once, and mirrors the
//! enriched record to the archive when one is configured. Failures surface as
//! [`EnrichmentError`] so the submission service can log and drop them; they
//! never reach the caller.

use std::sync::Arc;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::domain::ports::{
    ArchiveObject, CompletionRequest, EnrichmentWrite, FeedbackArchive, FeedbackArchiveError,
    FeedbackRepository, FeedbackRepositoryError, LanguageModel, LanguageModelError,
};
use crate::domain::{
    Enrichment, FeedbackId, FeedbackRecord, ModelJsonError, Sentiment, extract_json,
};

/// Output token ceiling for the analysis prompt.
pub const ENRICHMENT_MAX_TOKENS: u32 = 256;

/// Sampling temperature for the analysis prompt.
pub const ENRICHMENT_TEMPERATURE: f32 = 0.0;

/// Failures inside the enrichment tier.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EnrichmentError {
    /// The model call failed.
    #[error(transparent)]
    Model(#[from] LanguageModelError),
    /// The model text held no JSON.
    #[error(transparent)]
    Json(#[from] ModelJsonError),
    /// The JSON did not match the expected analysis shape.
    #[error("model analysis rejected: {message}")]
    Schema {
        /// What was wrong with the payload.
        message: String,
    },
    /// The conditional store update failed.
    #[error(transparent)]
    Store(#[from] FeedbackRepositoryError),
}

impl EnrichmentError {
    fn schema(message: impl Into<String>) -> Self {
        Self::Schema {
            message: message.into(),
        }
    }
}

/// What the pipeline did with a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnrichmentOutcome {
    /// Enrichment was written; `archived` reports the mirror step.
    Enriched {
        /// Whether the archive accepted the record.
        archived: bool,
    },
    /// Another writer enriched the record first.
    AlreadyEnriched,
    /// The record no longer exists.
    Missing,
}

/// Build the analysis prompt for a redacted message.
#[must_use]
pub fn enrichment_prompt(message: &str) -> String {
    format!(
        "You are an HR analytics assistant. Analyze the following employee feedback.\n\
         \n\
         Return a JSON object with exactly these fields:\n\
         - sentiment: one of \"positive\", \"negative\", or \"neutral\"\n\
         - topics: an array of short topic strings (1-4 words each)\n\
         - summary: a single sentence summarizing the feedback\n\
         \n\
         Respond with JSON only, no additional text.\n\
         \n\
         Feedback:\n\
         \"\"\"{message}\"\"\""
    )
}

/// Validate model text into an [`Enrichment`].
///
/// # Examples
/// ```
/// use backend::domain::{parse_enrichment, Sentiment};
///
/// let text = r#"{"sentiment": "Negative", "topics": ["on-call"], "summary": "Too many pages."}"#;
/// let enrichment = parse_enrichment(text).expect("valid analysis");
/// assert_eq!(enrichment.sentiment, Sentiment::Negative);
/// ```
pub fn parse_enrichment(text: &str) -> Result<Enrichment, EnrichmentError> {
    let value = extract_json(text)?;
    let Value::Object(fields) = value else {
        return Err(EnrichmentError::schema("analysis must be a JSON object"));
    };

    let sentiment = fields
        .get("sentiment")
        .and_then(Value::as_str)
        .ok_or_else(|| EnrichmentError::schema("sentiment must be a string"))?
        .parse::<Sentiment>()
        .map_err(|err| EnrichmentError::schema(err.to_string()))?;

    let topics = match fields.get("topics") {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| {
                item.as_str()
                    .map(str::to_owned)
                    .ok_or_else(|| EnrichmentError::schema("topics must be strings"))
            })
            .collect::<Result<Vec<_>, _>>()?,
        Some(_) => return Err(EnrichmentError::schema("topics must be an array")),
    };

    let summary = fields
        .get("summary")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|summary| !summary.is_empty())
        .ok_or_else(|| EnrichmentError::schema("summary must be a non-empty string"))?
        .to_owned();

    Ok(Enrichment {
        sentiment,
        topics,
        summary,
    })
}

/// Archive key for a record: `exports/{YYYY-MM}/{id}.json`.
#[must_use]
pub fn archive_key(record: &FeedbackRecord) -> String {
    format!("exports/{}/{}.json", record.month_key(), record.id())
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ArchivedFeedback<'a> {
    feedback_id: FeedbackId,
    name: &'a str,
    email_hash: &'a str,
    message: &'a str,
    department: &'a str,
    is_peer_review: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    target_name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    target_email_hash: Option<&'a str>,
    sentiment: Option<Sentiment>,
    topics: &'a [String],
    summary: Option<&'a str>,
    timestamp: String,
}

fn timestamp(created_at: DateTime<Utc>) -> String {
    created_at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Serialise an enriched record into its archive object.
pub fn archive_object(record: &FeedbackRecord) -> Result<ArchiveObject, serde_json::Error> {
    let body = ArchivedFeedback {
        feedback_id: record.id(),
        name: record.submitter_name(),
        email_hash: record.submitter_handle().as_str(),
        message: record.message(),
        department: record.department(),
        is_peer_review: record.is_peer_review(),
        target_name: record.target().map(|t| t.name.as_str()),
        target_email_hash: record.target().map(|t| t.handle.as_str()),
        sentiment: record.sentiment(),
        topics: record.topics(),
        summary: record.summary(),
        timestamp: timestamp(record.created_at()),
    };
    Ok(ArchiveObject {
        key: archive_key(record),
        body: serde_json::to_vec(&body)?,
        content_type: "application/json",
    })
}

/// Enrichment orchestration over the model, store, and archive ports.
#[derive(Clone)]
pub struct EnrichmentPipeline {
    model: Arc<dyn LanguageModel>,
    repository: Arc<dyn FeedbackRepository>,
    archive: Option<Arc<dyn FeedbackArchive>>,
}

impl EnrichmentPipeline {
    /// Create a pipeline without archival.
    pub fn new(model: Arc<dyn LanguageModel>, repository: Arc<dyn FeedbackRepository>) -> Self {
        Self {
            model,
            repository,
            archive: None,
        }
    }

    /// Mirror enriched records to `archive`.
    #[must_use]
    pub fn with_archive(mut self, archive: Arc<dyn FeedbackArchive>) -> Self {
        self.archive = Some(archive);
        self
    }

    /// Analyse `record`, apply the result once, and archive it.
    ///
    /// Archive failures are logged and reported via
    /// [`EnrichmentOutcome::Enriched`]`{ archived: false }`.
    pub async fn enrich(
        &self,
        record: &FeedbackRecord,
    ) -> Result<EnrichmentOutcome, EnrichmentError> {
        let request = CompletionRequest {
            prompt: enrichment_prompt(record.message()),
            max_tokens: ENRICHMENT_MAX_TOKENS,
            temperature: ENRICHMENT_TEMPERATURE,
        };
        let text = self.model.complete(&request).await?;
        let enrichment = parse_enrichment(&text)?;

        match self
            .repository
            .apply_enrichment(&record.id(), &enrichment)
            .await?
        {
            EnrichmentWrite::Applied => {
                let enriched = record.clone().with_enrichment(enrichment);
                let archived = self.archive(&enriched).await;
                Ok(EnrichmentOutcome::Enriched { archived })
            }
            EnrichmentWrite::AlreadyEnriched => Ok(EnrichmentOutcome::AlreadyEnriched),
            EnrichmentWrite::Missing => Ok(EnrichmentOutcome::Missing),
        }
    }

    async fn archive(&self, record: &FeedbackRecord) -> bool {
        let Some(archive) = &self.archive else {
            return false;
        };
        let object = match archive_object(record) {
            Ok(object) => object,
            Err(error) => {
                warn!(feedback_id = %record.id(), %error, "failed to serialise archive object");
                return false;
            }
        };
        match archive.put(&object).await {
            Ok(()) => true,
            Err(FeedbackArchiveError::AlreadyExists { .. }) => {
                debug!(feedback_id = %record.id(), "archive object already present");
                false
            }
            Err(error) => {
                warn!(feedback_id = %record.id(), %error, "archiving enriched feedback failed");
                false
            }
        }
    }

    /// Run [`Self::enrich`] and log the outcome; never fails.
    pub async fn run(&self, record: FeedbackRecord) {
        match self.enrich(&record).await {
            Ok(outcome) => info!(feedback_id = %record.id(), ?outcome, "feedback enrichment finished"),
            Err(error) => warn!(
                feedback_id = %record.id(),
                %error,
                "feedback enrichment failed (non-fatal)"
            ),
        }
    }
}

#[cfg(test)]
#[path = "enrichment_tests.rs"]
mod tests;
