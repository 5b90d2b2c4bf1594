//! Personal growth roadmap synthesis.
//!
//! A roadmap is generated from the caller's own recent self-feedback. Unlike
//! enrichment, failures here are the caller's problem: a model or schema
//! failure becomes a [`RoadmapError`] which the roadmap service reports as an
//! internal error.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::LanguageModelError;
use crate::domain::{FeedbackRecord, ModelJsonError, extract_json};

/// Most recent self-submitted records fed to the model.
pub const ROADMAP_WINDOW: usize = 10;

/// Records required before a roadmap is generated.
pub const ROADMAP_MIN_RECORDS: usize = 2;

/// Focus areas kept from the model answer.
pub const MAX_FOCUS_AREAS: usize = 3;

/// Output token ceiling for the roadmap prompt.
pub const ROADMAP_MAX_TOKENS: u32 = 1024;

/// Sampling temperature for the roadmap prompt.
pub const ROADMAP_TEMPERATURE: f32 = 0.3;

/// Name used in the prompt when the caller has no name claim.
pub const DEFAULT_EMPLOYEE_NAME: &str = "Employee";

/// Message returned when too little feedback exists.
pub const NOT_ENOUGH_DATA_MESSAGE: &str =
    "Submit at least 2 pieces of feedback to unlock your personalised growth roadmap.";

/// Direction of the caller's sentiment over time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    /// Getting better.
    Improving,
    /// Getting worse.
    Declining,
    /// Roughly unchanged.
    Stable,
}

impl Trend {
    fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "improving" => Some(Self::Improving),
            "declining" => Some(Self::Declining),
            "stable" => Some(Self::Stable),
            _ => None,
        }
    }
}

/// Snapshot of where the caller stands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CurrentState {
    /// Prevailing sentiment label as phrased by the model.
    pub dominant_sentiment: String,
    /// Sentiment direction.
    pub trend: Trend,
    /// Topics that keep coming up.
    pub recurring_topics: Vec<String>,
    /// One-sentence overview.
    pub summary: String,
}

/// One area to work on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct FocusArea {
    /// What to focus on.
    pub area: String,
    /// Why it matters.
    pub reason: String,
    /// Concrete next step.
    pub action: String,
}

/// Thirty, sixty, and ninety day milestones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GrowthPlan {
    /// First month.
    pub thirty_days: String,
    /// Second month.
    pub sixty_days: String,
    /// Third month.
    pub ninety_days: String,
}

/// Validated roadmap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Roadmap {
    /// Current state.
    pub current_state: CurrentState,
    /// Between one and [`MAX_FOCUS_AREAS`] focus areas.
    pub focus_areas: Vec<FocusArea>,
    /// Milestone plan.
    pub plan: GrowthPlan,
    /// Closing encouragement.
    pub encouragement: String,
}

/// Result of a roadmap request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoadmapOutcome {
    /// Fewer than [`ROADMAP_MIN_RECORDS`] self-submitted records.
    NotEnoughData {
        /// All self-submitted records for the caller.
        total_submissions: usize,
    },
    /// A roadmap was generated.
    Generated {
        /// All self-submitted records for the caller.
        total_submissions: usize,
        /// Records in the analysed window.
        analyzed_submissions: usize,
        /// The roadmap itself.
        roadmap: Roadmap,
    },
}

/// Failures while generating a roadmap.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RoadmapError {
    /// The model call failed.
    #[error(transparent)]
    Model(#[from] LanguageModelError),
    /// The model text held no JSON.
    #[error(transparent)]
    Json(#[from] ModelJsonError),
    /// The JSON did not match the roadmap shape.
    #[error("model roadmap rejected: {message}")]
    Schema {
        /// What was wrong with the payload.
        message: String,
    },
}

/// Self-submitted history split into the total and the analysed window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoadmapHistory {
    /// Count of self-submitted records.
    pub total_submissions: usize,
    /// Up to [`ROADMAP_WINDOW`] most recent records, oldest first.
    pub window: Vec<FeedbackRecord>,
}

impl RoadmapHistory {
    /// Drop peer reviews and keep the most recent window.
    ///
    /// `records` must be ordered oldest first.
    #[must_use]
    pub fn from_records(records: Vec<FeedbackRecord>) -> Self {
        let own: Vec<FeedbackRecord> = records
            .into_iter()
            .filter(|record| !record.is_peer_review())
            .collect();
        let total_submissions = own.len();
        let window = own
            .into_iter()
            .skip(total_submissions.saturating_sub(ROADMAP_WINDOW))
            .collect();
        Self {
            total_submissions,
            window,
        }
    }

    /// Whether enough records exist to generate a roadmap.
    #[must_use]
    pub fn has_enough_data(&self) -> bool {
        self.window.len() >= ROADMAP_MIN_RECORDS
    }
}

fn transcript_entry(index: usize, record: &FeedbackRecord) -> String {
    let sentiment = record.sentiment().map_or("unknown", |s| s.as_str());
    let topics = if record.topics().is_empty() {
        "none".to_owned()
    } else {
        record.topics().join(", ")
    };
    format!(
        "{index}. [{date}] Sentiment: {sentiment} | Topics: {topics}\n   Feedback: \"{message}\"",
        date = record.created_at().format("%Y-%m-%d"),
        message = record.message(),
    )
}

/// Build the roadmap prompt for `name` over `window` (oldest first).
#[must_use]
pub fn roadmap_prompt(name: &str, window: &[FeedbackRecord]) -> String {
    let history = window
        .iter()
        .enumerate()
        .map(|(i, record)| transcript_entry(i + 1, record))
        .collect::<Vec<_>>()
        .join("\n");
    format!(
        "You are a compassionate HR growth coach helping an employee named {name} improve professionally.\n\
         \n\
         Feedback history (oldest to newest):\n\
         {history}\n\
         \n\
         Generate a personalized growth roadmap as a JSON object with exactly these fields:\n\
         - currentState: {{dominantSentiment, trend (\"improving\"|\"declining\"|\"stable\"), recurringTopics (array), summary (one sentence)}}\n\
         - focusAreas: array of 2-3 objects each with {{area, reason, action}}\n\
         - plan: {{thirtyDays, sixtyDays, ninetyDays}} (one sentence each)\n\
         - encouragement: one warm uplifting sentence\n\
         \n\
         Respond with JSON only. Be specific, practical, and kind."
    )
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CurrentStateDto {
    dominant_sentiment: String,
    trend: String,
    recurring_topics: Vec<String>,
    summary: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RoadmapDto {
    current_state: CurrentStateDto,
    focus_areas: Vec<FocusArea>,
    plan: GrowthPlan,
    encouragement: String,
}

/// Validate model text into a [`Roadmap`].
///
/// Every field must be present with the right JSON type, `trend` must be a
/// known label, and at least one focus area is required; focus areas beyond
/// [`MAX_FOCUS_AREAS`] are dropped.
pub fn parse_roadmap(text: &str) -> Result<Roadmap, RoadmapError> {
    let value = extract_json(text)?;
    let dto: RoadmapDto = serde_json::from_value(value).map_err(|err| RoadmapError::Schema {
        message: err.to_string(),
    })?;

    let trend = Trend::parse(&dto.current_state.trend).ok_or_else(|| RoadmapError::Schema {
        message: format!("unknown trend: {}", dto.current_state.trend),
    })?;
    if dto.focus_areas.is_empty() {
        return Err(RoadmapError::Schema {
            message: "focusAreas must not be empty".to_owned(),
        });
    }

    Ok(Roadmap {
        current_state: CurrentState {
            dominant_sentiment: dto.current_state.dominant_sentiment,
            trend,
            recurring_topics: dto.current_state.recurring_topics,
            summary: dto.current_state.summary,
        },
        focus_areas: dto.focus_areas.into_iter().take(MAX_FOCUS_AREAS).collect(),
        plan: dto.plan,
        encouragement: dto.encouragement,
    })
}

#[cfg(test)]
#[path = "roadmap_tests.rs"]
mod tests;
