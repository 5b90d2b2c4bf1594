//! Port for prompt-in, text-out language model calls.
//!
//! Adapters return the model's raw text. Callers own JSON extraction and
//! schema validation because model output is untrusted.

use async_trait::async_trait;

use super::define_port_error;

define_port_error! {
    /// Errors raised by language model adapters.
    pub enum LanguageModelError {
        /// The request could not be sent or timed out.
        Transport { message: String } =>
            "language model transport failed: {message}",
        /// The service answered with a non-success status.
        Status { status: u16, message: String } =>
            "language model returned status {status}: {message}",
        /// The response envelope could not be decoded.
        Decode { message: String } =>
            "language model response could not be decoded: {message}",
        /// No model is configured.
        Unavailable { message: String } =>
            "language model unavailable: {message}",
    }
}

/// A single completion request.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    /// User prompt text.
    pub prompt: String,
    /// Upper bound on generated tokens.
    pub max_tokens: u32,
    /// Sampling temperature.
    pub temperature: f32,
}

/// Port for text completion.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Run one completion and return the concatenated text output.
    async fn complete(&self, request: &CompletionRequest) -> Result<String, LanguageModelError>;
}

/// Fixture used when no model credentials are configured.
///
/// Every call fails, which the enrichment pipeline tolerates and the roadmap
/// generator reports as an internal error.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureLanguageModel;

#[async_trait]
impl LanguageModel for FixtureLanguageModel {
    async fn complete(&self, _request: &CompletionRequest) -> Result<String, LanguageModelError> {
        Err(LanguageModelError::unavailable(
            "no language model configured",
        ))
    }
}
