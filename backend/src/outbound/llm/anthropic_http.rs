//! Reqwest-backed Anthropic Messages API adapter.
//!
//! This adapter owns transport details only: request serialisation, timeout and
//! HTTP error mapping, and extraction of the text blocks. JSON inside the text
//! is the domain's concern.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};

use super::dto::{MessageDto, MessagesRequestDto, MessagesResponseDto};
use crate::domain::ports::{CompletionRequest, LanguageModel, LanguageModelError};

const API_VERSION: &str = "2023-06-01";

/// Model selection and credentials for Messages API calls.
pub struct AnthropicIdentity {
    /// API key sent as `x-api-key`.
    pub api_key: String,
    /// Model identifier, e.g. `claude-3-haiku-20240307`.
    pub model: String,
}

/// Language model adapter posting single-turn prompts to one endpoint.
pub struct AnthropicHttpModel {
    client: Client,
    endpoint: Url,
    api_key: String,
    model: String,
}

impl AnthropicHttpModel {
    /// Build an adapter using a reqwest client with an explicit request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(
        endpoint: Url,
        timeout: Duration,
        identity: AnthropicIdentity,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint,
            api_key: identity.api_key,
            model: identity.model,
        })
    }
}

#[async_trait]
impl LanguageModel for AnthropicHttpModel {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, LanguageModelError> {
        let body = MessagesRequestDto {
            model: &self.model,
            max_tokens: request.max_tokens,
            temperature: request.temperature,
            messages: [MessageDto {
                role: "user",
                content: &request.prompt,
            }],
        };
        let response = self
            .client
            .post(self.endpoint.clone())
            .header("x-api-key", self.api_key.as_str())
            .header("anthropic-version", API_VERSION)
            .header(reqwest::header::ACCEPT, "application/json")
            .json(&body)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let bytes = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status, bytes.as_ref()));
        }
        parse_text(bytes.as_ref())
    }
}

fn parse_text(body: &[u8]) -> Result<String, LanguageModelError> {
    let decoded: MessagesResponseDto = serde_json::from_slice(body).map_err(|error| {
        LanguageModelError::decode(format!("invalid Messages API payload: {error}"))
    })?;
    decoded.into_text().map_err(LanguageModelError::decode)
}

fn map_transport_error(error: reqwest::Error) -> LanguageModelError {
    LanguageModelError::transport(error.to_string())
}

fn map_status_error(status: StatusCode, body: &[u8]) -> LanguageModelError {
    LanguageModelError::status(status.as_u16(), body_preview(body))
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}

#[cfg(test)]
mod tests {
    //! Coverage for the non-network mapping helpers.

    use super::*;
    use rstest::rstest;

    #[test]
    fn joins_text_blocks_and_skips_others() {
        let body = br#"{
            "id": "msg_01",
            "content": [
                {"type": "text", "text": "{\"sentiment\": "},
                {"type": "tool_use", "id": "t1"},
                {"type": "text", "text": "\"neutral\"}"}
            ]
        }"#;
        let text = parse_text(body).expect("text decodes");
        assert_eq!(text, r#"{"sentiment": "neutral"}"#);
    }

    #[rstest]
    #[case(br#"{"content": []}"#.as_slice())]
    #[case(b"<html>bad gateway</html>".as_slice())]
    fn rejects_payloads_without_text(#[case] body: &[u8]) {
        assert!(matches!(
            parse_text(body),
            Err(LanguageModelError::Decode { .. })
        ));
    }

    #[test]
    fn status_errors_keep_code_and_compact_preview() {
        let error = map_status_error(
            StatusCode::TOO_MANY_REQUESTS,
            b"{\n  \"error\": \"rate limited\"\n}",
        );
        assert_eq!(
            error,
            LanguageModelError::status(429_u16, r#"{ "error": "rate limited" }"#)
        );
    }

    #[test]
    fn request_body_matches_messages_api_shape() {
        let body = MessagesRequestDto {
            model: "claude-3-haiku-20240307",
            max_tokens: 256,
            temperature: 0.0,
            messages: [MessageDto {
                role: "user",
                content: "hello",
            }],
        };
        let json = serde_json::to_value(&body).expect("serialises");
        assert_eq!(json["max_tokens"], 256);
        assert_eq!(json["messages"][0]["role"], "user");
        assert_eq!(json["messages"][0]["content"], "hello");
    }
}
