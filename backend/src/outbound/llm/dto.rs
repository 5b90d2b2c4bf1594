//! DTOs for the Messages API request and response envelopes.

use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub(super) struct MessagesRequestDto<'a> {
    pub(super) model: &'a str,
    pub(super) max_tokens: u32,
    pub(super) temperature: f32,
    pub(super) messages: [MessageDto<'a>; 1],
}

#[derive(Debug, Serialize)]
pub(super) struct MessageDto<'a> {
    pub(super) role: &'static str,
    pub(super) content: &'a str,
}

#[derive(Debug, Deserialize)]
pub(super) struct MessagesResponseDto {
    #[serde(default)]
    pub(super) content: Vec<ContentBlockDto>,
}

#[derive(Debug, Deserialize)]
pub(super) struct ContentBlockDto {
    #[serde(rename = "type")]
    pub(super) block_type: String,
    #[serde(default)]
    pub(super) text: Option<String>,
}

impl MessagesResponseDto {
    /// Concatenate every text block in order.
    pub(super) fn into_text(self) -> Result<String, String> {
        let text: String = self
            .content
            .into_iter()
            .filter(|block| block.block_type == "text")
            .filter_map(|block| block.text)
            .collect();
        if text.trim().is_empty() {
            return Err("response contained no text content".to_owned());
        }
        Ok(text)
    }
}
