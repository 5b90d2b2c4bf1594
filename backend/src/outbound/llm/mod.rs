//! Language model outbound adapters.
//!
//! This module provides a thin HTTP implementation of the `LanguageModel`
//! port against the Anthropic Messages API.

mod anthropic_http;
mod dto;

pub use anthropic_http::{AnthropicHttpModel, AnthropicIdentity};
