//! Application settings loaded via OrthoConfig.
//!
//! Values layer from the `FEEDBACK_*` environment, CLI flags, and an optional
//! configuration file. Optional keys fall back to the defaults below through
//! accessor methods.

use std::path::PathBuf;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;

/// Default listen address.
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
/// Default page size for store queries.
pub const DEFAULT_STORE_PAGE_SIZE: usize = 100;
/// Default Messages API endpoint.
pub const DEFAULT_LLM_ENDPOINT: &str = "https://api.anthropic.com/v1/messages";
/// Default model identifier.
pub const DEFAULT_LLM_MODEL: &str = "claude-3-haiku-20240307";
/// Default HTTP client timeout for model calls, in seconds.
pub const DEFAULT_LLM_TIMEOUT_SECS: u64 = 30;
/// Default CORS origin.
pub const DEFAULT_CORS_ALLOW_ORIGIN: &str = "*";

/// Runtime configuration for the feedback server.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "FEEDBACK")]
pub struct AppSettings {
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    /// PostgreSQL URL; the in-memory store is used when absent.
    pub database_url: Option<String>,
    /// Records per store page.
    pub store_page_size: Option<usize>,
    /// Messages API endpoint.
    pub llm_endpoint: Option<String>,
    /// Messages API key; the fixture model is used when absent.
    pub llm_api_key: Option<String>,
    /// Model identifier.
    pub llm_model: Option<String>,
    /// Model call timeout in seconds.
    pub llm_timeout_secs: Option<u64>,
    /// Root directory for enriched record exports; archiving is off when
    /// absent.
    pub archive_dir: Option<PathBuf>,
    /// Value of `Access-Control-Allow-Origin`.
    pub cors_allow_origin: Option<String>,
    /// Accept `name`/`email` from submission bodies. Development only.
    #[ortho_config(default = false)]
    pub allow_body_identity: bool,
}

impl AppSettings {
    /// Listen address, falling back to [`DEFAULT_BIND_ADDR`].
    pub fn bind_addr(&self) -> &str {
        self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR)
    }

    /// Store page size, at least one.
    pub fn store_page_size(&self) -> usize {
        self.store_page_size
            .unwrap_or(DEFAULT_STORE_PAGE_SIZE)
            .max(1)
    }

    /// Messages API endpoint, falling back to [`DEFAULT_LLM_ENDPOINT`].
    pub fn llm_endpoint(&self) -> &str {
        self.llm_endpoint.as_deref().unwrap_or(DEFAULT_LLM_ENDPOINT)
    }

    /// Model identifier, falling back to [`DEFAULT_LLM_MODEL`].
    pub fn llm_model(&self) -> &str {
        self.llm_model.as_deref().unwrap_or(DEFAULT_LLM_MODEL)
    }

    /// Model call timeout.
    pub fn llm_timeout(&self) -> Duration {
        Duration::from_secs(self.llm_timeout_secs.unwrap_or(DEFAULT_LLM_TIMEOUT_SECS))
    }

    /// CORS origin, falling back to [`DEFAULT_CORS_ALLOW_ORIGIN`].
    pub fn cors_allow_origin(&self) -> &str {
        self.cors_allow_origin
            .as_deref()
            .unwrap_or(DEFAULT_CORS_ALLOW_ORIGIN)
    }
}
