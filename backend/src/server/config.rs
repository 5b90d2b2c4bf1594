//! HTTP server configuration object and helpers.

use std::net::SocketAddr;
use std::sync::Arc;

use backend::domain::ports::{FeedbackArchive, FeedbackRepository, LanguageModel};
use backend::middleware::Cors;

/// Driven adapters shared by every worker.
#[derive(Clone)]
pub struct Adapters {
    pub(crate) repository: Arc<dyn FeedbackRepository>,
    pub(crate) model: Arc<dyn LanguageModel>,
    pub(crate) archive: Option<Arc<dyn FeedbackArchive>>,
}

impl Adapters {
    /// Bundle the driven adapters.
    pub fn new(
        repository: Arc<dyn FeedbackRepository>,
        model: Arc<dyn LanguageModel>,
        archive: Option<Arc<dyn FeedbackArchive>>,
    ) -> Self {
        Self {
            repository,
            model,
            archive,
        }
    }
}

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) cors: Cors,
    pub(crate) allow_body_identity: bool,
    pub(crate) adapters: Adapters,
}

impl ServerConfig {
    /// Construct a server configuration around the driven adapters.
    #[must_use]
    pub fn new(bind_addr: SocketAddr, adapters: Adapters) -> Self {
        Self {
            bind_addr,
            cors: Cors::default(),
            allow_body_identity: false,
            adapters,
        }
    }

    /// Replace the CORS policy.
    #[must_use]
    pub fn with_cors(mut self, cors: Cors) -> Self {
        self.cors = cors;
        self
    }

    /// Enable the development identity fallback.
    #[must_use]
    pub fn with_body_identity(mut self, allow: bool) -> Self {
        self.allow_body_identity = allow;
        self
    }
}
