//! Port for the optional write-once archive of enriched records.

use async_trait::async_trait;

use super::define_port_error;

define_port_error! {
    /// Errors raised by archive adapters.
    pub enum FeedbackArchiveError {
        /// An object already exists under the key.
        AlreadyExists { key: String } =>
            "archive object already exists: {key}",
        /// The key is not a relative path of plain segments.
        InvalidKey { key: String } =>
            "archive key is not a valid relative path: {key}",
        /// Writing the object failed.
        Io { message: String } =>
            "archive write failed: {message}",
    }
}

/// One blob to archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveObject {
    /// Relative key, e.g. `exports/2026-03/<id>.json`.
    pub key: String,
    /// Serialised body.
    pub body: Vec<u8>,
    /// MIME type of `body`.
    pub content_type: &'static str,
}

/// Port for write-once blob storage.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FeedbackArchive: Send + Sync {
    /// Store `object`; never overwrites an existing key.
    async fn put(&self, object: &ArchiveObject) -> Result<(), FeedbackArchiveError>;
}
