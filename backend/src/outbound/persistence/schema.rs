//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the database migrations exactly. They are used
//! by Diesel for compile-time query validation and type-safe SQL generation.

diesel::table! {
    /// Anonymised feedback records.
    ///
    /// Handles are SHA-256 hex digests of normalised emails; raw emails are
    /// never stored. Enrichment columns stay null until the single
    /// conditional update sets them.
    feedback (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Submitter display name (max 100 characters).
        submitter_name -> Varchar,
        /// Submitter email handle.
        submitter_handle -> Text,
        /// PII-redacted message text.
        message -> Text,
        /// Department scope.
        department -> Text,
        /// Whether the record is a peer review.
        is_peer_review -> Bool,
        /// Peer-review target display name.
        target_name -> Nullable<Varchar>,
        /// Peer-review target email handle.
        target_handle -> Nullable<Text>,
        /// Sentiment label; null until enriched.
        sentiment -> Nullable<Text>,
        /// Topic labels; empty until enriched.
        topics -> Array<Text>,
        /// Summary sentence; null until enriched.
        summary -> Nullable<Text>,
        /// Write timestamp.
        created_at -> Timestamptz,
    }
}
