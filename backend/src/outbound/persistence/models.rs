//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. They exist solely to satisfy Diesel's
//! type requirements for queries and mutations.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::feedback;

/// Row struct for reading from the feedback table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = feedback)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct FeedbackRow {
    pub id: Uuid,
    pub submitter_name: String,
    pub submitter_handle: String,
    pub message: String,
    pub department: String,
    pub is_peer_review: bool,
    pub target_name: Option<String>,
    pub target_handle: Option<String>,
    pub sentiment: Option<String>,
    pub topics: Vec<String>,
    pub summary: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Insertable struct for creating new feedback records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = feedback)]
pub(crate) struct NewFeedbackRow<'a> {
    pub id: Uuid,
    pub submitter_name: &'a str,
    pub submitter_handle: &'a str,
    pub message: &'a str,
    pub department: &'a str,
    pub is_peer_review: bool,
    pub target_name: Option<&'a str>,
    pub target_handle: Option<&'a str>,
    pub sentiment: Option<&'a str>,
    pub topics: &'a [String],
    pub summary: Option<&'a str>,
    pub created_at: DateTime<Utc>,
}

/// Changeset applied by the conditional enrichment update.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = feedback)]
pub(crate) struct EnrichmentUpdate<'a> {
    pub sentiment: &'a str,
    pub topics: &'a [String],
    pub summary: &'a str,
}
