//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! This module follows the hexagonal architecture pattern, providing concrete
//! implementations of domain port traits:
//!
//! - **persistence**: PostgreSQL-backed feedback store using Diesel ORM
//! - **memory**: in-process feedback store for development and tests
//! - **llm**: Anthropic Messages API client
//! - **archive**: write-once directory archive for enriched records
//!
//! Adapters are thin translators that convert between domain types and
//! infrastructure-specific representations. They contain no business logic.

pub mod archive;
pub(crate) mod feedback_cursor;
pub mod llm;
pub mod memory;
pub mod persistence;
