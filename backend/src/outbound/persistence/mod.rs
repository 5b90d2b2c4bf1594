//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! This module provides the feedback repository backed by PostgreSQL via the
//! Diesel ORM with async support through `diesel-async` and `bb8` connection
//! pooling.
//!
//! # Architecture
//!
//! - **Thin adapters**: the repository only translates between Diesel rows
//!   and domain records. No business logic resides here.
//! - **Internal models**: Diesel row structs (`models.rs`) and schema
//!   definitions (`schema.rs`) never leave this module.
//! - **Embedded migrations**: the schema ships inside the binary and is
//!   applied on startup by [`run_migrations`].
//!
//! # Example
//!
//! ```ignore
//! use backend::outbound::persistence::{DbPool, DieselFeedbackRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/feedback")).await?;
//! let repository = DieselFeedbackRepository::new(pool, 100);
//! ```

mod diesel_error_mapping;
mod diesel_feedback_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_feedback_repository::DieselFeedbackRepository;
pub use migrations::{MigrationError, run_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
