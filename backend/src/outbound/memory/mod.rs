//! In-process adapters for development and tests.

mod in_memory_feedback_repository;

pub use in_memory_feedback_repository::InMemoryFeedbackRepository;
