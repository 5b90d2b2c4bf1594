//! Archive outbound adapters.
//!
//! This module provides a directory-backed implementation of the
//! `FeedbackArchive` port.

mod cap_std_archive;

pub use cap_std_archive::CapStdFeedbackArchive;
