//! Domain core for the video generation service.
//!
//! Holds the shared types and errors plus the job lifecycle itself: the
//! submission handler and the status poller, written against the
//! [`lifecycle::VideoStore`] and [`generation::VideoGenerator`] seams so
//! they run the same way over PostgreSQL and the Veo API as over the
//! in-memory doubles used in tests.

pub mod error;
pub mod generation;
pub mod lifecycle;
pub mod prompt;
pub mod roles;
pub mod status;
pub mod types;
