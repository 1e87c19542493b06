//! Video generation job lifecycle.
//!
//! ```text
//! generating --start ok + handle--> processing --check done + uri-----> completed
//!     |                                  |------check done + error---> failed
//!     +--start failed / no handle--> failed   +--check done, nothing-> failed
//! ```
//!
//! - [`submission`] -- creates the job and starts the remote operation.
//! - [`poller`] -- one pass over in-flight jobs, applying terminal transitions.
//! - [`store`] -- the persistence seam both of them write through.

pub mod poller;
pub mod store;
pub mod submission;

#[cfg(test)]
mod testing;

pub use poller::{poll_once, PollError, PollOptions, PollOutcome, PollResult, PollSummary};
pub use store::{PollCandidate, StoreError, VideoStore};
pub use submission::{submit_video, SubmissionError, SubmissionOutcome, SubmitVideo};
