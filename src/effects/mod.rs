//! Side effects for the journal.
//!
//! - `coordinator.rs` - Turns `Submit` actions into repository calls and
//!   re-injects the latest result as `EntriesUpdated`
//! - `failure.rs` - Optional hook for surfacing failed submissions
//! - `progress.rs` - Observable submission progress

mod coordinator;
mod failure;
mod progress;

pub use coordinator::SubmissionCoordinator;
pub use failure::{FailureListener, SubmitFailure};
pub use progress::SubmissionProgress;
pub(crate) use progress::wait_for_progress;
