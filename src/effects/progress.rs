//! Submission progress published by the coordinator.

use tokio::sync::watch;

/// Snapshot of the coordinator's bookkeeping.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SubmissionProgress {
    /// Generation of the most recently started submission (0 = none yet).
    pub generation: u64,
    /// Repository calls that have not resolved yet, superseded ones included.
    pub in_flight: usize,
    /// Latest generation whose result was handled, success or failure.
    pub resolved: u64,
}

impl SubmissionProgress {
    /// Whether `generation` has started and nothing is in flight any more.
    pub fn is_settled(&self, generation: u64) -> bool {
        self.generation >= generation && self.in_flight == 0
    }

    /// Whether `generation`, or a newer submission, has been handled.
    ///
    /// Superseded calls still running do not count.
    pub fn is_resolved(&self, generation: u64) -> bool {
        self.resolved >= generation || self.is_settled(generation)
    }
}

/// Wait until `done` holds for the published progress.
///
/// Returns immediately if it already does. Returns early if the
/// coordinator is gone.
pub(crate) async fn wait_for_progress<F>(
    progress: &mut watch::Receiver<SubmissionProgress>,
    generation: u64,
    done: F,
) where
    F: Fn(&SubmissionProgress) -> bool,
{
    if progress.wait_for(|snapshot| done(snapshot)).await.is_err() {
        tracing::debug!(generation, "Coordinator stopped before submission finished");
    }
}
