//! Failure reporting hook.

use crate::repository::RepositoryError;

/// A submission whose repository call failed.
#[derive(Debug)]
pub struct SubmitFailure {
    /// Generation of the failed submission.
    pub generation: u64,
    /// Text that was submitted.
    pub text: String,
    /// Why the call failed.
    pub error: RepositoryError,
}

/// Receives failures of the latest submission.
///
/// The coordinator never turns a failure into an action; a listener is the
/// place to add visible error reporting. Failures of superseded submissions
/// are not reported.
pub trait FailureListener: Send + Sync {
    fn on_submit_failed(&self, failure: &SubmitFailure);
}

impl<F> FailureListener for F
where
    F: Fn(&SubmitFailure) + Send + Sync,
{
    fn on_submit_failed(&self, failure: &SubmitFailure) {
        self(failure)
    }
}
