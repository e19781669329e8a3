//! Base trait for intents (actions) in MVI architecture.

use std::fmt::Debug;

/// Marker trait for intent objects.
///
/// Intents represent:
/// - User actions (an entry was composed and submitted)
/// - Resolved side effects (a backend reply arrived)
///
/// Intents are folded by reducers and then observed by effect
/// coordinators, so they must be cheap to clone and safe to move
/// across tasks.
pub trait Intent: Clone + Debug + Send + 'static {}
