//! Base trait for state in MVI architecture.

/// Marker trait for state snapshots.
///
/// States should be:
/// - Immutable (Clone hands out a snapshot, never a live view)
/// - Self-contained (all data needed to render the view)
/// - Comparable (PartialEq for assertions and snapshot checks)
pub trait State: Clone + PartialEq + Default + Send + Sync + 'static {
    /// Change marker. A reduce that leaves the revision alone did not
    /// change the state, and subscribers are not notified.
    fn revision(&self) -> u64;
}
