//! Journal feature module.
//!
//! Uses MVI (Model-View-Intent) pattern:
//! - `entry.rs` - Journal entry data model
//! - `action.rs` - Submission and result intents
//! - `state.rs` - Append-only application state
//! - `reducer.rs` - State transitions

mod action;
mod entry;
mod reducer;
mod state;

pub use action::{Action, ENTRIES_UPDATED, SUBMIT};
pub use entry::JournalEntry;
pub use reducer::JournalReducer;
pub use state::AppState;
