//! Reducer for the journal state.

use crate::mvi::Reducer;

use super::action::Action;
use super::state::AppState;

/// Reducer for journal state transitions.
///
/// State only changes on confirmed results from the repository; a
/// submission on its own never touches state.
pub struct JournalReducer;

impl Reducer for JournalReducer {
    type State = AppState;
    type Intent = Action;

    fn reduce(state: Self::State, intent: Self::Intent) -> Self::State {
        match intent {
            Action::EntriesUpdated { entry } => state.with_entry(entry),
            Action::Submit { .. } | Action::Unrecognized => state,
        }
    }
}
