//! Application state for the journal.

use std::sync::Arc;

use crate::mvi::State;

use super::entry::JournalEntry;

/// Single source of truth: the ordered, append-only entry history.
///
/// The entry list is shared between snapshots. Appending goes through
/// copy-on-write, so a snapshot handed out earlier never changes.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    journal_entries: Arc<Vec<JournalEntry>>,
}

impl State for AppState {
    /// The history only grows, so its length identifies the snapshot.
    fn revision(&self) -> u64 {
        self.journal_entries.len() as u64
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Entries in arrival order of resolved submissions.
    pub fn journal_entries(&self) -> &[JournalEntry] {
        &self.journal_entries
    }

    pub fn len(&self) -> usize {
        self.journal_entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.journal_entries.is_empty()
    }

    /// Whether both snapshots share the same entry storage.
    pub fn shares_entries_with(&self, other: &AppState) -> bool {
        Arc::ptr_eq(&self.journal_entries, &other.journal_entries)
    }

    /// Returns a new state with `entry` appended at the end.
    pub(crate) fn with_entry(self, entry: JournalEntry) -> Self {
        let mut journal_entries = self.journal_entries;
        Arc::make_mut(&mut journal_entries).push(entry);
        Self { journal_entries }
    }
}

impl From<Vec<JournalEntry>> for AppState {
    fn from(entries: Vec<JournalEntry>) -> Self {
        Self {
            journal_entries: Arc::new(entries),
        }
    }
}
