//! Action vocabulary for the journal.

use serde::{Deserialize, Serialize};

use crate::mvi::Intent;

use super::entry::JournalEntry;

/// Type tag of [`Action::Submit`] in serialized form.
pub const SUBMIT: &str = "SUBMIT_JOURNAL";

/// Type tag of [`Action::EntriesUpdated`] in serialized form.
pub const ENTRIES_UPDATED: &str = "UPDATE_JOURNAL_ENTRIES";

/// Intents recognized by the journal store.
///
/// Serialized as internally tagged JSON objects, e.g.
/// `{"type": "SUBMIT_JOURNAL", "text": "..."}`. A tag this system does not
/// know deserializes to [`Action::Unrecognized`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Action {
    /// The user finished composing an entry. The text is not validated.
    #[serde(rename = "SUBMIT_JOURNAL")]
    Submit { text: String },

    /// A submission was resolved by the entry repository.
    #[serde(rename = "UPDATE_JOURNAL_ENTRIES")]
    EntriesUpdated {
        #[serde(rename = "journalEntry")]
        entry: JournalEntry,
    },

    /// Any action outside this vocabulary.
    #[serde(other, rename = "UNRECOGNIZED")]
    Unrecognized,
}

impl Intent for Action {}

impl Action {
    pub fn submit(text: impl Into<String>) -> Self {
        Action::Submit { text: text.into() }
    }

    pub fn entries_updated(entry: JournalEntry) -> Self {
        Action::EntriesUpdated { entry }
    }

    /// Stable type tag, used in log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            Action::Submit { .. } => SUBMIT,
            Action::EntriesUpdated { .. } => ENTRIES_UPDATED,
            Action::Unrecognized => "UNRECOGNIZED",
        }
    }
}
