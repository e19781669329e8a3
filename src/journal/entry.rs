//! Journal entry data model.

use serde::{Deserialize, Serialize};

/// A journal entry as returned by the mood-prediction service.
///
/// Entries are immutable once created. The JSON form uses camelCase keys
/// (`id`, `timeCreated`, `text`, `mood`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalEntry {
    /// Server-assigned identifier.
    pub id: u64,
    /// Creation time as rendered by the server.
    pub time_created: String,
    /// User-authored text.
    pub text: String,
    /// Predicted mood label.
    pub mood: String,
}
