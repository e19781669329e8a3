//! Shared test utilities and mock infrastructure.

#![allow(dead_code, unused_imports)]

pub mod mock_backend;
pub mod scripted;

use moodjournal::journal::JournalEntry;
use std::net::TcpListener;

/// Find an available port for testing.
pub fn free_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind to free port");
    listener.local_addr().unwrap().port()
}

/// Entry as the mood service would return it.
pub fn entry(id: u64, text: &str, mood: &str) -> JournalEntry {
    JournalEntry {
        id,
        time_created: "2024-01-01T00:00:00Z".to_string(),
        text: text.to_string(),
        mood: mood.to_string(),
    }
}
