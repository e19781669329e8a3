//! Reference mood-prediction service.
//!
//! Accepts `POST /` with `{"text": "..."}` and answers with a journal
//! entry carrying a sequential id, the UTC creation time and a mood
//! derived from the text length.

use std::io;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use serde::Deserialize;
use tokio::net::TcpListener;

use crate::journal::JournalEntry;
use crate::shutdown::ShutdownHandle;

/// Mood labels, indexed by text length modulo their count.
pub const MOODS: [&str; 4] = ["Happy", "Sad", "Why does 2020 suck so badly?!", "Frustrated"];

/// `strftime` format of `timeCreated`.
const TIME_FORMAT: &str = "%I:%M:%S %p";

/// Predict the mood of `text`. Length counts Unicode scalar values.
pub fn predict_mood(text: &str) -> &'static str {
    MOODS[text.chars().count() % MOODS.len()]
}

#[derive(Debug, Deserialize)]
struct SubmitRequest {
    text: String,
}

#[derive(Default)]
struct ServiceState {
    next_id: AtomicU64,
}

async fn create_entry(
    State(state): State<Arc<ServiceState>>,
    Json(request): Json<SubmitRequest>,
) -> Json<JournalEntry> {
    let id = state.next_id.fetch_add(1, Ordering::SeqCst);
    let entry = JournalEntry {
        id,
        time_created: chrono::Utc::now().format(TIME_FORMAT).to_string(),
        mood: predict_mood(&request.text).to_string(),
        text: request.text,
    };
    tracing::debug!(id, mood = %entry.mood, "Created journal entry");
    Json(entry)
}

/// Router with a fresh id counter.
pub fn router() -> Router {
    Router::new()
        .route("/", post(create_entry))
        .with_state(Arc::new(ServiceState::default()))
}

/// A bound, not yet serving mood service.
pub struct MoodService {
    listener: TcpListener,
    addr: SocketAddr,
}

impl MoodService {
    /// Bind to `addr`. Port 0 picks a free port; see [`local_addr`](Self::local_addr).
    pub async fn bind(addr: SocketAddr) -> io::Result<Self> {
        let listener = TcpListener::bind(addr).await?;
        let addr = listener.local_addr()?;
        Ok(Self { listener, addr })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.addr
    }

    /// Serve until `shutdown` is signaled.
    pub async fn run(self, shutdown: ShutdownHandle) -> io::Result<()> {
        tracing::info!(addr = %self.addr, "Mood service listening");
        axum::serve(self.listener, router())
            .with_graceful_shutdown(async move { shutdown.wait().await })
            .await?;
        tracing::info!("Mood service stopped");
        Ok(())
    }
}
