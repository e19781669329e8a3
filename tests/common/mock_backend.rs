//! Mood-prediction backend double for the HTTP repository tests.
//!
//! Records every request and answers from a queue of scripted replies,
//! falling back to a valid journal entry.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::routing::any;
use axum::Router;
use moodjournal::shutdown::ShutdownCoordinator;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;

const DEFAULT_ENTRY: &str = r#"{"id": 0, "timeCreated": "12:00:00 PM", "text": "", "mood": "Happy"}"#;

/// A request as the backend saw it.
#[derive(Debug, Clone)]
pub struct Received {
    pub method: Method,
    pub path: String,
    pub content_type: Option<String>,
    pub body: Bytes,
}

impl Received {
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).expect("request body is JSON")
    }
}

/// What the backend answers with.
#[derive(Debug, Clone)]
pub struct Reply {
    status: StatusCode,
    body: String,
    delay: Duration,
}

impl Reply {
    /// 200 with `body` as the JSON payload.
    pub fn ok(body: &str) -> Self {
        Self {
            status: StatusCode::OK,
            body: body.to_string(),
            delay: Duration::ZERO,
        }
    }

    pub fn status(code: u16, body: &str) -> Self {
        Self {
            status: StatusCode::from_u16(code).expect("valid status code"),
            ..Self::ok(body)
        }
    }

    pub fn after(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

#[derive(Default)]
struct Script {
    received: Mutex<Vec<Received>>,
    replies: Mutex<VecDeque<Reply>>,
}

pub struct MockBackend {
    base_url: String,
    script: Arc<Script>,
    shutdown: ShutdownCoordinator,
}

impl MockBackend {
    pub async fn start() -> Self {
        let script = Arc::new(Script::default());
        let app = Router::new()
            .route("/", any(answer))
            .route("/{*path}", any(answer))
            .with_state(Arc::clone(&script));

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind mock backend");
        let base_url = format!("http://{}", listener.local_addr().unwrap());

        let shutdown = ShutdownCoordinator::new();
        let stop = shutdown.handle();
        tokio::spawn(async move {
            let _ = axum::serve(listener, app)
                .with_graceful_shutdown(async move { stop.wait().await })
                .await;
        });

        Self {
            base_url,
            script,
            shutdown,
        }
    }

    /// Answer the next unanswered request with `reply`.
    pub fn reply_with(&self, reply: Reply) {
        self.script.replies.lock().push_back(reply);
    }

    pub fn received(&self) -> Vec<Received> {
        self.script.received.lock().clone()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl Drop for MockBackend {
    fn drop(&mut self) {
        self.shutdown.signal();
    }
}

async fn answer(
    State(script): State<Arc<Script>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    script.received.lock().push(Received {
        method,
        path: uri.path().to_string(),
        content_type: headers
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string),
        body,
    });

    let reply = script
        .replies
        .lock()
        .pop_front()
        .unwrap_or_else(|| Reply::ok(DEFAULT_ENTRY));
    tokio::time::sleep(reply.delay).await;

    (
        reply.status,
        [(header::CONTENT_TYPE, "application/json")],
        reply.body,
    )
        .into_response()
}
