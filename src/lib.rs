//! # moodjournal
//!
//! Free-text journal entries, sent to a mood-prediction backend, folded
//! into an append-only history.
//!
//! The core is an action pipeline:
//!
//! - [`journal`]: the action vocabulary, state and pure reducer
//! - [`store`]: the single-writer state container (dispatch / subscribe)
//! - [`effects`]: the coordinator that turns `Submit` into repository calls
//!   and re-injects the latest result
//! - [`app`]: composition and lifecycle
//!
//! Around it: the HTTP [`repository`], a reference [`mood_service`],
//! [`config`] loading and [`logging`] setup.

pub mod app;
pub mod config;
pub mod effects;
pub mod journal;
pub mod logging;
pub mod mood_service;
pub mod mvi;
pub mod repository;
pub mod shutdown;
pub mod store;

pub use app::{JournalApp, JournalHandle, RunningJournal};
