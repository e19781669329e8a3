//! Model-View-Intent (MVI) primitives.
//!
//! Base traits for unidirectional data flow between the journal view,
//! the state container and the side-effect coordinator.
//!
//! # Architecture
//!
//! ```text
//! Intent ──→ Reducer ──→ State ──→ View
//!    ↑          │                   │
//!    │          └──→ Effects ───────┤
//!    └──────────────────────────────┘
//! ```
//!
//! - **State**: Immutable snapshot handed to subscribers
//! - **Intent**: User actions or resolved side effects
//! - **Reducer**: Pure function that folds intents into state

mod intent;
mod reducer;
mod state;

pub use intent::Intent;
pub use reducer::Reducer;
pub use state::State;
