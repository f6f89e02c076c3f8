//! Deadhand Core - Spacecraft Console Simulation Engine
//!
//! A single-threaded, virtual-clock simulation of a spacecraft control
//! console: reactor, life support, ship vitals, navigation and the command
//! authority chain.
//!
//! # Architecture
//!
//! - **State**: primitive cells grouped per subsystem ([`state::ShipState`])
//! - **Scheduler**: one pending timer per [`scheduler::TimerKind`]
//! - **Systems**: intent handlers, watchers and timer handlers on
//!   [`engine::ConsoleEngine`]
//! - **Read model**: derived values are recomputed on every read;
//!   [`snapshot::ConsoleSnapshot`] bundles them for presentation layers
//!
//! # Example
//!
//! ```rust
//! use deadhand_core::prelude::*;
//!
//! let mut engine = ConsoleEngine::with_seed(7).unwrap();
//! for id in [1, 2, 4, 8, 16] {
//!     engine.apply(Intent::ToggleSwitch { id }).unwrap();
//! }
//! engine.tick(2_000);
//! engine.tick(8_000);
//! assert_eq!(engine.ship().reactor.phase, 1);
//! ```

pub mod engine;
pub mod intent;
pub mod scheduler;
pub mod snapshot;
pub mod state;
mod systems;
pub mod terminal;

/// Commonly used types for convenient importing
pub mod prelude {
    pub use crate::engine::ConsoleEngine;
    pub use crate::intent::{Intent, Rejection};
    pub use crate::snapshot::ConsoleSnapshot;
    pub use crate::state::ShipState;
    pub use crate::terminal::{LogEntry, Severity};
    pub use deadhand_logic::config::SimConfig;
}
