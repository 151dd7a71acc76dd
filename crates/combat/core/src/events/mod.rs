//! Event-sourced state builder.
//!
//! The event log is the only persisted form of combat state. [`build_state`]
//! folds a log from the empty state through [`apply_event`], which dispatches
//! each [`CombatEventKind`] to its turn transition.
mod builder;
mod event;

pub use builder::{ReplayError, apply_event, build_state, replay_onto};
pub use event::{CombatEvent, CombatEventKind};
