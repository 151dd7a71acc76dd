//! Reference orchestrator for the combat core.
//!
//! A [`CombatSession`] owns one seeded dice engine and one event log. It
//! drives the pure transitions in `combat-core`, appends every emitted
//! [`CombatEvent`](combat_core::CombatEvent) through an [`EventRepository`],
//! and rebuilds state from that log on undo, rebuild and resume.
//!
//! Modules:
//! - [`session`]: the orchestrator and its [`Checkpoint`]
//! - [`repository`]: the event log seam and an in-memory implementation
//! - [`config`]: [`SessionConfig`] loaded from TOML
//! - [`clock`]: timestamp source for emitted events
pub mod clock;
pub mod config;
pub mod error;
pub mod repository;
pub mod session;
pub mod utils;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{ConfigError, SessionConfig};
pub use error::{Resource, Result, SessionError};
pub use repository::{EventRepository, InMemoryEventRepository, RepositoryError};
pub use session::{Checkpoint, CombatSession};
