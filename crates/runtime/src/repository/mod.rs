//! Repository layer for the combat event log.
//!
//! The core never touches storage; the session appends every emitted event
//! through [`EventRepository`] and reads the log back to rebuild state.
//! Storage backends live outside this crate.

mod error;
mod memory;
mod traits;

pub use error::{RepositoryError, Result};
pub use memory::InMemoryEventRepository;
pub use traits::EventRepository;
