//! In-memory repository implementations for testing and development.

mod event;

pub use event::InMemoryEventRepository;
