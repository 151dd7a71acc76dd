//! Command implementations for xtask
//!
//! Each command is a separate module that implements its own CLI args and execution logic.

mod replay;
mod roll;
mod verify;

pub use replay::Replay;
pub use roll::Roll;
pub use verify::Verify;
