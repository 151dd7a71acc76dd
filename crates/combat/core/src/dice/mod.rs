//! Dice engine: the only stateful primitive in the core.
//!
//! A [`DiceEngine`] wraps a seeded [`Pcg32`] stream and exposes single and
//! multi-die rolls plus advantage/disadvantage composition. Same seed and
//! same call sequence produce identical output on every platform.
mod d20;
mod die;
mod engine;
mod error;
mod rng;

pub use d20::{D20Roll, RollMode, RollModeSources};
pub use die::{DiceExpression, Die, DieRoll, check_modifier};
pub use engine::DiceEngine;
pub use error::DiceError;
pub use rng::Pcg32;
