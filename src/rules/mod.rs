//! The era phase machine and the engine that drives it.
//!
//! - `phase`: the seven phases of an era and their order
//! - `engine`: setup, intent dispatch, phase advancement and game end

pub mod engine;
pub mod phase;

pub use engine::{Engine, GameResult, Outcome};
pub use phase::Phase;
