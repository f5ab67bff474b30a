//! Core types: players, state, intents, RNG, configuration and errors.
//!
//! Everything here is independent of any particular phase's rules. The
//! resolution steps and the engine build on these types.

pub mod action;
pub mod config;
pub mod error;
pub mod player;
pub mod rng;
pub mod state;

pub use action::{ActionRecord, Intent};
pub use config::{ConfigError, EngineConfig, GameMode, SessionConfig, ERA_COUNT, MAX_PLAYERS};
pub use error::{ActionError, SetupError};
pub use player::{Acquisition, Player, PlayerId, Specialization};
pub use rng::{GameRng, GameRngState, RandomSource, ScriptedRng};
pub use state::{GameState, SnapshotError};
