//! # primeval
//!
//! A turn-based evolutionary strategy engine for 1-4 players, with a
//! host-authoritative sync layer for networked play.
//!
//! ## Design Principles
//!
//! 1. **Single Writer**: `GameState` is a plain owned value. Engine
//!    operations take it by `&mut`; in networked play only the host's copy
//!    is ever mutated and everyone else receives full snapshots.
//!
//! 2. **Injected Randomness**: every die and pick goes through a
//!    `RandomSource`. Client-rolled dice travel inside the intent as literal
//!    values and are applied verbatim.
//!
//! 3. **Results, Not Callbacks**: every operation returns a report of what
//!    happened or an `ActionError` with a readable reason.
//!
//! ## Modules
//!
//! - `core`: players, state, intents, RNG, configuration, errors
//! - `catalog`: traits, biomes, events and organisms loaded from data
//! - `board`: hex tiles and marker ledgers
//! - `rules`: the phase machine and the `Engine`
//! - `resolution`: per-phase algorithms (competition, extinction, ...)
//! - `scoring`: final scores and organism matching
//! - `simulation`: automated policies and seeded balance batches
//! - `sync`: room codes, wire protocol, host and client roles

pub mod board;
pub mod catalog;
pub mod core;
pub mod resolution;
pub mod rules;
pub mod scoring;
pub mod simulation;
pub mod sync;

#[cfg(test)]
mod testing;

// Re-export commonly used types
pub use crate::core::{
    ActionError, ActionRecord, EngineConfig, GameMode, GameRng, GameState, Intent, Player,
    PlayerId, RandomSource, ScriptedRng, SessionConfig, SetupError,
};

pub use crate::board::{Board, HexCoord, Tile, TileId};

pub use crate::catalog::{BiomeId, Catalog, CatalogError, EventId, TraitId};

pub use crate::rules::{Engine, GameResult, Outcome, Phase};

pub use crate::scoring::{closest_organisms, final_scores, OrganismMatch, Score};

pub use crate::sync::{Client, ClientMessage, Host, HostMessage, RoomCode};
