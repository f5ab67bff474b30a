//! Resolution algorithms for each phase of an era.
//!
//! Each submodule owns one step and returns a report describing exactly what
//! happened, so callers render or test the outcome without re-deriving any
//! randomness:
//!
//! - `reproduction`: die + bonuses into alleles (allele roll)
//! - `draw`: event reveal and hand refill (draw)
//! - `evolution`: trait costs, preconditions and specialization (evolution)
//! - `populate`: marker placement (populate)
//! - `competition`: contested tiles and displacement (competition)
//! - `turnover`: biome changes (tile flip)
//! - `extinction`: era events (event)
//! - `rival`: solo-mode rival spawn, spread and losses
//!
//! These are free functions over `&mut GameState`; [`Engine`](crate::rules::Engine)
//! wires them to phases and turn order.

pub mod competition;
pub mod draw;
pub mod evolution;
pub mod extinction;
pub mod populate;
pub mod reproduction;
pub mod rival;
pub mod turnover;

pub use competition::{resolve_competition, Combatant, CompetitionReport, Contest, Side};
pub use draw::{refill_hands, reveal_event, DrawReport};
pub use evolution::{
    acquire_trait, check_eligible, complexity_surcharge, prerequisites_met, quote,
    AcquisitionReport, Quote,
};
pub use extinction::{
    resolve_event, EventReport, PlayerOutcome, SurvivalStatus, TileFate, TileOutcome,
};
pub use populate::{check_placement, is_habitable, legal_placements, place_marker, PlacementReport};
pub use reproduction::{population_bonus, reproduce, ReproductionReport};
pub use rival::{
    rival_extinction, spawn_count, spawn_rivals, spread_rivals, RivalLossReport, SpawnReport,
    SpreadReport,
};
pub use turnover::{resolve_turnover, FlippedTile, TurnoverReport};
