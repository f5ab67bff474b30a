//! Rival population dynamics for solo games.
//!
//! Rivals spawn after the draw, spread after competition and face the same
//! era events as the player. Rivals carry no tags.

use serde::{Deserialize, Serialize};

use crate::board::TileId;
use crate::catalog::{Catalog, EventDef, EventKind};
use crate::core::rng::choose;
use crate::core::{EngineConfig, GameState, RandomSource};

/// Rivals added at the start of an era.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpawnReport {
    /// How many the era asked for.
    pub requested: u32,
    /// One entry per rival placed, in placement order.
    pub placed: Vec<TileId>,
}

/// Rivals that spread to neighbouring tiles.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpreadReport {
    /// `(source, target)` for every new rival.
    pub spread: Vec<(TileId, TileId)>,
}

/// Rival losses to an era event.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RivalLossReport {
    /// `(tile, removed)` for every tile that lost rivals.
    pub losses: Vec<(TileId, u32)>,
    pub total_lost: u32,
}

/// Rivals wanted this era: `1 + era / 6`, plus one on a coin flip.
pub fn spawn_count(config: &EngineConfig, era: u8, rng: &mut dyn RandomSource) -> u32 {
    let base = 1 + u32::from(era / 6);
    base + u32::from(rng.percent(config.rival_spawn_bonus_chance))
}

/// Place new rivals on unlocked tiles free of player markers.
///
/// When tiles next to existing rivals qualify, each rival goes to one of them
/// with the configured weight; otherwise it lands anywhere valid.
pub fn spawn_rivals(
    config: &EngineConfig,
    state: &mut GameState,
    rng: &mut dyn RandomSource,
) -> SpawnReport {
    let requested = spawn_count(config, state.era, rng);
    let mut report = SpawnReport {
        requested,
        placed: Vec::new(),
    };

    for _ in 0..requested {
        let era = state.era;
        let board = &state.board;
        let candidates: Vec<TileId> = board
            .tiles
            .iter()
            .filter(|t| t.is_unlocked(era) && !board.markers.is_occupied(t.id))
            .map(|t| t.id)
            .collect();
        if candidates.is_empty() {
            break;
        }
        let near: Vec<TileId> = candidates
            .iter()
            .copied()
            .filter(|&t| board.touches_rivals(t))
            .collect();

        let pool = if !near.is_empty() && rng.percent(config.rival_adjacent_weight) {
            &near
        } else {
            &candidates
        };
        let Some(&tile) = choose(rng, pool) else {
            break;
        };
        state.board.rivals.add(tile, 1);
        state.rival_total += 1;
        report.placed.push(tile);
    }

    tracing::debug!(requested, placed = report.placed.len(), "rivals spawned");
    report
}

/// Give every rival tile a chance to seed one unlocked neighbour.
///
/// Only tiles holding rivals before the step can spread.
pub fn spread_rivals(
    config: &EngineConfig,
    state: &mut GameState,
    rng: &mut dyn RandomSource,
) -> SpreadReport {
    let mut report = SpreadReport::default();
    let era = state.era;

    for source in state.board.rivals.tiles() {
        if !rng.percent(config.rival_spread_chance) {
            continue;
        }
        let targets: Vec<TileId> = state
            .board
            .neighbors(source)
            .into_iter()
            .filter(|&n| state.board.tile(n).is_some_and(|t| t.is_unlocked(era)))
            .collect();
        let Some(&target) = choose(rng, &targets) else {
            continue;
        };
        state.board.rivals.add(target, 1);
        state.rival_total += 1;
        report.spread.push((source, target));
    }

    tracing::debug!(spread = report.spread.len(), "rivals spread");
    report
}

/// Apply an era event to the rivals.
///
/// Doomed tiles lose every rival; every other rival tile loses half its
/// rivals (rounded down) on a failed coin flip. Flavor events do nothing.
pub fn rival_extinction(
    catalog: &Catalog,
    config: &EngineConfig,
    state: &mut GameState,
    event: &EventDef,
    rng: &mut dyn RandomSource,
) -> RivalLossReport {
    let mut report = RivalLossReport::default();
    if event.kind == EventKind::Flavor {
        return report;
    }

    for tile in state.board.rivals.tiles() {
        let count = state.board.rivals.count(tile);
        let doomed = state
            .board
            .tile(tile)
            .and_then(|t| catalog.biome(t.biome))
            .is_some_and(|b| b.bonus_tags.intersects(&event.doomed_tags));
        let loss = if doomed {
            count
        } else if rng.percent(config.rival_loss_chance) {
            count / 2
        } else {
            0
        };
        if loss == 0 {
            continue;
        }
        let removed = state.board.rivals.remove(tile, loss);
        state.rival_total = state.rival_total.saturating_sub(removed);
        report.losses.push((tile, removed));
        report.total_lost += removed;
    }

    tracing::debug!(lost = report.total_lost, "rivals hit by event");
    report
}
