//! Environment turnover: tiles changing biome.

use serde::{Deserialize, Serialize};

use crate::board::TileId;
use crate::catalog::{BiomeId, Catalog};
use crate::core::rng::choose;
use crate::core::{EngineConfig, GameState, PlayerId, RandomSource};

/// A tile that changed biome.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlippedTile {
    pub tile: TileId,
    pub from: BiomeId,
    pub to: BiomeId,
    pub flip_threshold: u8,
    pub era_lock: u8,
    /// Players who could no longer live there, with markers removed.
    pub displaced: Vec<(PlayerId, u32)>,
}

/// Result of one turnover step.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnoverReport {
    /// The single roll shared by every tile this era.
    pub roll: u8,
    pub flipped: Vec<FlippedTile>,
}

impl TurnoverReport {
    #[must_use]
    pub fn total_displaced(&self) -> u32 {
        self.flipped
            .iter()
            .flat_map(|f| f.displaced.iter().map(|&(_, n)| n))
            .sum()
    }
}

/// Roll once and flip every eligible tile.
///
/// A tile flips when its threshold is at most the roll and its era-lock has
/// passed. The new biome comes from the old biome's transitions that suit the
/// tile's climate zone; with no candidate the tile stays as it is.
pub fn resolve_turnover(
    catalog: &Catalog,
    config: &EngineConfig,
    state: &mut GameState,
    rng: &mut dyn RandomSource,
) -> TurnoverReport {
    let roll = rng.roll_d6();
    let era = state.era;
    let mut report = TurnoverReport {
        roll,
        flipped: Vec::new(),
    };

    for index in 0..state.board.tiles.len() {
        let tile = &state.board.tiles[index];
        if tile.flip_threshold > roll || !tile.is_unlocked(era) {
            continue;
        }
        let (id, from, climate) = (tile.id, tile.biome, tile.climate);
        let candidates: Vec<BiomeId> = catalog
            .biome(from)
            .map(|b| {
                b.transitions
                    .iter()
                    .copied()
                    .filter(|&t| catalog.biome(t).is_some_and(|def| def.suits(climate)))
                    .collect()
            })
            .unwrap_or_default();
        let Some(&to) = choose(rng, &candidates) else {
            continue;
        };

        let flip_threshold = rng.roll_d6();
        let offset = rng.next_below(config.era_lock_max_offset + 1);
        let era_lock = era.saturating_add(u8::try_from(offset).unwrap_or(u8::MAX));
        let tile = &mut state.board.tiles[index];
        tile.biome = to;
        tile.flip_threshold = flip_threshold;
        tile.era_lock = era_lock;

        let required = catalog
            .biome(to)
            .map(|b| b.required_tags.clone())
            .unwrap_or_default();
        let mut displaced = Vec::new();
        for (owner, _) in state.board.markers.owners(id) {
            let fits = state
                .player(owner)
                .is_some_and(|p| required.is_subset(&p.tags(catalog)));
            if fits {
                continue;
            }
            let removed = state.board.markers.remove_all(id, owner);
            if let Some(p) = state.player_mut(owner) {
                p.markers_on_board = p.markers_on_board.saturating_sub(removed);
            }
            displaced.push((owner, removed));
        }

        tracing::debug!(
            tile = %id,
            from = %from,
            to = %to,
            displaced = displaced.len(),
            "tile flipped"
        );
        report.flipped.push(FlippedTile {
            tile: id,
            from,
            to,
            flip_threshold,
            era_lock,
            displaced,
        });
    }

    tracing::info!(roll, flipped = report.flipped.len(), "environment turnover");
    report
}
