//! Competition for shared tiles.
//!
//! Every tile held by two or more sides is contested. Each side's strength is
//!
//! ```text
//! markers + matching bonus tags + specialization bonus + d6
//!         (+ era / 3 + biome affinity, rivals only)
//! ```
//!
//! Sides are ordered players by ascending id with the rival side last, and
//! dice are rolled in that order. On equal strength the earlier side wins,
//! so the lowest player index takes a tie and rivals never win one.
//!
//! `tiles_controlled` is recounted from zero on every resolution.

use serde::{Deserialize, Serialize};

use crate::board::TileId;
use crate::catalog::{Catalog, Climate, TagSet};
use crate::core::{EngineConfig, GameState, PlayerId, RandomSource};

/// One party in a contest.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Player(PlayerId),
    /// The solo-mode rival population.
    Rival,
}

impl Side {
    #[must_use]
    pub fn player(self) -> Option<PlayerId> {
        match self {
            Side::Player(p) => Some(p),
            Side::Rival => None,
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Player(p) => write!(f, "{p}"),
            Side::Rival => f.write_str("Rivals"),
        }
    }
}

/// Strength breakdown for one side on one tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Combatant {
    pub side: Side,
    pub markers: u32,
    pub tag_bonus: u32,
    pub specialization_bonus: u32,
    /// Rivals only.
    pub era_bonus: u32,
    /// Rivals only: aquatic biome and equatorial band.
    pub affinity_bonus: u32,
    pub roll: u8,
    pub strength: u32,
}

/// A resolved contest.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contest {
    pub tile: TileId,
    /// Every side, in roll order.
    pub combatants: Vec<Combatant>,
    pub winner: Side,
    pub runner_up: Side,
    /// Winner strength minus runner-up strength.
    pub margin: u32,
    /// Runner-up markers removed from the tile.
    pub displaced: u32,
}

impl Contest {
    #[must_use]
    pub fn combatant(&self, side: Side) -> Option<&Combatant> {
        self.combatants.iter().find(|c| c.side == side)
    }
}

/// Everything that happened in one competition step.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompetitionReport {
    pub contests: Vec<Contest>,
    /// Tiles held by a single player, credited without a roll.
    pub uncontested: Vec<(TileId, PlayerId)>,
}

impl CompetitionReport {
    #[must_use]
    pub fn contest_on(&self, tile: TileId) -> Option<&Contest> {
        self.contests.iter().find(|c| c.tile == tile)
    }

    /// Total markers displaced across all contests.
    #[must_use]
    pub fn total_displaced(&self) -> u32 {
        self.contests.iter().map(|c| c.displaced).sum()
    }
}

/// Index of the strongest combatant; the earliest wins ties.
fn strongest(combatants: &[Combatant], skip: Option<usize>) -> Option<usize> {
    let mut best: Option<usize> = None;
    for (i, c) in combatants.iter().enumerate() {
        if Some(i) == skip {
            continue;
        }
        match best {
            Some(b) if combatants[b].strength >= c.strength => {}
            _ => best = Some(i),
        }
    }
    best
}

/// Resolve every contested and uncontested tile.
pub fn resolve_competition(
    catalog: &Catalog,
    config: &EngineConfig,
    state: &mut GameState,
    rng: &mut dyn RandomSource,
) -> CompetitionReport {
    let mut report = CompetitionReport::default();
    let solo = state.is_solo();
    let era = state.era;
    let tags: Vec<TagSet> = state.players.iter().map(|p| p.tags(catalog)).collect();
    for player in &mut state.players {
        player.tiles_controlled = 0;
    }

    let tile_ids: Vec<TileId> = state.board.tiles.iter().map(|t| t.id).collect();
    for tile in tile_ids {
        let owners = state.board.markers.owners(tile);
        let rivals = if solo { state.board.rivals.count(tile) } else { 0 };
        let sides = owners.len() + usize::from(rivals > 0);

        if sides < 2 {
            if let [(owner, _)] = owners.as_slice() {
                if let Some(player) = state.player_mut(*owner) {
                    player.tiles_controlled += 1;
                }
                report.uncontested.push((tile, *owner));
            }
            continue;
        }

        let Some(def) = state.board.tile(tile) else {
            continue;
        };
        let biome = catalog.biome(def.biome);
        let bonus_tags = biome.map(|b| b.bonus_tags.clone()).unwrap_or_default();

        let mut combatants = Vec::with_capacity(sides);
        for &(owner, markers) in &owners {
            let tag_bonus = tags
                .get(owner.index())
                .map_or(0, |t| t.overlap(&bonus_tags) as u32);
            let specialization_bonus = match state.player(owner) {
                Some(p) if p.specializes_in(def.biome) => config.specialization_bonus,
                _ => 0,
            };
            let roll = rng.roll_d6();
            combatants.push(Combatant {
                side: Side::Player(owner),
                markers,
                tag_bonus,
                specialization_bonus,
                era_bonus: 0,
                affinity_bonus: 0,
                roll,
                strength: markers + tag_bonus + specialization_bonus + u32::from(roll),
            });
        }
        if rivals > 0 {
            let era_bonus = u32::from(era / 3);
            let affinity_bonus = u32::from(biome.is_some_and(|b| b.aquatic))
                + u32::from(def.climate == Climate::Equatorial);
            let roll = rng.roll_d6();
            combatants.push(Combatant {
                side: Side::Rival,
                markers: rivals,
                tag_bonus: 0,
                specialization_bonus: 0,
                era_bonus,
                affinity_bonus,
                roll,
                strength: rivals + era_bonus + affinity_bonus + u32::from(roll),
            });
        }

        let Some(w) = strongest(&combatants, None) else {
            continue;
        };
        let Some(r) = strongest(&combatants, Some(w)) else {
            continue;
        };
        let winner = combatants[w].side;
        let runner_up = combatants[r].side;
        let margin = combatants[w].strength - combatants[r].strength;

        let displaced = if margin >= config.displacement_margin {
            match runner_up {
                Side::Player(loser) => {
                    let removed = state.board.markers.remove_all(tile, loser);
                    if let Some(p) = state.player_mut(loser) {
                        p.markers_on_board = p.markers_on_board.saturating_sub(removed);
                    }
                    removed
                }
                Side::Rival => {
                    let removed = state.board.rivals.remove(tile, rivals);
                    state.rival_total = state.rival_total.saturating_sub(removed);
                    removed
                }
            }
        } else {
            0
        };

        if let Side::Player(p) = winner {
            if let Some(player) = state.player_mut(p) {
                player.tiles_controlled += 1;
            }
        }

        tracing::debug!(%tile, %winner, %runner_up, margin, displaced, "contest resolved");
        report.contests.push(Contest {
            tile,
            combatants,
            winner,
            runner_up,
            margin,
            displaced,
        });
    }

    tracing::info!(
        contests = report.contests.len(),
        displaced = report.total_displaced(),
        "competition resolved"
    );
    report
}
