//! End-of-game scoring and organism matching.
//!
//! Final score is `markers_on_board * complexity + tile_score * tiles_controlled`.
//! The multiplayer winner is the highest score, with ties going to the lowest
//! seat.

use serde::{Deserialize, Serialize};

use crate::catalog::{Catalog, OrganismId, TraitId};
use crate::core::{EngineConfig, GameState, Player, PlayerId};

/// One player's final score, broken down.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Score {
    pub player: PlayerId,
    pub markers_on_board: u32,
    pub complexity: u32,
    pub tiles_controlled: u32,
    pub total: u32,
}

/// Score one player.
#[must_use]
pub fn score_player(catalog: &Catalog, config: &EngineConfig, player: &Player) -> Score {
    let complexity = player.complexity(catalog);
    let total = player
        .markers_on_board
        .saturating_mul(complexity)
        .saturating_add(config.tile_score.saturating_mul(player.tiles_controlled));
    Score {
        player: player.id,
        markers_on_board: player.markers_on_board,
        complexity,
        tiles_controlled: player.tiles_controlled,
        total,
    }
}

/// Scores for every player, by id.
#[must_use]
pub fn final_scores(catalog: &Catalog, config: &EngineConfig, state: &GameState) -> Vec<Score> {
    state
        .players
        .iter()
        .map(|p| score_player(catalog, config, p))
        .collect()
}

/// Highest scorer; the lowest seat wins ties.
#[must_use]
pub fn leader(state: &GameState, scores: &[Score]) -> Option<PlayerId> {
    let seat = |id: PlayerId| state.player(id).map_or(u8::MAX, |p| p.seat);
    scores
        .iter()
        .min_by_key(|s| (std::cmp::Reverse(s.total), seat(s.player)))
        .map(|s| s.player)
}

/// How closely a player's traits resemble a real organism.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OrganismMatch {
    pub organism: OrganismId,
    /// Jaccard similarity of the two trait sets, 0.0 to 1.0.
    pub similarity: f64,
    /// Traits both have.
    pub shared: Vec<TraitId>,
    /// Organism traits the player lacks.
    pub missing: Vec<TraitId>,
    /// Player traits the organism lacks.
    pub extra: Vec<TraitId>,
}

/// The `top_n` organisms alive in `era` closest to `player`.
///
/// Sorted by similarity, descending; catalog order breaks ties.
#[must_use]
pub fn closest_organisms(
    catalog: &Catalog,
    player: &Player,
    era: u8,
    top_n: usize,
) -> Vec<OrganismMatch> {
    let mut matches: Vec<OrganismMatch> = catalog
        .organisms()
        .filter(|o| (o.era_min..=o.era_max).contains(&era))
        .map(|o| {
            let shared: Vec<TraitId> =
                o.traits.iter().copied().filter(|&t| player.owns(t)).collect();
            let missing: Vec<TraitId> =
                o.traits.iter().copied().filter(|&t| !player.owns(t)).collect();
            let extra: Vec<TraitId> = player
                .traits
                .iter()
                .copied()
                .filter(|t| !o.traits.contains(t))
                .collect();
            let union = shared.len() + missing.len() + extra.len();
            let similarity = if union == 0 {
                0.0
            } else {
                shared.len() as f64 / union as f64
            };
            OrganismMatch {
                organism: o.id,
                similarity,
                shared,
                missing,
                extra,
            }
        })
        .collect();

    // Stable sort keeps catalog order on ties.
    matches.sort_by(|a, b| b.similarity.total_cmp(&a.similarity));
    matches.truncate(top_n);
    matches
}
