//! Automated players.
//!
//! A [`Policy`] picks one intent from the engine's legal list. The two
//! scripted policies share the same turn skeleton and differ only in which
//! trait they buy next.

use std::cmp::Reverse;

use crate::board::TileId;
use crate::catalog::{Catalog, TagSet, TraitId};
use crate::core::{GameState, Intent, PlayerId, RandomSource};
use crate::resolution;
use crate::rules::Engine;

/// Chooses moves for one seat.
pub trait Policy {
    /// Label used in batch reports.
    fn name(&self) -> &str;

    /// Pick one of `legal` for `player`, or `None` to stop playing.
    ///
    /// A die for reproduction may be rolled from `rng` instead of taken
    /// from `legal`.
    fn choose(
        &mut self,
        engine: &Engine,
        state: &GameState,
        player: PlayerId,
        legal: &[Intent],
        rng: &mut dyn RandomSource,
    ) -> Option<Intent>;
}

/// Uniform choice over the legal intents.
#[derive(Clone, Debug, Default)]
pub struct RandomPolicy;

impl Policy for RandomPolicy {
    fn name(&self) -> &str {
        "random"
    }

    fn choose(
        &mut self,
        _engine: &Engine,
        _state: &GameState,
        _player: PlayerId,
        legal: &[Intent],
        rng: &mut dyn RandomSource,
    ) -> Option<Intent> {
        let index = rng.pick_index(legal.len())?;
        legal.get(index).cloned()
    }
}

/// Buys traits that carry survival tags first, then the cheapest.
///
/// Survival tags are every tag named safe by some event in the catalog.
#[derive(Clone, Debug)]
pub struct Generalist {
    survival: TagSet,
}

impl Generalist {
    #[must_use]
    pub fn new(catalog: &Catalog) -> Self {
        let mut survival = TagSet::new();
        for event in catalog.events() {
            survival.extend_from(&event.safe_tags);
        }
        Self { survival }
    }
}

impl Policy for Generalist {
    fn name(&self) -> &str {
        "generalist"
    }

    fn choose(
        &mut self,
        engine: &Engine,
        state: &GameState,
        player: PlayerId,
        legal: &[Intent],
        rng: &mut dyn RandomSource,
    ) -> Option<Intent> {
        let survival = &self.survival;
        scripted_turn(engine, state, player, legal, rng, |trait_id, cost| {
            let overlap = engine
                .catalog()
                .get_trait(trait_id)
                .map_or(0, |def| def.tags.overlap(survival));
            (Reverse(overlap), cost)
        })
    }
}

/// Works toward one organism's trait list in order, then buys cheapest.
#[derive(Clone, Debug)]
pub struct CladeSpecialist {
    label: String,
    path: Vec<TraitId>,
}

impl CladeSpecialist {
    /// Target the organism with catalog key `key`.
    #[must_use]
    pub fn toward(catalog: &Catalog, key: &str) -> Option<Self> {
        let organism = catalog.organisms().find(|o| o.key == key)?;
        Some(Self {
            label: format!("specialist:{}", organism.key),
            path: organism.traits.clone(),
        })
    }

    #[must_use]
    pub fn path(&self) -> &[TraitId] {
        &self.path
    }
}

impl Policy for CladeSpecialist {
    fn name(&self) -> &str {
        &self.label
    }

    fn choose(
        &mut self,
        engine: &Engine,
        state: &GameState,
        player: PlayerId,
        legal: &[Intent],
        rng: &mut dyn RandomSource,
    ) -> Option<Intent> {
        let path = &self.path;
        scripted_turn(engine, state, player, legal, rng, |trait_id, cost| {
            let step = path.iter().position(|&t| t == trait_id);
            (Reverse(step.is_some()), step.unwrap_or(usize::MAX), cost)
        })
    }
}

/// Roll when allowed, buy by `rank` (lowest first), place on the least
/// contested tile, and end every turn and phase otherwise.
fn scripted_turn<K: Ord>(
    engine: &Engine,
    state: &GameState,
    player: PlayerId,
    legal: &[Intent],
    rng: &mut dyn RandomSource,
    rank: impl Fn(TraitId, u32) -> K,
) -> Option<Intent> {
    if legal.iter().any(Intent::is_roll) {
        return Some(Intent::RollReproduction { die: rng.roll_d6() });
    }

    let record = state.player(player)?;
    let buy = legal
        .iter()
        .filter_map(|intent| match intent {
            Intent::BuyTrait { trait_id } => Some(*trait_id),
            _ => None,
        })
        .min_by_key(|&trait_id| {
            let cost = engine
                .catalog()
                .get_trait(trait_id)
                .map_or(u32::MAX, |def| {
                    resolution::quote(engine.catalog(), engine.config(), record, def).cost
                });
            (rank(trait_id, cost), trait_id)
        });
    if let Some(trait_id) = buy {
        return Some(Intent::BuyTrait { trait_id });
    }

    let place = legal
        .iter()
        .filter_map(|intent| match intent {
            Intent::PlaceMarker { tile } => Some(*tile),
            _ => None,
        })
        .min_by_key(|&tile| {
            let own = state.board.markers.count(tile, player);
            (contested(state, player, tile), own, tile)
        });
    if let Some(tile) = place {
        return Some(Intent::PlaceMarker { tile });
    }

    legal
        .iter()
        .find(|i| matches!(i, Intent::EndTurn | Intent::EndPhase))
        .cloned()
}

/// Markers and rivals on `tile` that do not belong to `player`.
fn contested(state: &GameState, player: PlayerId, tile: TileId) -> u32 {
    let others: u32 = state
        .board
        .markers
        .owners(tile)
        .into_iter()
        .filter(|&(owner, _)| owner != player)
        .map(|(_, count)| count)
        .sum();
    others + state.board.rivals.count(tile)
}
