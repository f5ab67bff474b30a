//! Trait acquisition.
//!
//! ## Cost
//!
//! `cost = base - min(cap, satisfied soft prerequisites) + surcharge`, where
//! the surcharge steps up by one at each complexity tier the buyer has
//! crossed. The cost never drops below zero.
//!
//! ## Specialization
//!
//! A trait flagged `grants_specialization` binds the buyer to the biome of
//! one of their occupied tiles, picked at random. The pick happens after every
//! other check has passed, so a rejected purchase consumes no randomness.

use serde::{Deserialize, Serialize};

use crate::catalog::{Catalog, TraitDef, TraitId};
use crate::core::rng::choose;
use crate::core::{
    Acquisition, ActionError, EngineConfig, GameState, Player, PlayerId, RandomSource,
    Specialization,
};

/// Price breakdown for one trait and one buyer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    pub base: u32,
    /// Alleles knocked off for owned soft prerequisites.
    pub discount: u32,
    /// Alleles added for the buyer's complexity.
    pub surcharge: u32,
    pub cost: u32,
}

/// Result of a successful purchase.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AcquisitionReport {
    pub player: PlayerId,
    pub trait_id: TraitId,
    pub quote: Quote,
    /// Binding created by this purchase, if the trait grants one.
    pub specialization: Option<Specialization>,
}

/// Surcharge for a buyer whose traits sum to `complexity`.
///
/// ```
/// use primeval::resolution::complexity_surcharge;
///
/// assert_eq!(complexity_surcharge(5, [6, 11, 16]), 0);
/// assert_eq!(complexity_surcharge(11, [6, 11, 16]), 2);
/// assert_eq!(complexity_surcharge(40, [6, 11, 16]), 3);
/// ```
#[must_use]
pub fn complexity_surcharge(complexity: u32, tiers: [u32; 3]) -> u32 {
    tiers.iter().filter(|&&t| complexity >= t).count() as u32
}

/// Price `def` for `player`.
#[must_use]
pub fn quote(catalog: &Catalog, config: &EngineConfig, player: &Player, def: &TraitDef) -> Quote {
    let satisfied = def.soft_prereqs.iter().filter(|&&t| player.owns(t)).count() as u32;
    let discount = satisfied.min(config.soft_discount_cap);
    let surcharge = complexity_surcharge(player.complexity(catalog), config.complexity_tiers);
    let cost = (def.cost + surcharge).saturating_sub(discount);
    Quote {
        base: def.cost,
        discount,
        surcharge,
        cost,
    }
}

/// True if the hard prerequisites, or one full alternate set, are owned.
#[must_use]
pub fn prerequisites_met(player: &Player, def: &TraitDef) -> bool {
    let hard = def.hard_prereqs.iter().all(|&t| player.owns(t));
    hard || def
        .alt_prereqs
        .iter()
        .any(|set| set.iter().all(|&t| player.owns(t)))
}

/// Check every precondition except affordability.
pub fn check_eligible(
    catalog: &Catalog,
    era: u8,
    player: &Player,
    def: &TraitDef,
) -> Result<(), ActionError> {
    if player.owns(def.id) {
        return Err(ActionError::AlreadyOwned);
    }
    if !def.available_in(era) {
        return Err(ActionError::OutsideEraWindow {
            min: def.era_min,
            max: def.era_max,
        });
    }
    if !prerequisites_met(player, def) {
        return Err(ActionError::MissingPrerequisites);
    }
    if let Some(&clash) = def.incompatible.iter().find(|&&t| player.owns(t)) {
        let name = catalog
            .get_trait(clash)
            .map_or_else(|| clash.to_string(), |t| t.name.clone());
        return Err(ActionError::Incompatible(name));
    }
    Ok(())
}

/// Buy a trait for `player`.
///
/// Either every check passes and the purchase lands in full, or nothing
/// changes and the first failing reason is returned.
pub fn acquire_trait(
    catalog: &Catalog,
    config: &EngineConfig,
    state: &mut GameState,
    player: PlayerId,
    trait_id: TraitId,
    rng: &mut dyn RandomSource,
) -> Result<AcquisitionReport, ActionError> {
    let def = catalog
        .get_trait(trait_id)
        .ok_or(ActionError::UnknownTrait(trait_id))?;
    let buyer = state.player(player).ok_or(ActionError::UnknownPlayer(player))?;

    check_eligible(catalog, state.era, buyer, def)?;
    let quote = quote(catalog, config, buyer, def);
    if quote.cost > buyer.alleles {
        return Err(ActionError::NotEnoughAlleles {
            cost: quote.cost,
            available: buyer.alleles,
        });
    }

    let specialization = if def.grants_specialization {
        let occupied = state.board.tiles_of(player);
        let &tile = choose(rng, &occupied).ok_or(ActionError::NoOccupiedTiles)?;
        let biome = state
            .board
            .tile(tile)
            .map(|t| t.biome)
            .ok_or(ActionError::UnknownTile(tile))?;
        let bonus_tag = catalog
            .biome(biome)
            .and_then(|b| choose(rng, b.bonus_tags.as_slice()).copied());
        Some(Specialization {
            granted_by: trait_id,
            biome,
            bonus_tag,
        })
    } else {
        None
    };

    let era = state.era;
    let buyer = state
        .player_mut(player)
        .ok_or(ActionError::UnknownPlayer(player))?;
    buyer.alleles -= quote.cost;
    buyer.traits.push(trait_id);
    buyer.hand.retain(|&t| t != trait_id);
    buyer.acquisitions.push(Acquisition {
        era,
        trait_id,
        cost: quote.cost,
    });
    if let Some(binding) = &specialization {
        buyer.specializations.push(binding.clone());
    }

    tracing::debug!(%player, trait_key = %def.key, cost = quote.cost, "trait acquired");
    Ok(AcquisitionReport {
        player,
        trait_id,
        quote,
        specialization,
    })
}
