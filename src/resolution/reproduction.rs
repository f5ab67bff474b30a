//! Reproduction: turning a die roll into alleles.

use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;
use crate::core::{ActionError, EngineConfig, GameState, PlayerId};

/// Breakdown of one reproduction roll.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReproductionReport {
    pub player: PlayerId,
    pub die: u8,
    /// Stepped bonus for markers on board.
    pub population_bonus: u32,
    /// One per controlled tile.
    pub tile_bonus: u32,
    /// Summed trait modifiers, may be negative.
    pub fecundity: i32,
    /// Alleles actually added.
    pub gained: u32,
}

/// Population bonus: +1 for every tier `markers_on_board` has reached.
///
/// ```
/// use primeval::resolution::population_bonus;
///
/// assert_eq!(population_bonus(3, [4, 7, 10]), 0);
/// assert_eq!(population_bonus(7, [4, 7, 10]), 2);
/// assert_eq!(population_bonus(12, [4, 7, 10]), 3);
/// ```
#[must_use]
pub fn population_bonus(markers_on_board: u32, tiers: [u32; 3]) -> u32 {
    tiers.iter().filter(|&&t| markers_on_board >= t).count() as u32
}

/// Add alleles for a die value supplied by the caller.
///
/// The die is never re-rolled here. A negative fecundity total can cancel the
/// gain but never takes alleles away.
pub fn reproduce(
    catalog: &Catalog,
    config: &EngineConfig,
    state: &mut GameState,
    player: PlayerId,
    die: u8,
) -> Result<ReproductionReport, ActionError> {
    if !(1..=6).contains(&die) {
        return Err(ActionError::InvalidDie(die));
    }
    let record = state
        .player_mut(player)
        .ok_or(ActionError::UnknownPlayer(player))?;

    let population_bonus = population_bonus(record.markers_on_board, config.population_tiers);
    let tile_bonus = record.tiles_controlled;
    let fecundity = record.fecundity(catalog);
    let raw = i64::from(die)
        + i64::from(population_bonus)
        + i64::from(tile_bonus)
        + i64::from(fecundity);
    let gained = u32::try_from(raw.max(0)).unwrap_or(u32::MAX);

    record.alleles = record.alleles.saturating_add(gained);
    record.has_rolled = true;

    tracing::debug!(%player, die, gained, "reproduction");
    Ok(ReproductionReport {
        player,
        die,
        population_bonus,
        tile_bonus,
        fecundity,
        gained,
    })
}
