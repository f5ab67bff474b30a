//! Player intents and the action history.
//!
//! An [`Intent`] is what a participant asks the engine to do. Intents carry
//! every random outcome they depend on as a literal value (the reproduction
//! die), so the host applies them verbatim instead of re-rolling.

use serde::{Deserialize, Serialize};

use super::player::PlayerId;
use crate::board::TileId;
use crate::catalog::TraitId;
use crate::rules::Phase;

/// A typed request from a participant.
///
/// ```
/// use primeval::core::Intent;
///
/// let roll = Intent::RollReproduction { die: 4 };
/// assert!(roll.is_roll());
/// assert!(!Intent::EndTurn.is_roll());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    /// Collect alleles using a die rolled by the requester.
    RollReproduction { die: u8 },
    /// Run the current resolution step and move on.
    EndPhase,
    /// Finish this player's sub-turn.
    EndTurn,
    /// Put one marker on a tile.
    PlaceMarker { tile: TileId },
    /// Acquire a trait.
    BuyTrait { trait_id: TraitId },
}

impl Intent {
    #[must_use]
    pub fn is_roll(&self) -> bool {
        matches!(self, Intent::RollReproduction { .. })
    }

    /// Short label for logs.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Intent::RollReproduction { .. } => "roll-reproduction",
            Intent::EndPhase => "end-phase",
            Intent::EndTurn => "end-turn",
            Intent::PlaceMarker { .. } => "place-marker",
            Intent::BuyTrait { .. } => "buy-trait",
        }
    }
}

/// An applied intent with its position in the game.
///
/// Used for replay and debugging.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionRecord {
    pub player: PlayerId,
    pub intent: Intent,
    pub era: u8,
    pub phase: Phase,
    /// Running count of applied intents.
    pub sequence: u32,
}
