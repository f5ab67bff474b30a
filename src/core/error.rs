//! Engine rejection reasons.
//!
//! Every mutating engine operation returns `Result<_, ActionError>`. A
//! rejected operation never mutates state; the error's `Display` text is the
//! human-readable reason sent back to the player.

use crate::board::TileId;
use crate::catalog::{Climate, TraitId};
use crate::core::PlayerId;
use crate::rules::Phase;

/// Why the engine refused an operation.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ActionError {
    #[error("the game is over")]
    GameOver,

    #[error("cannot do that during the {actual} phase (expected {expected})")]
    WrongPhase { expected: Phase, actual: Phase },

    #[error("it is {acting}'s turn")]
    NotYourTurn { acting: PlayerId },

    #[error("unknown player {0}")]
    UnknownPlayer(PlayerId),

    #[error("die value {0} is not between 1 and 6")]
    InvalidDie(u8),

    #[error("already rolled this era")]
    AlreadyRolled,

    #[error("unknown trait {0}")]
    UnknownTrait(TraitId),

    #[error("trait already owned")]
    AlreadyOwned,

    #[error("trait is only available in eras {min}-{max}")]
    OutsideEraWindow { min: u8, max: u8 },

    #[error("missing prerequisite traits")]
    MissingPrerequisites,

    #[error("incompatible with {0}")]
    Incompatible(String),

    #[error("not enough alleles (need {cost}, have {available})")]
    NotEnoughAlleles { cost: u32, available: u32 },

    #[error("specialization needs at least one occupied tile")]
    NoOccupiedTiles,

    #[error("unknown tile {0}")]
    UnknownTile(TileId),

    #[error("missing required tag {0}")]
    MissingRequiredTag(String),

    #[error("tile is not adjacent to your population")]
    NotAdjacent,

    #[error("no markers available")]
    NoMarkersAvailable,

    #[error("the {0} phase ends when every player ends their turn")]
    NotResolutionPhase(Phase),

    #[error("the {0} phase has no player turns to end")]
    NoSubTurns(Phase),
}

/// Why a new game could not be set up.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SetupError {
    #[error("{0} players requested, expected 1-4")]
    PlayerCount(usize),

    #[error("solo games take exactly one player, got {0}")]
    SoloPlayerCount(usize),

    #[error("only {available} starting tiles for {needed} players")]
    NoStartingTiles { needed: usize, available: usize },

    #[error("no biome fits the {0:?} climate band")]
    NoBiomeForClimate(Climate),
}
