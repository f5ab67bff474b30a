//! The seven phases of an era.

use serde::{Deserialize, Serialize};

/// Phase within an era, in fixed cyclic order.
///
/// `AlleleRoll`, `Evolution` and `Populate` are per-player sub-turns; the
/// other four are single resolution steps run once per era.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    #[default]
    AlleleRoll,
    Draw,
    Evolution,
    Populate,
    Competition,
    TileFlip,
    Event,
}

impl Phase {
    /// Every phase in play order.
    pub const ALL: [Phase; 7] = [
        Phase::AlleleRoll,
        Phase::Draw,
        Phase::Evolution,
        Phase::Populate,
        Phase::Competition,
        Phase::TileFlip,
        Phase::Event,
    ];

    /// The following phase. `Event` wraps to `AlleleRoll` (the caller bumps the era).
    #[must_use]
    pub const fn next(self) -> Phase {
        match self {
            Phase::AlleleRoll => Phase::Draw,
            Phase::Draw => Phase::Evolution,
            Phase::Evolution => Phase::Populate,
            Phase::Populate => Phase::Competition,
            Phase::Competition => Phase::TileFlip,
            Phase::TileFlip => Phase::Event,
            Phase::Event => Phase::AlleleRoll,
        }
    }

    /// True for phases where each player takes a sub-turn.
    #[must_use]
    pub const fn is_per_player(self) -> bool {
        matches!(self, Phase::AlleleRoll | Phase::Evolution | Phase::Populate)
    }

    /// True for the last phase of an era.
    #[must_use]
    pub const fn ends_era(self) -> bool {
        matches!(self, Phase::Event)
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Phase::AlleleRoll => "allele roll",
            Phase::Draw => "draw",
            Phase::Evolution => "evolution",
            Phase::Populate => "populate",
            Phase::Competition => "competition",
            Phase::TileFlip => "tile flip",
            Phase::Event => "event",
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
