//! Board tiles.

use serde::{Deserialize, Serialize};

use super::hex::HexCoord;
use crate::catalog::{BiomeDef, BiomeId, Catalog, Climate};

/// Tile identifier: the tile's index on the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TileId(pub u16);

impl TileId {
    #[must_use]
    pub const fn new(id: u16) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for TileId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Tile({})", self.0)
    }
}

/// One hex of the board.
///
/// Marker ownership is kept in the board's ledgers, not on the tile.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    pub id: TileId,
    pub coord: HexCoord,
    /// Current biome. Changes on a tile flip.
    pub biome: BiomeId,
    /// Fixed latitude band.
    pub climate: Climate,
    /// Flips when the era's turnover roll is at least this (1-6).
    pub flip_threshold: u8,
    /// Biome cannot change before this era.
    pub era_lock: u8,
}

impl Tile {
    /// True once the era-lock has passed.
    #[must_use]
    pub fn is_unlocked(&self, era: u8) -> bool {
        era >= self.era_lock
    }

    /// Biome metadata (required and bonus tags, display data).
    #[must_use]
    pub fn biome_def<'a>(&self, catalog: &'a Catalog) -> Option<&'a BiomeDef> {
        catalog.biome(self.biome)
    }
}
