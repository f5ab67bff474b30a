//! Board: hex tiles plus marker ledgers.
//!
//! ## Key Types
//!
//! - `HexCoord`: axial grid position
//! - `Tile`: biome, climate, flip threshold and era-lock of one hex
//! - `MarkerLedger`: `(tile, player) -> count`
//! - `RivalLedger`: `tile -> count` for solo games
//!
//! The board never checks game rules. It answers adjacency and occupancy
//! questions and keeps the ledgers consistent; the engine decides what moves
//! are legal.

pub mod hex;
pub mod ledger;
pub mod tile;

pub use hex::HexCoord;
pub use ledger::{MarkerEntry, MarkerLedger, RivalEntry, RivalLedger};
pub use tile::{Tile, TileId};

use serde::{Deserialize, Serialize};

use crate::core::PlayerId;

/// Ordered tiles plus the marker ledgers.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    /// Tiles indexed by `TileId`.
    pub tiles: Vec<Tile>,
    pub markers: MarkerLedger,
    /// Rival markers. Always empty outside solo games.
    pub rivals: RivalLedger,
}

impl Board {
    /// Create a board from tiles, renumbering ids to match their index.
    #[must_use]
    pub fn new(mut tiles: Vec<Tile>) -> Self {
        for (i, tile) in tiles.iter_mut().enumerate() {
            tile.id = TileId(u16::try_from(i).unwrap_or(u16::MAX));
        }
        Self {
            tiles,
            markers: MarkerLedger::new(),
            rivals: RivalLedger::default(),
        }
    }

    #[must_use]
    pub fn tile(&self, id: TileId) -> Option<&Tile> {
        self.tiles.get(id.index())
    }

    pub fn tile_mut(&mut self, id: TileId) -> Option<&mut Tile> {
        self.tiles.get_mut(id.index())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Tile at a grid position.
    #[must_use]
    pub fn tile_at(&self, coord: HexCoord) -> Option<TileId> {
        self.tiles.iter().find(|t| t.coord == coord).map(|t| t.id)
    }

    /// Neighbouring tiles that exist on the board, ascending.
    #[must_use]
    pub fn neighbors(&self, id: TileId) -> Vec<TileId> {
        let Some(tile) = self.tile(id) else {
            return Vec::new();
        };
        let mut ids: Vec<TileId> = tile
            .coord
            .neighbors()
            .filter_map(|coord| self.tile_at(coord))
            .collect();
        ids.sort_unstable();
        ids
    }

    /// True if the tiles share an edge.
    #[must_use]
    pub fn are_adjacent(&self, a: TileId, b: TileId) -> bool {
        match (self.tile(a), self.tile(b)) {
            (Some(a), Some(b)) => a.coord.is_adjacent(b.coord),
            _ => false,
        }
    }

    /// True if neither players nor rivals hold the tile.
    #[must_use]
    pub fn is_vacant(&self, id: TileId) -> bool {
        !self.markers.is_occupied(id) && self.rivals.count(id) == 0
    }

    /// Tiles where `player` has markers, ascending.
    #[must_use]
    pub fn tiles_of(&self, player: PlayerId) -> Vec<TileId> {
        self.markers.tiles_of(player).into_iter().map(|(t, _)| t).collect()
    }

    /// True if `tile` is held by `player` or touches a tile they hold.
    #[must_use]
    pub fn within_reach(&self, tile: TileId, player: PlayerId) -> bool {
        if self.markers.count(tile, player) > 0 {
            return true;
        }
        self.neighbors(tile)
            .into_iter()
            .any(|n| self.markers.count(n, player) > 0)
    }

    /// True if any neighbour holds rivals.
    #[must_use]
    pub fn touches_rivals(&self, tile: TileId) -> bool {
        self.neighbors(tile)
            .into_iter()
            .any(|n| self.rivals.count(n) > 0)
    }
}
