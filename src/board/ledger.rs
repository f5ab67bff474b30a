//! Marker ledgers.
//!
//! [`MarkerLedger`] counts player markers per `(tile, player)`;
//! [`RivalLedger`] counts rival markers per tile in solo games. Both are
//! persistent ordered maps, so cloning a snapshot is O(1) and iteration is in
//! tile order. Zero counts are never stored.
//!
//! On the wire both serialize as flat entry lists.

use im::OrdMap;
use serde::{Deserialize, Serialize};

use super::tile::TileId;
use crate::core::PlayerId;

/// Serialized form of one ledger entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkerEntry {
    pub tile: TileId,
    pub player: PlayerId,
    pub count: u32,
}

/// Player markers keyed by `(tile, player)`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<MarkerEntry>", into = "Vec<MarkerEntry>")]
pub struct MarkerLedger {
    counts: OrdMap<(TileId, PlayerId), u32>,
}

impl From<Vec<MarkerEntry>> for MarkerLedger {
    fn from(entries: Vec<MarkerEntry>) -> Self {
        let mut ledger = MarkerLedger::default();
        for entry in entries {
            ledger.add(entry.tile, entry.player, entry.count);
        }
        ledger
    }
}

impl From<MarkerLedger> for Vec<MarkerEntry> {
    fn from(ledger: MarkerLedger) -> Self {
        ledger
            .counts
            .iter()
            .map(|(&(tile, player), &count)| MarkerEntry { tile, player, count })
            .collect()
    }
}

impl MarkerLedger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Markers `player` has on `tile`.
    #[must_use]
    pub fn count(&self, tile: TileId, player: PlayerId) -> u32 {
        self.counts.get(&(tile, player)).copied().unwrap_or(0)
    }

    pub fn add(&mut self, tile: TileId, player: PlayerId, count: u32) {
        if count == 0 {
            return;
        }
        *self.counts.entry((tile, player)).or_insert(0) += count;
    }

    /// Remove up to `count` markers. Returns how many were removed.
    pub fn remove(&mut self, tile: TileId, player: PlayerId, count: u32) -> u32 {
        let current = self.count(tile, player);
        let removed = current.min(count);
        if removed == current {
            self.counts.remove(&(tile, player));
        } else {
            self.counts.insert((tile, player), current - removed);
        }
        removed
    }

    /// Remove every marker `player` has on `tile`.
    pub fn remove_all(&mut self, tile: TileId, player: PlayerId) -> u32 {
        self.counts.remove(&(tile, player)).unwrap_or(0)
    }

    /// `(player, count)` pairs on a tile, in player order.
    #[must_use]
    pub fn owners(&self, tile: TileId) -> Vec<(PlayerId, u32)> {
        self.counts
            .range((tile, PlayerId(0))..=(tile, PlayerId(u8::MAX)))
            .map(|(&(_, player), &count)| (player, count))
            .collect()
    }

    /// `(tile, count)` pairs for a player, in tile order.
    #[must_use]
    pub fn tiles_of(&self, player: PlayerId) -> Vec<(TileId, u32)> {
        self.counts
            .iter()
            .filter(|(&(_, p), _)| p == player)
            .map(|(&(tile, _), &count)| (tile, count))
            .collect()
    }

    /// Sum of a player's markers across the board.
    #[must_use]
    pub fn total_for(&self, player: PlayerId) -> u32 {
        self.counts
            .iter()
            .filter(|(&(_, p), _)| p == player)
            .map(|(_, &count)| count)
            .sum()
    }

    /// True if any player has markers on the tile.
    #[must_use]
    pub fn is_occupied(&self, tile: TileId) -> bool {
        !self.owners(tile).is_empty()
    }

    /// Tiles holding at least one player marker, ascending.
    #[must_use]
    pub fn occupied_tiles(&self) -> Vec<TileId> {
        let mut tiles: Vec<TileId> = self.counts.keys().map(|&(tile, _)| tile).collect();
        tiles.dedup();
        tiles
    }

    pub fn iter(&self) -> impl Iterator<Item = MarkerEntry> + '_ {
        self.counts
            .iter()
            .map(|(&(tile, player), &count)| MarkerEntry { tile, player, count })
    }
}

/// Serialized form of one rival ledger entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RivalEntry {
    pub tile: TileId,
    pub count: u32,
}

/// Rival markers per tile.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<RivalEntry>", into = "Vec<RivalEntry>")]
pub struct RivalLedger {
    counts: OrdMap<TileId, u32>,
}

impl From<Vec<RivalEntry>> for RivalLedger {
    fn from(entries: Vec<RivalEntry>) -> Self {
        let mut ledger = RivalLedger::default();
        for entry in entries {
            ledger.add(entry.tile, entry.count);
        }
        ledger
    }
}

impl From<RivalLedger> for Vec<RivalEntry> {
    fn from(ledger: RivalLedger) -> Self {
        ledger
            .counts
            .iter()
            .map(|(&tile, &count)| RivalEntry { tile, count })
            .collect()
    }
}

impl RivalLedger {
    #[must_use]
    pub fn count(&self, tile: TileId) -> u32 {
        self.counts.get(&tile).copied().unwrap_or(0)
    }

    pub fn add(&mut self, tile: TileId, count: u32) {
        if count == 0 {
            return;
        }
        *self.counts.entry(tile).or_insert(0) += count;
    }

    /// Remove up to `count` rivals. Returns how many were removed.
    pub fn remove(&mut self, tile: TileId, count: u32) -> u32 {
        let current = self.count(tile);
        let removed = current.min(count);
        if removed == current {
            self.counts.remove(&tile);
        } else {
            self.counts.insert(tile, current - removed);
        }
        removed
    }

    /// Tiles holding rivals, ascending.
    #[must_use]
    pub fn tiles(&self) -> Vec<TileId> {
        self.counts.keys().copied().collect()
    }

    #[must_use]
    pub fn total(&self) -> u32 {
        self.counts.values().sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}
