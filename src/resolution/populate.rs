//! Marker placement.

use serde::{Deserialize, Serialize};

use crate::board::TileId;
use crate::catalog::Catalog;
use crate::core::{ActionError, GameState, PlayerId};

/// A marker that landed on the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacementReport {
    pub player: PlayerId,
    pub tile: TileId,
    /// The player's markers on the tile after placing.
    pub on_tile: u32,
    pub markers_on_board: u32,
}

/// True if the player's tags cover the tile's required tags.
#[must_use]
pub fn is_habitable(catalog: &Catalog, state: &GameState, player: PlayerId, tile: TileId) -> bool {
    check_habitable(catalog, state, player, tile).is_ok()
}

fn check_habitable(
    catalog: &Catalog,
    state: &GameState,
    player: PlayerId,
    tile: TileId,
) -> Result<(), ActionError> {
    let record = state.player(player).ok_or(ActionError::UnknownPlayer(player))?;
    let required = state
        .board
        .tile(tile)
        .and_then(|t| t.biome_def(catalog))
        .map(|b| &b.required_tags)
        .ok_or(ActionError::UnknownTile(tile))?;
    let tags = record.tags(catalog);
    match required.iter().find(|&&tag| !tags.contains(tag)) {
        Some(&missing) => Err(ActionError::MissingRequiredTag(
            catalog.tag_name(missing).unwrap_or("?").to_string(),
        )),
        None => Ok(()),
    }
}

/// Check whether `player` may place a marker on `tile` right now.
///
/// The tile must be held by them or touch a tile they hold. A player with
/// nothing left on the board has no legal placement.
pub fn check_placement(
    catalog: &Catalog,
    state: &GameState,
    player: PlayerId,
    tile: TileId,
) -> Result<(), ActionError> {
    let record = state.player(player).ok_or(ActionError::UnknownPlayer(player))?;
    if state.board.tile(tile).is_none() {
        return Err(ActionError::UnknownTile(tile));
    }
    if record.unused_markers() == 0 {
        return Err(ActionError::NoMarkersAvailable);
    }
    check_habitable(catalog, state, player, tile)?;
    if !state.board.within_reach(tile, player) {
        return Err(ActionError::NotAdjacent);
    }
    Ok(())
}

/// Place one marker.
pub fn place_marker(
    catalog: &Catalog,
    state: &mut GameState,
    player: PlayerId,
    tile: TileId,
) -> Result<PlacementReport, ActionError> {
    check_placement(catalog, state, player, tile)?;

    state.board.markers.add(tile, player, 1);
    let on_tile = state.board.markers.count(tile, player);
    let record = state
        .player_mut(player)
        .ok_or(ActionError::UnknownPlayer(player))?;
    record.markers_on_board += 1;

    tracing::debug!(%player, %tile, on_tile, "marker placed");
    Ok(PlacementReport {
        player,
        tile,
        on_tile,
        markers_on_board: record.markers_on_board,
    })
}

/// Every tile `player` could place on now, ascending.
#[must_use]
pub fn legal_placements(catalog: &Catalog, state: &GameState, player: PlayerId) -> Vec<TileId> {
    state
        .board
        .tiles
        .iter()
        .map(|t| t.id)
        .filter(|&tile| check_placement(catalog, state, player, tile).is_ok())
        .collect()
}
