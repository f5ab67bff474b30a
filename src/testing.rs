//! Shared fixtures for unit tests.

use crate::board::{hex, Board, Tile, TileId};
use crate::catalog::{Catalog, Climate};
use crate::core::{GameMode, GameState, Player, PlayerId};

pub(crate) const CATALOG_JSON: &str = include_str!("../data/catalog.json");

pub(crate) fn fixture_catalog() -> Catalog {
    Catalog::from_json(CATALOG_JSON).expect("fixture catalog is valid")
}

/// Radius-1 board (7 tiles, centre is tile 3) with one biome per tile.
///
/// Tile layout by id: 0 (0,-1), 1 (1,-1), 2 (-1,0), 3 (0,0), 4 (1,0),
/// 5 (-1,1), 6 (0,1).
pub(crate) fn board_of(catalog: &Catalog, biomes: [&str; 7]) -> Board {
    let tiles = hex::hexagon(1)
        .into_iter()
        .zip(biomes)
        .map(|(coord, key)| Tile {
            id: TileId(0),
            coord,
            biome: catalog.biome_id(key).expect("fixture biome"),
            climate: Climate::Temperate,
            flip_threshold: 6,
            era_lock: 0,
        })
        .collect();
    Board::new(tiles)
}

pub(crate) fn flats_board(catalog: &Catalog) -> Board {
    board_of(catalog, ["tidal_flats"; 7])
}

pub(crate) fn two_player_state(catalog: &Catalog) -> GameState {
    let players = vec![
        Player::new(PlayerId(0), "Ada", 0, 6),
        Player::new(PlayerId(1), "Bo", 1, 6),
    ];
    GameState::new(GameMode::Local, flats_board(catalog), players)
}

pub(crate) fn solo_state(catalog: &Catalog) -> GameState {
    let players = vec![Player::new(PlayerId(0), "Ada", 0, 6)];
    GameState::new(GameMode::Solo, flats_board(catalog), players)
}

/// Give a player a trait by key.
pub(crate) fn give(catalog: &Catalog, state: &mut GameState, player: PlayerId, key: &str) {
    let id = catalog.trait_id(key).expect("fixture trait");
    state.player_mut(player).expect("fixture player").traits.push(id);
}

/// Put markers on the board and keep the per-player counts in step.
pub(crate) fn place(state: &mut GameState, tile: u16, player: PlayerId, count: u32) {
    state.board.markers.add(TileId(tile), player, count);
    state.sync_counts();
}
