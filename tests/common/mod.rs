//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use primeval::board::{hex, Board, Tile, TileId};
use primeval::catalog::{Catalog, Climate};
use primeval::core::{EngineConfig, GameMode, GameState, Player, PlayerId};
use primeval::rules::Engine;

pub const CATALOG_JSON: &str = include_str!("../../data/catalog.json");

pub fn catalog() -> Catalog {
    Catalog::from_json(CATALOG_JSON).unwrap()
}

pub fn engine() -> Engine {
    Engine::new(Arc::new(catalog()), EngineConfig::default()).unwrap()
}

/// Radius-1 board, tiles in id order: 0 (0,-1), 1 (1,-1), 2 (-1,0),
/// 3 (0,0) centre, 4 (1,0), 5 (-1,1), 6 (0,1).
pub fn board_of(catalog: &Catalog, biomes: [&str; 7]) -> Board {
    let tiles = hex::hexagon(1)
        .into_iter()
        .zip(biomes)
        .map(|(coord, key)| Tile {
            id: TileId(0),
            coord,
            biome: catalog.biome_id(key).unwrap(),
            climate: Climate::Temperate,
            flip_threshold: 6,
            era_lock: 0,
        })
        .collect();
    Board::new(tiles)
}

pub fn state_with(
    catalog: &Catalog,
    mode: GameMode,
    names: &[&str],
    biomes: [&str; 7],
) -> GameState {
    let players = names
        .iter()
        .enumerate()
        .map(|(i, name)| Player::new(PlayerId(i as u8), *name, i as u8, 6))
        .collect();
    GameState::new(mode, board_of(catalog, biomes), players)
}

pub fn give(catalog: &Catalog, state: &mut GameState, player: PlayerId, key: &str) {
    let id = catalog.trait_id(key).unwrap();
    state.player_mut(player).unwrap().traits.push(id);
}

pub fn place(state: &mut GameState, tile: u16, player: PlayerId, count: u32) {
    state.board.markers.add(TileId(tile), player, count);
    state.sync_counts();
}
