//! Era events: selection pressure on every population.
//!
//! ## Tile fates
//!
//! For each player the event's safe tags are first narrowed to the tags the
//! player actually has. Then, per occupied tile, using the tile's bonus tags:
//!
//! - **Saved**: overlaps the player's safe tags. Takes precedence.
//! - **Doomed**: overlaps the doomed tags. Every marker is lost.
//! - **Neutral**: anything else.
//!
//! One die covers all of a player's neutral tiles. Below the event threshold
//! the player loses half the neutral markers, rounded up, taken tile by tile
//! in id order.
//!
//! ## Floor
//!
//! A player who had markers before the event keeps at least one. If the
//! losses would wipe them out, one marker comes back on the first vacant
//! tile (habitable ones first, falling back to the last tile that lost a
//! marker) and the loss on that last tile is reduced by one, so per-tile
//! losses always sum to the reported total.

use serde::{Deserialize, Serialize};

use super::populate::is_habitable;
use super::rival::{rival_extinction, RivalLossReport};
use crate::board::TileId;
use crate::catalog::{Catalog, EventDef, EventId, EventKind};
use crate::core::{EngineConfig, GameState, PlayerId, RandomSource};

/// How an event treats one tile for one player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TileFate {
    Doomed,
    Saved,
    Neutral,
}

/// Summary status for one player, in precedence order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SurvivalStatus {
    /// At least one tile was doomed.
    Doomed,
    /// The neutral roll came up short.
    FailedRoll,
    /// At least one tile was saved.
    Saved,
    /// Nothing touched the player.
    Passed,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileOutcome {
    pub tile: TileId,
    /// Markers on the tile before the event.
    pub markers: u32,
    pub fate: TileFate,
    pub lost: u32,
}

/// Everything the event did to one player.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerOutcome {
    pub player: PlayerId,
    pub tiles: Vec<TileOutcome>,
    /// The single neutral roll, if the player had neutral tiles.
    pub roll: Option<u8>,
    pub total_lost: u32,
    /// Tile that received the floor marker.
    pub restored_on: Option<TileId>,
    pub status: SurvivalStatus,
}

impl PlayerOutcome {
    /// Count of tiles with the given fate.
    #[must_use]
    pub fn count(&self, fate: TileFate) -> usize {
        self.tiles.iter().filter(|t| t.fate == fate).count()
    }
}

/// Payload describing one resolved event, sent to every participant.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventReport {
    pub event: EventId,
    pub name: String,
    pub kind: EventKind,
    pub era: u8,
    /// One entry per player, by id. Empty for flavor events.
    pub outcomes: Vec<PlayerOutcome>,
    /// Solo games only.
    pub rivals: Option<RivalLossReport>,
}

impl EventReport {
    #[must_use]
    pub fn outcome_for(&self, player: PlayerId) -> Option<&PlayerOutcome> {
        self.outcomes.iter().find(|o| o.player == player)
    }
}

/// Resolve `event` against every player (and the rivals in solo games).
pub fn resolve_event(
    catalog: &Catalog,
    config: &EngineConfig,
    state: &mut GameState,
    event: &EventDef,
    rng: &mut dyn RandomSource,
) -> EventReport {
    let mut report = EventReport {
        event: event.id,
        name: event.name.clone(),
        kind: event.kind,
        era: state.era,
        outcomes: Vec::new(),
        rivals: None,
    };
    if event.kind == EventKind::Flavor {
        tracing::info!(event = %event.key, "flavor event, no losses");
        return report;
    }

    let players: Vec<PlayerId> = state.players.iter().map(|p| p.id).collect();
    for player in players {
        if let Some(outcome) = resolve_player(catalog, state, event, player, rng) {
            tracing::debug!(
                %player,
                lost = outcome.total_lost,
                status = ?outcome.status,
                "event outcome"
            );
            report.outcomes.push(outcome);
        }
    }
    if state.is_solo() {
        report.rivals = Some(rival_extinction(catalog, config, state, event, rng));
    }

    tracing::info!(
        event = %event.key,
        lost = report.outcomes.iter().map(|o| o.total_lost).sum::<u32>(),
        "event resolved"
    );
    report
}

fn resolve_player(
    catalog: &Catalog,
    state: &mut GameState,
    event: &EventDef,
    player: PlayerId,
    rng: &mut dyn RandomSource,
) -> Option<PlayerOutcome> {
    let record = state.player(player)?;
    let before = record.markers_on_board;
    let safe = record.tags(catalog).intersection(&event.safe_tags);

    let mut tiles: Vec<TileOutcome> = state
        .board
        .markers
        .tiles_of(player)
        .into_iter()
        .map(|(tile, markers)| {
            let bonus = state
                .board
                .tile(tile)
                .and_then(|t| catalog.biome(t.biome))
                .map(|b| &b.bonus_tags);
            let fate = match bonus {
                Some(b) if b.intersects(&safe) => TileFate::Saved,
                Some(b) if b.intersects(&event.doomed_tags) => TileFate::Doomed,
                _ => TileFate::Neutral,
            };
            let lost = if fate == TileFate::Doomed { markers } else { 0 };
            TileOutcome {
                tile,
                markers,
                fate,
                lost,
            }
        })
        .collect();

    let neutral: u32 = tiles
        .iter()
        .filter(|t| t.fate == TileFate::Neutral)
        .map(|t| t.markers)
        .sum();
    let roll = (neutral > 0).then(|| rng.roll_d6());
    let failed = roll.is_some_and(|r| r < event.neutral_roll);
    if failed {
        let mut owed = neutral.div_ceil(2);
        for outcome in tiles.iter_mut().filter(|t| t.fate == TileFate::Neutral) {
            let take = outcome.markers.min(owed);
            outcome.lost = take;
            owed -= take;
            if owed == 0 {
                break;
            }
        }
    }

    for outcome in &tiles {
        if outcome.lost > 0 {
            state.board.markers.remove(outcome.tile, player, outcome.lost);
        }
    }
    let mut total_lost: u32 = tiles.iter().map(|t| t.lost).sum();
    let after = before.saturating_sub(total_lost);

    let mut restored_on = None;
    if before > 0 && after == 0 {
        let last_lost = tiles.iter().rposition(|t| t.lost > 0);
        let vacant: Vec<TileId> = state
            .board
            .tiles
            .iter()
            .map(|t| t.id)
            .filter(|&t| state.board.is_vacant(t))
            .collect();
        let target = vacant
            .iter()
            .copied()
            .find(|&t| is_habitable(catalog, state, player, t))
            .or_else(|| vacant.first().copied())
            .or_else(|| last_lost.map(|i| tiles[i].tile));
        if let (Some(target), Some(i)) = (target, last_lost) {
            state.board.markers.add(target, player, 1);
            tiles[i].lost -= 1;
            total_lost -= 1;
            restored_on = Some(target);
        }
    }

    let status = if tiles.iter().any(|t| t.fate == TileFate::Doomed) {
        SurvivalStatus::Doomed
    } else if failed {
        SurvivalStatus::FailedRoll
    } else if tiles.iter().any(|t| t.fate == TileFate::Saved) {
        SurvivalStatus::Saved
    } else {
        SurvivalStatus::Passed
    };

    let record = state.player_mut(player)?;
    record.markers_on_board = before.saturating_sub(total_lost);
    record.extinctions_survived += 1;

    Some(PlayerOutcome {
        player,
        tiles,
        roll,
        total_lost,
        restored_on,
        status,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ScriptedRng;
    use crate::testing::{board_of, fixture_catalog, give, place, solo_state, two_player_state};

    const P0: PlayerId = PlayerId(0);
    const P1: PlayerId = PlayerId(1);

    fn event<'a>(catalog: &'a Catalog, key: &str) -> &'a EventDef {
        catalog.event(catalog.event_id(key).unwrap()).unwrap()
    }

    /// Tile 0 shallow sea (Reef, doomed by an ice age), tile 1 tidal flats
    /// (Burrower, safe for burrowers), tile 2 deep ocean (neutral).
    fn ice_age_board(catalog: &Catalog) -> crate::board::Board {
        board_of(
            catalog,
            [
                "shallow_sea",
                "tidal_flats",
                "deep_ocean",
                "tidal_flats",
                "tidal_flats",
                "tidal_flats",
                "tidal_flats",
            ],
        )
    }

    #[test]
    fn test_doomed_saved_and_neutral() {
        let catalog = fixture_catalog();
        let config = EngineConfig::default();
        let mut state = two_player_state(&catalog);
        state.board = ice_age_board(&catalog);
        give(&catalog, &mut state, P0, "burrowing");
        place(&mut state, 0, P0, 2);
        place(&mut state, 1, P0, 1);
        place(&mut state, 2, P0, 2);

        let mut rng = ScriptedRng::new().die(2);
        let report =
            resolve_event(&catalog, &config, &mut state, event(&catalog, "ice_age"), &mut rng);

        let outcome = report.outcome_for(P0).unwrap();
        let fates: Vec<_> = outcome.tiles.iter().map(|t| (t.fate, t.lost)).collect();
        assert_eq!(
            fates,
            vec![(TileFate::Doomed, 2), (TileFate::Saved, 0), (TileFate::Neutral, 1)]
        );
        assert_eq!(outcome.roll, Some(2));
        assert_eq!(outcome.total_lost, 3);
        assert_eq!(outcome.status, SurvivalStatus::Doomed);

        let player = state.player(P0).unwrap();
        assert_eq!(player.markers_on_board, 2);
        assert_eq!(player.extinctions_survived, 1);
        assert!(state.violations().is_empty());
    }

    #[test]
    fn test_safe_tag_needs_matching_trait() {
        let catalog = fixture_catalog();
        let config = EngineConfig::default();
        let mut state = two_player_state(&catalog);
        state.board = ice_age_board(&catalog);
        // Without Burrower the flats are merely neutral.
        place(&mut state, 1, P0, 2);

        let mut rng = ScriptedRng::new().die(5);
        let report =
            resolve_event(&catalog, &config, &mut state, event(&catalog, "ice_age"), &mut rng);

        let outcome = report.outcome_for(P0).unwrap();
        assert_eq!(outcome.tiles[0].fate, TileFate::Neutral);
        assert_eq!(outcome.total_lost, 0);
        assert_eq!(outcome.status, SurvivalStatus::Passed);
    }

    #[test]
    fn test_saved_beats_doomed() {
        let catalog = fixture_catalog();
        let config = EngineConfig::default();
        let mut state = two_player_state(&catalog);
        // Mangrove carries Aquatic (doomed by anoxia) and Burrower (safe).
        state.board = board_of(&catalog, ["mangrove"; 7]);
        give(&catalog, &mut state, P0, "burrowing");
        place(&mut state, 2, P0, 3);
        place(&mut state, 4, P1, 2);

        let report = resolve_event(
            &catalog,
            &config,
            &mut state,
            event(&catalog, "ocean_anoxia"),
            &mut ScriptedRng::new(),
        );

        let saved = report.outcome_for(P0).unwrap();
        assert_eq!(saved.tiles[0].fate, TileFate::Saved);
        assert_eq!(saved.status, SurvivalStatus::Saved);
        assert_eq!(saved.roll, None);
        assert_eq!(state.player(P0).unwrap().markers_on_board, 3);

        let doomed = report.outcome_for(P1).unwrap();
        assert_eq!(doomed.tiles[0].fate, TileFate::Doomed);
        assert_eq!(doomed.total_lost, 1);
        assert!(doomed.restored_on.is_some());
    }

    #[test]
    fn test_neutral_losses_round_up_and_go_in_tile_order() {
        let catalog = fixture_catalog();
        let config = EngineConfig::default();
        let mut state = two_player_state(&catalog);
        place(&mut state, 2, P1, 1);
        place(&mut state, 4, P1, 2);

        let mut rng = ScriptedRng::new().die(3);
        let winter = event(&catalog, "volcanic_winter");
        let report = resolve_event(&catalog, &config, &mut state, winter, &mut rng);

        let outcome = report.outcome_for(P1).unwrap();
        assert_eq!(outcome.status, SurvivalStatus::FailedRoll);
        assert_eq!(outcome.total_lost, 2);
        assert_eq!(outcome.tiles[0].lost, 1);
        assert_eq!(outcome.tiles[1].lost, 1);
        assert_eq!(state.board.markers.count(TileId(4), P1), 1);
    }

    #[test]
    fn test_floor_guard_restores_one_marker() {
        let catalog = fixture_catalog();
        let config = EngineConfig::default();
        let mut state = two_player_state(&catalog);
        state.board = ice_age_board(&catalog);
        place(&mut state, 0, P0, 1);
        place(&mut state, 1, P1, 1);

        let mut rng = ScriptedRng::new().die(6);
        let report =
            resolve_event(&catalog, &config, &mut state, event(&catalog, "ice_age"), &mut rng);

        let outcome = report.outcome_for(P0).unwrap();
        assert_eq!(outcome.status, SurvivalStatus::Doomed);
        assert_eq!(outcome.total_lost, 0);
        assert_eq!(outcome.tiles[0].lost, 0);
        // Tile 0 itself is vacant again and habitable, so it is first.
        assert_eq!(outcome.restored_on, Some(TileId(0)));
        assert_eq!(state.player(P0).unwrap().markers_on_board, 1);
        assert!(state.violations().is_empty());
    }

    #[test]
    fn test_floor_guard_skips_uninhabitable_tiles() {
        let catalog = fixture_catalog();
        let config = EngineConfig::default();
        let mut state = two_player_state(&catalog);
        state.board = board_of(
            &catalog,
            ["forest", "forest", "forest", "shallow_sea", "tidal_flats", "forest", "forest"],
        );
        place(&mut state, 3, P0, 2);

        // The forests need Terrestrial, so the first habitable vacant tile is
        // the emptied shallow sea.
        let report = resolve_event(
            &catalog,
            &config,
            &mut state,
            event(&catalog, "ice_age"),
            &mut ScriptedRng::new(),
        );

        let outcome = report.outcome_for(P0).unwrap();
        assert_eq!(outcome.total_lost, 1);
        assert_eq!(outcome.tiles[0].lost, 1);
        assert_eq!(outcome.restored_on, Some(TileId(3)));
        assert_eq!(state.player(P0).unwrap().markers_on_board, 1);
        assert!(state.violations().is_empty());
    }

    #[test]
    fn test_players_without_markers_still_survive() {
        let catalog = fixture_catalog();
        let config = EngineConfig::default();
        let mut state = two_player_state(&catalog);

        let report = resolve_event(
            &catalog,
            &config,
            &mut state,
            event(&catalog, "asteroid"),
            &mut ScriptedRng::new(),
        );

        assert_eq!(report.outcomes.len(), 2);
        assert_eq!(report.outcome_for(P1).unwrap().status, SurvivalStatus::Passed);
        assert_eq!(state.player(P1).unwrap().extinctions_survived, 1);
    }

    #[test]
    fn test_flavor_event() {
        let catalog = fixture_catalog();
        let config = EngineConfig::default();
        let mut state = two_player_state(&catalog);
        place(&mut state, 0, P0, 2);

        let report = resolve_event(
            &catalog,
            &config,
            &mut state,
            event(&catalog, "quiet_epoch"),
            &mut ScriptedRng::new(),
        );

        assert!(report.outcomes.is_empty());
        assert_eq!(state.player(P0).unwrap().markers_on_board, 2);
        assert_eq!(state.player(P0).unwrap().extinctions_survived, 0);
    }

    #[test]
    fn test_solo_event_includes_rivals() {
        let catalog = fixture_catalog();
        let config = EngineConfig::default();
        let mut state = solo_state(&catalog);
        state.board = ice_age_board(&catalog);
        state.board.rivals.add(TileId(0), 2);
        place(&mut state, 3, P0, 1);

        let report = resolve_event(
            &catalog,
            &config,
            &mut state,
            event(&catalog, "ice_age"),
            &mut ScriptedRng::new().die(6),
        );

        let rivals = report.rivals.unwrap();
        assert_eq!(rivals.total_lost, 2);
        assert_eq!(state.rival_total, 0);
        assert!(state.violations().is_empty());
    }
}
