//! The game engine: phase machine, turn order and intent dispatch.
//!
//! `Engine` holds only immutable rule data (the catalog and the rule
//! constants). All game data lives in the [`GameState`] passed in by the
//! caller, and all randomness comes from the [`RandomSource`] passed in with
//! it, so one engine can drive any number of games.
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use primeval::catalog::Catalog;
//! use primeval::core::{EngineConfig, GameMode, GameRng, Intent};
//! use primeval::rules::{Engine, Phase};
//!
//! let json = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/data/catalog.json"));
//! let catalog = Catalog::from_json(json).unwrap();
//! let engine = Engine::new(Arc::new(catalog), EngineConfig::default()).unwrap();
//! let mut rng = GameRng::new(7);
//!
//! let mut state = engine.new_game(GameMode::Local, &["Ada", "Bo"], &mut rng).unwrap();
//! assert_eq!(state.phase, Phase::AlleleRoll);
//!
//! let first = state.acting_player().unwrap();
//! engine.apply_intent(&mut state, first, &Intent::RollReproduction { die: 4 }, &mut rng).unwrap();
//! engine.apply_intent(&mut state, first, &Intent::EndTurn, &mut rng).unwrap();
//! assert_ne!(state.acting_player(), Some(first));
//! ```

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::board::{hex, Board, Tile, TileId};
use crate::catalog::{BiomeId, Catalog, EventId};
use crate::core::rng::{choose, shuffle};
use crate::core::{
    ActionError, ActionRecord, ConfigError, EngineConfig, GameMode, GameState, Intent, Player,
    PlayerId, RandomSource, SetupError, MAX_PLAYERS,
};
use crate::resolution::{
    self, AcquisitionReport, CompetitionReport, DrawReport, EventReport, PlacementReport,
    ReproductionReport, SpawnReport, SpreadReport, TurnoverReport,
};
use crate::scoring;

use super::phase::Phase;

/// Result of a completed game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameResult {
    /// Highest score in a multiplayer game.
    Winner(PlayerId),
    /// The solo player reached the last era with markers on the board.
    Survived,
    /// The solo player lost every marker.
    Extinct,
}

impl GameResult {
    /// Check if a player won.
    #[must_use]
    pub fn is_winner(&self, player: PlayerId) -> bool {
        match self {
            GameResult::Winner(p) => *p == player,
            GameResult::Survived => player == PlayerId(0),
            GameResult::Extinct => false,
        }
    }
}

/// What an applied intent or resolution step did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    Reproduced(ReproductionReport),
    Acquired(AcquisitionReport),
    Placed(PlacementReport),
    /// A player finished their sub-turn. `next` is the new acting player.
    TurnEnded {
        player: PlayerId,
        next: Option<PlayerId>,
        phase: Phase,
    },
    Drew {
        draw: DrawReport,
        spawn: Option<SpawnReport>,
    },
    Competed {
        competition: CompetitionReport,
        spread: Option<SpreadReport>,
    },
    Turnover(TurnoverReport),
    Event(Box<EventReport>),
    /// The event step ran with no event revealed.
    NoEvent,
}

impl Outcome {
    /// The event payload, if this outcome resolved an event.
    #[must_use]
    pub fn event_report(&self) -> Option<&EventReport> {
        match self {
            Outcome::Event(report) => Some(report),
            _ => None,
        }
    }
}

/// Rules engine over a shared, immutable catalog.
#[derive(Clone, Debug)]
pub struct Engine {
    catalog: Arc<Catalog>,
    config: EngineConfig,
}

impl Engine {
    /// Create an engine, validating the rule constants.
    pub fn new(catalog: Arc<Catalog>, config: EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { catalog, config })
    }

    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    // === Setup ===

    /// Set up a new game for the named players.
    ///
    /// Builds the board, shuffles the turn order and the event deck, gives
    /// every player one starting marker on its own tile and deals hands.
    pub fn new_game<S: AsRef<str>>(
        &self,
        mode: GameMode,
        names: &[S],
        rng: &mut dyn RandomSource,
    ) -> Result<GameState, SetupError> {
        let count = names.len();
        if mode == GameMode::Solo && count != 1 {
            return Err(SetupError::SoloPlayerCount(count));
        }
        if count == 0 || count > MAX_PLAYERS {
            return Err(SetupError::PlayerCount(count));
        }

        let board = self.generate_board(rng)?;
        let players = names
            .iter()
            .enumerate()
            .map(|(i, name)| {
                let seat = u8::try_from(i).unwrap_or(u8::MAX);
                Player::new(PlayerId(seat), name.as_ref(), seat, self.config.starting_markers)
            })
            .collect();
        let mut state = GameState::new(mode, board, players);
        shuffle(rng, &mut state.turn_order);
        state.event_deck = self.build_event_deck(rng).into_iter().collect();

        let mut starts: Vec<TileId> = state
            .board
            .tiles
            .iter()
            .filter(|t| {
                self.catalog
                    .biome(t.biome)
                    .is_some_and(|b| b.required_tags.is_empty())
            })
            .map(|t| t.id)
            .collect();
        if starts.len() < count {
            return Err(SetupError::NoStartingTiles {
                needed: count,
                available: starts.len(),
            });
        }
        shuffle(rng, &mut starts);
        for (&player, &tile) in state.turn_order.iter().zip(&starts) {
            state.board.markers.add(tile, player, 1);
        }
        state.sync_counts();
        resolution::refill_hands(&self.catalog, &self.config, &mut state, rng);

        tracing::info!(
            ?mode,
            players = count,
            tiles = state.board.len(),
            "new game"
        );
        Ok(state)
    }

    fn generate_board(&self, rng: &mut dyn RandomSource) -> Result<Board, SetupError> {
        let radius = self.config.board_radius;
        let mut tiles = Vec::new();
        for coord in hex::hexagon(radius) {
            let climate = hex::climate_band(coord, radius);
            let options: Vec<BiomeId> = self.catalog.biomes_for(climate).map(|b| b.id).collect();
            let &biome = choose(rng, &options).ok_or(SetupError::NoBiomeForClimate(climate))?;
            tiles.push(Tile {
                id: TileId(0),
                coord,
                biome,
                climate,
                flip_threshold: rng.roll_d6(),
                era_lock: 0,
            });
        }
        Ok(Board::new(tiles))
    }

    fn build_event_deck(&self, rng: &mut dyn RandomSource) -> Vec<EventId> {
        let pool: Vec<EventId> = self.catalog.events().map(|e| e.id).collect();
        let size = self.config.event_deck_size;
        let mut deck = Vec::with_capacity(size);
        while !pool.is_empty() && deck.len() < size {
            let mut round = pool.clone();
            shuffle(rng, &mut round);
            deck.extend(round.into_iter().take(size - deck.len()));
        }
        deck
    }

    // === Intents ===

    /// Apply `intent` on behalf of `player`.
    ///
    /// The player must be the acting player. Resolution steps are driven by
    /// whoever is first in turn order. On success the intent is appended to
    /// the state's history; on failure the state is unchanged.
    pub fn apply_intent(
        &self,
        state: &mut GameState,
        player: PlayerId,
        intent: &Intent,
        rng: &mut dyn RandomSource,
    ) -> Result<Outcome, ActionError> {
        if state.is_over() {
            return Err(ActionError::GameOver);
        }
        let has_rolled = state
            .player(player)
            .ok_or(ActionError::UnknownPlayer(player))?
            .has_rolled;
        if let Some(acting) = state.acting_player() {
            if acting != player {
                return Err(ActionError::NotYourTurn { acting });
            }
        }
        let (era, phase) = (state.era, state.phase);

        let outcome = match *intent {
            Intent::RollReproduction { die } => {
                expect_phase(phase, Phase::AlleleRoll)?;
                if has_rolled {
                    return Err(ActionError::AlreadyRolled);
                }
                Outcome::Reproduced(resolution::reproduce(
                    &self.catalog,
                    &self.config,
                    state,
                    player,
                    die,
                )?)
            }
            Intent::BuyTrait { trait_id } => {
                expect_phase(phase, Phase::Evolution)?;
                Outcome::Acquired(resolution::acquire_trait(
                    &self.catalog,
                    &self.config,
                    state,
                    player,
                    trait_id,
                    rng,
                )?)
            }
            Intent::PlaceMarker { tile } => {
                expect_phase(phase, Phase::Populate)?;
                Outcome::Placed(resolution::place_marker(&self.catalog, state, player, tile)?)
            }
            Intent::EndTurn => self.end_turn(state, player)?,
            Intent::EndPhase => self.end_phase(state, rng)?,
        };

        let sequence = state.next_sequence();
        state.record(ActionRecord {
            player,
            intent: intent.clone(),
            era,
            phase,
            sequence,
        });
        tracing::debug!(%player, intent = intent.label(), sequence, "intent applied");
        Ok(outcome)
    }

    /// Finish the acting player's sub-turn.
    ///
    /// When the last player in turn order finishes, the phase advances.
    pub fn end_turn(
        &self,
        state: &mut GameState,
        player: PlayerId,
    ) -> Result<Outcome, ActionError> {
        if state.is_over() {
            return Err(ActionError::GameOver);
        }
        if !state.phase.is_per_player() {
            return Err(ActionError::NoSubTurns(state.phase));
        }
        match state.acting_player() {
            Some(acting) if acting != player => return Err(ActionError::NotYourTurn { acting }),
            None => return Err(ActionError::UnknownPlayer(player)),
            Some(_) => {}
        }

        state.acting_index += 1;
        if state.acting_index >= state.turn_order.len() {
            self.advance_phase(state);
        }
        Ok(Outcome::TurnEnded {
            player,
            next: state.acting_player(),
            phase: state.phase,
        })
    }

    /// Run the current resolution step, then advance the phase.
    pub fn end_phase(
        &self,
        state: &mut GameState,
        rng: &mut dyn RandomSource,
    ) -> Result<Outcome, ActionError> {
        if state.is_over() {
            return Err(ActionError::GameOver);
        }
        let phase = state.phase;
        let outcome = match phase {
            Phase::AlleleRoll | Phase::Evolution | Phase::Populate => {
                return Err(ActionError::NotResolutionPhase(phase));
            }
            Phase::Draw => {
                let (event, reshuffled) = resolution::reveal_event(state, rng);
                let dealt = resolution::refill_hands(&self.catalog, &self.config, state, rng);
                let spawn = state
                    .is_solo()
                    .then(|| resolution::spawn_rivals(&self.config, state, rng));
                Outcome::Drew {
                    draw: DrawReport {
                        event,
                        reshuffled,
                        dealt,
                    },
                    spawn,
                }
            }
            Phase::Competition => {
                let competition =
                    resolution::resolve_competition(&self.catalog, &self.config, state, rng);
                let spread = state
                    .is_solo()
                    .then(|| resolution::spread_rivals(&self.config, state, rng));
                Outcome::Competed {
                    competition,
                    spread,
                }
            }
            Phase::TileFlip => Outcome::Turnover(resolution::resolve_turnover(
                &self.catalog,
                &self.config,
                state,
                rng,
            )),
            Phase::Event => match state.current_event.and_then(|id| self.catalog.event(id)) {
                Some(event) => Outcome::Event(Box::new(resolution::resolve_event(
                    &self.catalog,
                    &self.config,
                    state,
                    event,
                    rng,
                ))),
                None => {
                    tracing::warn!(era = state.era, "event step with no event revealed");
                    Outcome::NoEvent
                }
            },
        };

        self.check_extinct(state);
        self.advance_phase(state);
        Ok(outcome)
    }

    /// Move to the next phase.
    ///
    /// Leaving the event phase starts a new era: the era counter goes up,
    /// marker caps grow and every player may roll again.
    pub fn advance_phase(&self, state: &mut GameState) {
        if state.phase.ends_era() {
            state.era += 1;
            state.phase = Phase::AlleleRoll;
            if !state.is_over() {
                for player in &mut state.players {
                    player.markers = (player.markers + self.config.markers_per_era)
                        .min(self.config.max_markers);
                    player.has_rolled = false;
                }
            }
            tracing::info!(era = state.era, "era advanced");
        } else {
            state.phase = state.phase.next();
        }
        state.acting_index = 0;
        tracing::debug!(phase = %state.phase, era = state.era, "phase advanced");
    }

    fn check_extinct(&self, state: &mut GameState) {
        if state.is_solo() && !state.extinct {
            let gone = state.players.first().is_some_and(|p| p.markers_on_board == 0);
            if gone {
                state.extinct = true;
                tracing::info!(era = state.era, "solo population extinct");
            }
        }
    }

    /// `Some(result)` once the game has ended.
    #[must_use]
    pub fn is_terminal(&self, state: &GameState) -> Option<GameResult> {
        if !state.is_over() {
            return None;
        }
        if state.is_solo() {
            return Some(if state.extinct {
                GameResult::Extinct
            } else {
                GameResult::Survived
            });
        }
        let scores = scoring::final_scores(&self.catalog, &self.config, state);
        scoring::leader(state, &scores).map(GameResult::Winner)
    }

    /// Every intent `player` could apply right now.
    ///
    /// Reproduction is listed once per die face. Empty when it is not the
    /// player's turn or the game is over.
    #[must_use]
    pub fn legal_intents(&self, state: &GameState, player: PlayerId) -> Vec<Intent> {
        if state.is_over() || state.acting_player() != Some(player) {
            return Vec::new();
        }
        let Some(record) = state.player(player) else {
            return Vec::new();
        };
        let mut intents = Vec::new();
        match state.phase {
            Phase::AlleleRoll => {
                if !record.has_rolled {
                    intents.extend((1..=6).map(|die| Intent::RollReproduction { die }));
                }
                intents.push(Intent::EndTurn);
            }
            Phase::Evolution => {
                for def in self.catalog.traits() {
                    let eligible =
                        resolution::check_eligible(&self.catalog, state.era, record, def).is_ok();
                    let affordable = resolution::quote(&self.catalog, &self.config, record, def)
                        .cost
                        <= record.alleles;
                    let placeable = !def.grants_specialization || record.markers_on_board > 0;
                    if eligible && affordable && placeable {
                        intents.push(Intent::BuyTrait { trait_id: def.id });
                    }
                }
                intents.push(Intent::EndTurn);
            }
            Phase::Populate => {
                intents.extend(
                    resolution::legal_placements(&self.catalog, state, player)
                        .into_iter()
                        .map(|tile| Intent::PlaceMarker { tile }),
                );
                intents.push(Intent::EndTurn);
            }
            Phase::Draw | Phase::Competition | Phase::TileFlip | Phase::Event => {
                intents.push(Intent::EndPhase);
            }
        }
        intents
    }
}

fn expect_phase(actual: Phase, expected: Phase) -> Result<(), ActionError> {
    if actual == expected {
        Ok(())
    } else {
        Err(ActionError::WrongPhase { expected, actual })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{GameRng, ScriptedRng};
    use crate::testing::{fixture_catalog, place, solo_state, two_player_state};

    fn engine() -> Engine {
        Engine::new(Arc::new(fixture_catalog()), EngineConfig::default()).unwrap()
    }

    #[test]
    fn test_game_result_is_winner() {
        let result = GameResult::Winner(PlayerId::new(1));
        assert!(!result.is_winner(PlayerId::new(0)));
        assert!(result.is_winner(PlayerId::new(1)));

        assert!(GameResult::Survived.is_winner(PlayerId::new(0)));
        assert!(!GameResult::Extinct.is_winner(PlayerId::new(0)));
    }

    #[test]
    fn test_new_game_setup() {
        let engine = engine();
        let state = engine
            .new_game(GameMode::Local, &["Ada", "Bo", "Cy"], &mut GameRng::new(11))
            .unwrap();

        assert_eq!(state.board.len(), 37);
        assert_eq!(state.players.len(), 3);
        assert_eq!(state.event_deck.len(), 12);
        assert_eq!(state.era, 0);
        assert_eq!(state.phase, Phase::AlleleRoll);

        let mut order = state.turn_order.clone();
        order.sort_unstable();
        assert_eq!(order, vec![PlayerId(0), PlayerId(1), PlayerId(2)]);

        let occupied = state.board.markers.occupied_tiles();
        assert_eq!(occupied.len(), 3);
        for player in &state.players {
            assert_eq!(player.markers_on_board, 1);
            assert_eq!(player.markers, 6);
            assert_eq!(player.hand.len(), 3);
            let placements = resolution::legal_placements(engine.catalog(), &state, player.id);
            assert!(!placements.is_empty(), "{} has nowhere to place", player.name);
        }
        for tile in &state.board.tiles {
            assert!((1..=6).contains(&tile.flip_threshold));
            assert!(engine.catalog().biome(tile.biome).unwrap().suits(tile.climate));
        }
        assert!(state.violations().is_empty());
    }

    #[test]
    fn test_new_game_is_deterministic() {
        let engine = engine();
        let a = engine.new_game(GameMode::Local, &["Ada", "Bo"], &mut GameRng::new(5)).unwrap();
        let b = engine.new_game(GameMode::Local, &["Ada", "Bo"], &mut GameRng::new(5)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_player_count_checks() {
        let engine = engine();
        let mut rng = GameRng::new(1);

        let none: [&str; 0] = [];
        assert_eq!(
            engine.new_game(GameMode::Local, &none, &mut rng).unwrap_err(),
            SetupError::PlayerCount(0)
        );
        assert_eq!(
            engine.new_game(GameMode::Local, &["a", "b", "c", "d", "e"], &mut rng).unwrap_err(),
            SetupError::PlayerCount(5)
        );
        assert_eq!(
            engine.new_game(GameMode::Solo, &["a", "b"], &mut rng).unwrap_err(),
            SetupError::SoloPlayerCount(2)
        );
    }

    #[test]
    fn test_turns_wrap_into_next_phase() {
        let engine = engine();
        let mut state = two_player_state(engine.catalog());
        let mut rng = ScriptedRng::new();

        let first = engine
            .apply_intent(&mut state, PlayerId(0), &Intent::EndTurn, &mut rng)
            .unwrap();
        assert_eq!(
            first,
            Outcome::TurnEnded {
                player: PlayerId(0),
                next: Some(PlayerId(1)),
                phase: Phase::AlleleRoll,
            }
        );

        engine.apply_intent(&mut state, PlayerId(1), &Intent::EndTurn, &mut rng).unwrap();
        assert_eq!(state.phase, Phase::Draw);
        assert_eq!(state.acting_index, 0);
        assert_eq!(state.history.len(), 2);
    }

    #[test]
    fn test_out_of_turn_and_wrong_phase() {
        let engine = engine();
        let mut state = two_player_state(engine.catalog());
        let mut rng = ScriptedRng::new();

        let err = engine
            .apply_intent(&mut state, PlayerId(1), &Intent::RollReproduction { die: 3 }, &mut rng)
            .unwrap_err();
        assert_eq!(err, ActionError::NotYourTurn { acting: PlayerId(0) });

        let place = Intent::PlaceMarker { tile: TileId(0) };
        let err = engine
            .apply_intent(&mut state, PlayerId(0), &place, &mut rng)
            .unwrap_err();
        assert_eq!(
            err,
            ActionError::WrongPhase {
                expected: Phase::Populate,
                actual: Phase::AlleleRoll,
            }
        );

        let err = engine
            .apply_intent(&mut state, PlayerId(0), &Intent::EndPhase, &mut rng)
            .unwrap_err();
        assert_eq!(err, ActionError::NotResolutionPhase(Phase::AlleleRoll));

        assert!(state.history.is_empty());
    }

    #[test]
    fn test_roll_once_per_era() {
        let engine = engine();
        let mut state = two_player_state(engine.catalog());
        let mut rng = ScriptedRng::new();
        let roll = Intent::RollReproduction { die: 5 };

        engine.apply_intent(&mut state, PlayerId(0), &roll, &mut rng).unwrap();
        let err = engine.apply_intent(&mut state, PlayerId(0), &roll, &mut rng).unwrap_err();

        assert_eq!(err, ActionError::AlreadyRolled);
        assert_eq!(state.player(PlayerId(0)).unwrap().alleles, 5);
    }

    #[test]
    fn test_end_turn_in_resolution_phase() {
        let engine = engine();
        let mut state = two_player_state(engine.catalog());
        state.phase = Phase::Competition;

        let err = engine
            .apply_intent(&mut state, PlayerId(0), &Intent::EndTurn, &mut ScriptedRng::new())
            .unwrap_err();
        assert_eq!(err, ActionError::NoSubTurns(Phase::Competition));
    }

    #[test]
    fn test_full_era_cycle() {
        let engine = engine();
        let mut state = two_player_state(engine.catalog());
        let quiet = engine.catalog().event_id("quiet_epoch").unwrap();
        state.event_deck = im::vector![quiet];
        place(&mut state, 0, PlayerId(0), 1);
        place(&mut state, 6, PlayerId(1), 1);
        let mut rng = GameRng::new(3);

        for expected in Phase::ALL {
            assert_eq!(state.phase, expected);
            let acting = state.acting_player().unwrap();
            if expected.is_per_player() {
                engine.end_turn(&mut state, acting).unwrap();
                engine.end_turn(&mut state, PlayerId(1)).unwrap();
            } else {
                let outcome = engine.end_phase(&mut state, &mut rng).unwrap();
                if expected == Phase::Event {
                    assert_eq!(outcome.event_report().unwrap().event, quiet);
                }
            }
        }

        assert_eq!(state.era, 1);
        assert_eq!(state.phase, Phase::AlleleRoll);
        assert!(state.players.iter().all(|p| p.markers == 7 && !p.has_rolled));
        assert_eq!(state.current_event, Some(quiet));
    }

    #[test]
    fn test_marker_cap_stops_at_max() {
        let engine = engine();
        let mut state = two_player_state(engine.catalog());
        state.phase = Phase::Event;
        state.players[0].markers = 12;

        engine.advance_phase(&mut state);

        assert_eq!(state.players[0].markers, 12);
        assert_eq!(state.players[1].markers, 7);
    }

    #[test]
    fn test_game_ends_after_era_twelve() {
        let engine = engine();
        let mut state = two_player_state(engine.catalog());
        state.era = 11;
        state.phase = Phase::Event;
        place(&mut state, 0, PlayerId(0), 3);
        place(&mut state, 6, PlayerId(1), 1);
        state.players[0].tiles_controlled = 1;

        let outcome = engine.end_phase(&mut state, &mut ScriptedRng::new()).unwrap();

        assert_eq!(outcome, Outcome::NoEvent);
        assert_eq!(state.era, 12);
        assert!(state.is_over());
        assert_eq!(engine.is_terminal(&state), Some(GameResult::Winner(PlayerId(0))));
        let err = engine
            .apply_intent(&mut state, PlayerId(0), &Intent::EndTurn, &mut ScriptedRng::new())
            .unwrap_err();
        assert_eq!(err, ActionError::GameOver);
        assert!(engine.legal_intents(&state, PlayerId(0)).is_empty());
    }

    #[test]
    fn test_solo_extinction_is_terminal() {
        let engine = engine();
        let mut state = solo_state(engine.catalog());
        state.phase = Phase::Competition;
        state.era = 4;
        place(&mut state, 3, PlayerId(0), 1);
        state.board.rivals.add(TileId(3), 4);
        state.sync_counts();

        // Player rolls 1 (strength 2), rivals roll 6 (strength 4 + 1 + 6 = 11).
        let mut rng = ScriptedRng::new().dice(&[1, 6]).chance(false);
        engine.end_phase(&mut state, &mut rng).unwrap();

        assert!(state.extinct);
        assert_eq!(engine.is_terminal(&state), Some(GameResult::Extinct));
    }

    #[test]
    fn test_legal_intents_by_phase() {
        let engine = engine();
        let mut state = two_player_state(engine.catalog());
        place(&mut state, 3, PlayerId(0), 1);

        let rolls = engine.legal_intents(&state, PlayerId(0));
        assert_eq!(rolls.len(), 7);
        assert!(engine.legal_intents(&state, PlayerId(1)).is_empty());

        state.phase = Phase::Populate;
        let places = engine.legal_intents(&state, PlayerId(0));
        assert_eq!(places.len(), 8);

        state.phase = Phase::Evolution;
        state.players[0].alleles = 2;
        let buys = engine.legal_intents(&state, PlayerId(0));
        // Gills, spores, shell, niche specialist, burrowing, then end turn.
        assert_eq!(buys.len(), 6);

        state.phase = Phase::TileFlip;
        assert_eq!(engine.legal_intents(&state, PlayerId(0)), vec![Intent::EndPhase]);
    }
}
