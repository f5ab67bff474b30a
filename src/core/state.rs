//! Game state: the single canonical value of a game.
//!
//! ## GameState
//!
//! Everything needed to continue a game:
//! - Board tiles and marker ledgers
//! - Players
//! - Era, phase and acting-player cursors
//! - Event deck and discard
//! - Solo rival counter and extinction flag
//! - Action history
//!
//! Engine operations take `&mut GameState`; only the host's copy is ever
//! mutated during networked play. Everyone else receives snapshots.
//!
//! Uses `im` persistent collections so snapshot clones are cheap.

use im::Vector;
use serde::{Deserialize, Serialize};

use super::action::ActionRecord;
use super::config::{GameMode, ERA_COUNT};
use super::player::{Player, PlayerId};
use crate::board::Board;
use crate::catalog::EventId;
use crate::rules::Phase;

/// Errors encoding or decoding a snapshot.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    /// JSON encoding failed or the text was malformed.
    #[error("json snapshot: {source}")]
    Json {
        /// The underlying serde_json error.
        #[from]
        source: serde_json::Error,
    },

    /// Binary encoding failed or the bytes were malformed.
    #[error("binary snapshot: {source}")]
    Binary {
        /// The underlying bincode error.
        #[from]
        source: bincode::Error,
    },
}

/// Complete state of one game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    pub mode: GameMode,
    pub board: Board,
    /// Players indexed by `PlayerId`.
    pub players: Vec<Player>,
    /// Current era, 0-11. Reaches 12 only when the game is over.
    pub era: u8,
    pub phase: Phase,
    /// Index into `turn_order` of the player taking a sub-turn.
    pub acting_index: usize,
    pub turn_order: Vec<PlayerId>,
    /// Undrawn events; the front is the top of the deck.
    pub event_deck: Vector<EventId>,
    pub event_discard: Vector<EventId>,
    /// Event revealed in this era's draw step.
    pub current_event: Option<EventId>,
    /// Rival markers on the board (solo only).
    pub rival_total: u32,
    /// The solo player has no markers left.
    pub extinct: bool,
    pub history: Vector<ActionRecord>,
    sequence: u32,
}

impl GameState {
    /// Create an empty state for the given players.
    ///
    /// The engine's `new_game` fills in the board, deck and starting markers.
    #[must_use]
    pub fn new(mode: GameMode, board: Board, players: Vec<Player>) -> Self {
        let turn_order = players.iter().map(|p| p.id).collect();
        Self {
            mode,
            board,
            players,
            era: 0,
            phase: Phase::AlleleRoll,
            acting_index: 0,
            turn_order,
            event_deck: Vector::new(),
            event_discard: Vector::new(),
            current_event: None,
            rival_total: 0,
            extinct: false,
            history: Vector::new(),
            sequence: 0,
        }
    }

    #[must_use]
    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    #[must_use]
    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.get(id.index())
    }

    pub fn player_mut(&mut self, id: PlayerId) -> Option<&mut Player> {
        self.players.get_mut(id.index())
    }

    #[must_use]
    pub fn is_solo(&self) -> bool {
        self.mode == GameMode::Solo
    }

    /// Player whose sub-turn it is.
    #[must_use]
    pub fn acting_player(&self) -> Option<PlayerId> {
        self.turn_order.get(self.acting_index).copied()
    }

    /// True once all eras are played or the solo player went extinct.
    #[must_use]
    pub fn is_over(&self) -> bool {
        usize::from(self.era) >= ERA_COUNT || self.extinct
    }

    /// Append an applied intent to the history.
    pub fn record(&mut self, record: ActionRecord) {
        self.history.push_back(record);
    }

    /// Next history sequence number.
    pub fn next_sequence(&mut self) -> u32 {
        let seq = self.sequence;
        self.sequence += 1;
        seq
    }

    /// Recompute `markers_on_board` and the rival counter from the ledgers.
    pub fn sync_counts(&mut self) {
        for player in &mut self.players {
            player.markers_on_board = self.board.markers.total_for(player.id);
        }
        self.rival_total = self.board.rivals.total();
    }

    /// Broken invariants, described. Empty when the state is consistent.
    #[must_use]
    pub fn violations(&self) -> Vec<String> {
        let mut problems = Vec::new();
        if !self.is_over() && usize::from(self.era) >= ERA_COUNT {
            problems.push(format!("era {} out of range", self.era));
        }
        for player in &self.players {
            let on_board = self.board.markers.total_for(player.id);
            if on_board != player.markers_on_board {
                problems.push(format!(
                    "{}: ledger holds {on_board} markers, record says {}",
                    player.id, player.markers_on_board
                ));
            }
            if player.markers_on_board > player.markers {
                problems.push(format!(
                    "{}: {} markers on board exceeds cap {}",
                    player.id, player.markers_on_board, player.markers
                ));
            }
        }
        if self.board.rivals.total() != self.rival_total {
            problems.push(format!(
                "rival counter {} disagrees with ledger {}",
                self.rival_total,
                self.board.rivals.total()
            ));
        }
        if !self.is_over() && self.acting_player().is_none() {
            problems.push(format!("acting index {} out of range", self.acting_index));
        }
        problems
    }

    // === Snapshots ===

    /// Encode as JSON (the wire format).
    pub fn to_json(&self) -> Result<String, SnapshotError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(text: &str) -> Result<Self, SnapshotError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Encode with bincode (compact checkpoints).
    pub fn to_bytes(&self) -> Result<Vec<u8>, SnapshotError> {
        Ok(bincode::serialize(self)?)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SnapshotError> {
        Ok(bincode::deserialize(bytes)?)
    }
}
