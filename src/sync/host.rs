//! The host role: sole owner and mutator of the canonical game state.
//!
//! The host is sans-IO. Callers feed it connection events and received
//! frames; it answers by queueing messages, which [`Host::flush`] encodes and
//! hands to a [`Transport`]. Every state change queues a full snapshot to
//! every connection.
//!
//! Actions from a connection that does not hold the acting player's slot are
//! dropped with a warning and no reply. Every other rejection is answered
//! with an `error` message to the sender only.

use std::collections::VecDeque;

use chrono::Utc;

use super::protocol::{self, ChatMessage, ClientMessage, HostMessage, ProtocolError};
use super::room::RoomCode;
use super::slots::SlotTable;
use super::transport::{ConnectionId, Transport};
use crate::core::{GameMode, GameRng, GameState, Intent, SessionConfig, SetupError};
use crate::rules::{Engine, Outcome};

/// Where a queued message goes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Recipient {
    One(ConnectionId),
    All,
}

/// The authoritative side of a session.
pub struct Host {
    room: RoomCode,
    engine: Engine,
    session: SessionConfig,
    rng: GameRng,
    slots: SlotTable,
    state: Option<GameState>,
    connections: Vec<ConnectionId>,
    chat: VecDeque<ChatMessage>,
    outbox: Vec<(Recipient, HostMessage)>,
}

impl Host {
    #[must_use]
    pub fn new(room: RoomCode, engine: Engine, session: SessionConfig, rng: GameRng) -> Self {
        let slots = SlotTable::new(session.slot_count);
        Self {
            room,
            engine,
            session,
            rng,
            slots,
            state: None,
            connections: Vec::new(),
            chat: VecDeque::new(),
            outbox: Vec::new(),
        }
    }

    #[must_use]
    pub fn room(&self) -> &RoomCode {
        &self.room
    }

    #[must_use]
    pub fn state(&self) -> Option<&GameState> {
        self.state.as_ref()
    }

    #[must_use]
    pub fn slots(&self) -> &SlotTable {
        &self.slots
    }

    pub fn chat(&self) -> impl Iterator<Item = &ChatMessage> {
        self.chat.iter()
    }

    /// Messages waiting to be flushed.
    #[must_use]
    pub fn pending(&self) -> &[(Recipient, HostMessage)] {
        &self.outbox
    }

    /// Take the queued messages without sending them.
    pub fn take_outbox(&mut self) -> Vec<(Recipient, HostMessage)> {
        std::mem::take(&mut self.outbox)
    }

    // === Connection lifecycle ===

    /// A new connection arrived; greet it.
    pub fn connect(&mut self, connection: ConnectionId) {
        if !self.connections.contains(&connection) {
            self.connections.push(connection);
        }
        tracing::info!(room = %self.room, %connection, "connection opened");

        let skip = self.chat.len().saturating_sub(self.session.welcome_chat);
        let welcome = HostMessage::Welcome {
            room: self.room.clone(),
            connection,
            slots: self.slots.slots().to_vec(),
            state: self.state.clone().map(Box::new),
            chat: self.chat.iter().skip(skip).cloned().collect(),
        };
        self.send(Recipient::One(connection), welcome);
    }

    /// A connection went away. Its slot keeps the name for a later reclaim.
    pub fn disconnect(&mut self, connection: ConnectionId) {
        self.connections.retain(|&c| c != connection);
        tracing::info!(room = %self.room, %connection, "connection closed");
        if let Some(index) = self.slots.disconnect(connection) {
            tracing::debug!(slot = index, "slot disconnected");
            self.broadcast_slots();
        }
    }

    // === Inbound ===

    /// Handle one raw frame from `connection`.
    pub fn receive(&mut self, connection: ConnectionId, frame: &str) {
        match protocol::decode::<ClientMessage>(frame) {
            Ok(message) => self.handle(connection, message),
            Err(err) => {
                tracing::debug!(%connection, error = %err, "malformed frame");
                self.reply_error(connection, &err);
            }
        }
    }

    /// Handle one decoded message from `connection`.
    pub fn handle(&mut self, connection: ConnectionId, message: ClientMessage) {
        match message {
            ClientMessage::SlotClaim { slot, name } => self.claim(connection, slot, &name),
            ClientMessage::Action(intent) => self.act(connection, &intent),
            ClientMessage::Chat { text } => self.post_chat(connection, text),
        }
    }

    fn claim(&mut self, connection: ConnectionId, index: usize, name: &str) {
        match self.slots.claim(index, connection, name) {
            Ok(()) => {
                tracing::info!(%connection, slot = index, name, "slot claimed");
                self.broadcast_slots();
            }
            Err(err) => self.reply_error(connection, &err),
        }
    }

    fn act(&mut self, connection: ConnectionId, intent: &Intent) {
        let Some(state) = self.state.as_mut() else {
            self.reply_error(connection, &ProtocolError::NotStarted);
            return;
        };
        let player = self.slots.slot_of(connection).and_then(|s| s.player);
        let acting = state.acting_player();
        let Some(player) = player.filter(|&p| Some(p) == acting) else {
            tracing::warn!(
                %connection,
                intent = intent.label(),
                "dropped action from a connection not holding the acting slot"
            );
            return;
        };

        match self.engine.apply_intent(state, player, intent, &mut self.rng) {
            Ok(outcome) => {
                if let Outcome::Event(report) = outcome {
                    self.send(Recipient::All, HostMessage::ShowEvent(report));
                }
                self.broadcast_state();
            }
            Err(err) => {
                tracing::debug!(%connection, %player, error = %err, "action rejected");
                self.send(
                    Recipient::One(connection),
                    HostMessage::Error {
                        message: err.to_string(),
                    },
                );
            }
        }
    }

    fn post_chat(&mut self, connection: ConnectionId, text: String) {
        let max = self.session.max_chat_len;
        if text.chars().count() > max {
            self.reply_error(connection, &ProtocolError::ChatTooLong { max });
            return;
        }
        let sender = self
            .slots
            .slot_of(connection)
            .and_then(|s| s.name.clone())
            .unwrap_or_else(|| format!("guest {}", connection.0));
        let message = ChatMessage {
            sender,
            text,
            timestamp: Utc::now(),
        };
        self.chat.push_back(message.clone());
        while self.chat.len() > self.session.chat_history {
            self.chat.pop_front();
        }
        self.send(Recipient::All, HostMessage::Chat(message));
    }

    // === Game lifecycle ===

    /// Start a game with the claimed slots, in slot order.
    ///
    /// Setup randomness comes from a fork of the host generator, so the
    /// in-game stream does not depend on how much setup consumed.
    pub fn start_game(&mut self, mode: GameMode) -> Result<(), SetupError> {
        let mut table = self.slots.clone();
        let names = table.bind_players();
        let mut setup_rng = self.rng.fork();
        let state = self.engine.new_game(mode, &names, &mut setup_rng)?;

        tracing::info!(room = %self.room, players = names.len(), ?mode, "game started");
        self.slots = table;
        self.state = Some(state);
        self.broadcast_slots();
        self.broadcast_state();
        Ok(())
    }

    // === Outbound ===

    /// Encode and deliver every queued message.
    ///
    /// A failing peer is logged and skipped; delivery to the others goes on.
    /// Returns the number of failed sends.
    pub fn flush(&mut self, transport: &mut dyn Transport) -> usize {
        let mut failures = 0;
        for (recipient, message) in std::mem::take(&mut self.outbox) {
            let frame = match protocol::encode(&message) {
                Ok(frame) => frame,
                Err(err) => {
                    tracing::error!(error = %err, "failed to encode host message");
                    failures += 1;
                    continue;
                }
            };
            let targets = match recipient {
                Recipient::One(connection) => vec![connection],
                Recipient::All => self.connections.clone(),
            };
            for connection in targets {
                if let Err(err) = transport.send(connection, &frame) {
                    tracing::warn!(%connection, error = %err, "send failed");
                    failures += 1;
                }
            }
        }
        failures
    }

    fn send(&mut self, recipient: Recipient, message: HostMessage) {
        self.outbox.push((recipient, message));
    }

    fn reply_error(&mut self, connection: ConnectionId, err: &ProtocolError) {
        self.send(
            Recipient::One(connection),
            HostMessage::Error {
                message: err.to_string(),
            },
        );
    }

    fn broadcast_slots(&mut self) {
        let slots = self.slots.slots().to_vec();
        self.send(Recipient::All, HostMessage::SlotUpdate { slots });
    }

    fn broadcast_state(&mut self) {
        if let Some(state) = &self.state {
            let snapshot = HostMessage::State(Box::new(state.clone()));
            self.send(Recipient::All, snapshot);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::core::EngineConfig;
    use crate::rules::Phase;
    use crate::testing::fixture_catalog;

    const A: ConnectionId = ConnectionId(1);
    const B: ConnectionId = ConnectionId(2);

    fn host() -> Host {
        let engine = Engine::new(Arc::new(fixture_catalog()), EngineConfig::default()).unwrap();
        let room = RoomCode::parse("ABC234").unwrap();
        Host::new(room, engine, SessionConfig::default(), GameRng::new(21))
    }

    fn started() -> Host {
        let mut host = host();
        host.connect(A);
        host.connect(B);
        host.handle(A, ClientMessage::SlotClaim { slot: 0, name: "Ada".into() });
        host.handle(B, ClientMessage::SlotClaim { slot: 1, name: "Bo".into() });
        host.start_game(GameMode::Networked).unwrap();
        host.take_outbox();
        host
    }

    fn acting_connection(host: &Host) -> ConnectionId {
        let acting = host.state().unwrap().acting_player();
        if host.slots().get(0).unwrap().player == acting {
            A
        } else {
            B
        }
    }

    #[test]
    fn test_welcome_on_connect() {
        let mut host = host();
        host.connect(A);

        match &host.pending()[0] {
            (Recipient::One(to), HostMessage::Welcome { connection, slots, state, .. }) => {
                assert_eq!(*to, A);
                assert_eq!(*connection, A);
                assert_eq!(slots.len(), 4);
                assert!(state.is_none());
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_taken_slot_gets_error() {
        let mut host = host();
        host.handle(A, ClientMessage::SlotClaim { slot: 0, name: "Ada".into() });
        host.take_outbox();

        host.handle(B, ClientMessage::SlotClaim { slot: 0, name: "Bo".into() });

        assert_eq!(
            host.take_outbox(),
            vec![(Recipient::One(B), HostMessage::Error { message: "slot 0 is taken".into() })]
        );
    }

    #[test]
    fn test_malformed_frame_gets_error() {
        let mut host = host();
        host.receive(A, "nope");

        let out = host.take_outbox();
        assert_eq!(out.len(), 1);
        assert!(matches!(&out[0], (Recipient::One(A), HostMessage::Error { .. })));
    }

    #[test]
    fn test_action_before_start() {
        let mut host = host();
        host.handle(A, ClientMessage::Action(Intent::EndTurn));

        assert_eq!(
            host.take_outbox(),
            vec![(
                Recipient::One(A),
                HostMessage::Error { message: "the game has not started".into() }
            )]
        );
    }

    #[test]
    fn test_start_binds_slots_and_broadcasts() {
        let mut host = host();
        host.handle(A, ClientMessage::SlotClaim { slot: 2, name: "Ada".into() });
        host.take_outbox();

        host.start_game(GameMode::Solo).unwrap();

        assert_eq!(host.slots().get(2).unwrap().player, Some(crate::core::PlayerId(0)));
        let out = host.take_outbox();
        assert!(matches!(out[0].1, HostMessage::SlotUpdate { .. }));
        assert!(matches!(out[1].1, HostMessage::State(_)));
    }

    #[test]
    fn test_out_of_turn_action_is_silent() {
        let mut host = started();
        let waiting = if acting_connection(&host) == A { B } else { A };
        let before = host.state().unwrap().clone();

        host.handle(waiting, ClientMessage::Action(Intent::RollReproduction { die: 6 }));

        assert!(host.pending().is_empty());
        assert_eq!(host.state().unwrap(), &before);
    }

    #[test]
    fn test_acting_player_roll_applies_die_verbatim() {
        let mut host = started();
        let conn = acting_connection(&host);
        let player = host.state().unwrap().acting_player().unwrap();

        host.handle(conn, ClientMessage::Action(Intent::RollReproduction { die: 2 }));

        let state = host.state().unwrap();
        let record = state.player(player).unwrap();
        assert!(record.has_rolled);
        // One starting marker: no population or tile bonus.
        assert_eq!(record.alleles, 2);
        let out = host.take_outbox();
        assert_eq!(out.len(), 1);
        assert!(matches!(&out[0], (Recipient::All, HostMessage::State(_))));
    }

    #[test]
    fn test_engine_rejection_goes_to_sender() {
        let mut host = started();
        let conn = acting_connection(&host);

        host.handle(conn, ClientMessage::Action(Intent::EndPhase));

        let out = host.take_outbox();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].0, Recipient::One(conn));
        assert_eq!(host.state().unwrap().phase, Phase::AlleleRoll);
    }

    #[test]
    fn test_chat_is_bounded() {
        let mut host = host();
        host.session.chat_history = 2;
        host.handle(A, ClientMessage::SlotClaim { slot: 0, name: "Ada".into() });
        for text in ["one", "two", "three"] {
            host.handle(A, ClientMessage::Chat { text: text.into() });
        }

        let texts: Vec<&str> = host.chat().map(|c| c.text.as_str()).collect();
        assert_eq!(texts, vec!["two", "three"]);
        assert!(host.chat().all(|c| c.sender == "Ada"));

        host.handle(B, ClientMessage::Chat { text: "x".repeat(501) });
        let out = host.take_outbox();
        assert!(matches!(out.last(), Some((Recipient::One(B), HostMessage::Error { .. }))));
    }

    #[test]
    fn test_disconnect_broadcasts_slots() {
        let mut host = started();
        host.disconnect(A);

        let out = host.take_outbox();
        match &out[..] {
            [(Recipient::All, HostMessage::SlotUpdate { slots })] => {
                assert!(!slots[0].connected);
                assert_eq!(slots[0].name.as_deref(), Some("Ada"));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    struct Recorder {
        sent: Vec<(ConnectionId, String)>,
        broken: Option<ConnectionId>,
    }

    impl Transport for Recorder {
        fn send(
            &mut self,
            to: ConnectionId,
            frame: &str,
        ) -> Result<(), crate::sync::TransportError> {
            if Some(to) == self.broken {
                return Err(crate::sync::TransportError::Closed);
            }
            self.sent.push((to, frame.to_string()));
            Ok(())
        }
    }

    #[test]
    fn test_flush_survives_failing_peer() {
        let mut host = host();
        host.connect(A);
        host.connect(B);
        host.handle(A, ClientMessage::Chat { text: "hi".into() });
        let mut transport = Recorder { sent: Vec::new(), broken: Some(A) };

        let failures = host.flush(&mut transport);

        // A's welcome and A's chat copy fail; B gets its welcome and the chat.
        assert_eq!(failures, 2);
        assert_eq!(transport.sent.len(), 2);
        assert!(transport.sent.iter().all(|(to, _)| *to == B));
        assert!(host.pending().is_empty());
    }
}
