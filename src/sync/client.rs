//! The client role: sends intents, applies snapshots.
//!
//! A client never runs engine operations. It mirrors whatever the host last
//! broadcast and queues outbound messages until [`Client::flush`].

use std::collections::VecDeque;
use std::time::Duration;

use super::protocol::{self, ChatMessage, ClientMessage, HostMessage};
use super::room::RoomCode;
use super::slots::Slot;
use super::transport::{ConnectionId, Connector, SyncError, Transport};
use crate::core::{GameState, Intent, PlayerId, RandomSource, SessionConfig};
use crate::resolution::EventReport;

/// The participant side of a session.
#[derive(Clone, Debug)]
pub struct Client {
    room: RoomCode,
    connection: Option<ConnectionId>,
    slots: Vec<Slot>,
    state: Option<GameState>,
    chat: VecDeque<ChatMessage>,
    chat_history: usize,
    last_event: Option<EventReport>,
    last_error: Option<String>,
    outbox: Vec<ClientMessage>,
}

impl Client {
    #[must_use]
    pub fn new(room: RoomCode) -> Self {
        Self {
            room,
            connection: None,
            slots: Vec::new(),
            state: None,
            chat: VecDeque::new(),
            chat_history: SessionConfig::default().chat_history,
            last_event: None,
            last_error: None,
            outbox: Vec::new(),
        }
    }

    /// Open a link to the room's host.
    pub fn open<C: Connector>(
        connector: &mut C,
        room: RoomCode,
        timeout: Duration,
    ) -> Result<(Self, C::Link), SyncError> {
        let address = room.transport_address();
        match connector.open(&address, timeout) {
            Ok(link) => {
                tracing::info!(%room, %address, "connected to host");
                Ok((Self::new(room), link))
            }
            Err(err) => {
                tracing::warn!(%room, %address, error = %err, "could not reach host");
                Err(SyncError::Connection(err))
            }
        }
    }

    /// Keep at most `limit` chat messages, oldest dropped first.
    #[must_use]
    pub fn with_chat_history(mut self, limit: usize) -> Self {
        self.chat_history = limit;
        self.trim_chat();
        self
    }

    #[must_use]
    pub fn room(&self) -> &RoomCode {
        &self.room
    }

    /// Latest snapshot from the host.
    #[must_use]
    pub fn state(&self) -> Option<&GameState> {
        self.state.as_ref()
    }

    #[must_use]
    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    #[must_use]
    pub fn chat(&self) -> &VecDeque<ChatMessage> {
        &self.chat
    }

    /// Most recent event payload, for the renderer.
    #[must_use]
    pub fn last_event(&self) -> Option<&EventReport> {
        self.last_event.as_ref()
    }

    /// Most recent error the host sent us.
    #[must_use]
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// The slot this client holds, if any.
    #[must_use]
    pub fn my_slot(&self) -> Option<&Slot> {
        let me = self.connection?;
        self.slots
            .iter()
            .find(|s| s.connected && s.connection == Some(me))
    }

    #[must_use]
    pub fn my_player(&self) -> Option<PlayerId> {
        self.my_slot().and_then(|s| s.player)
    }

    /// True when this client's player is the acting player.
    #[must_use]
    pub fn is_my_turn(&self) -> bool {
        match (self.my_player(), &self.state) {
            (Some(me), Some(state)) => state.acting_player() == Some(me),
            _ => false,
        }
    }

    // === Inbound ===

    /// Apply one raw frame from the host.
    pub fn receive(&mut self, frame: &str) -> Result<(), SyncError> {
        let message = protocol::decode::<HostMessage>(frame)?;
        self.handle(message);
        Ok(())
    }

    /// Apply one decoded message from the host.
    pub fn handle(&mut self, message: HostMessage) {
        match message {
            HostMessage::Welcome {
                room,
                connection,
                slots,
                state,
                chat,
            } => {
                tracing::debug!(%room, %connection, "welcomed");
                self.room = room;
                self.connection = Some(connection);
                self.slots = slots;
                self.state = state.map(|s| *s);
                self.chat = chat.into();
                self.trim_chat();
            }
            HostMessage::SlotUpdate { slots } => self.slots = slots,
            HostMessage::State(state) => self.state = Some(*state),
            HostMessage::ShowEvent(report) => self.last_event = Some(*report),
            HostMessage::Chat(message) => {
                self.chat.push_back(message);
                self.trim_chat();
            }
            HostMessage::Error { message } => {
                tracing::debug!(%message, "host reported an error");
                self.last_error = Some(message);
            }
        }
    }

    fn trim_chat(&mut self) {
        while self.chat.len() > self.chat_history {
            self.chat.pop_front();
        }
    }

    // === Outbound ===

    pub fn claim_slot(&mut self, slot: usize, name: impl Into<String>) {
        self.outbox.push(ClientMessage::SlotClaim {
            slot,
            name: name.into(),
        });
    }

    pub fn act(&mut self, intent: Intent) {
        self.outbox.push(ClientMessage::Action(intent));
    }

    /// Roll the reproduction die locally and send the face as a literal.
    pub fn roll_reproduction(&mut self, rng: &mut dyn RandomSource) -> u8 {
        let die = rng.roll_d6();
        self.act(Intent::RollReproduction { die });
        die
    }

    pub fn say(&mut self, text: impl Into<String>) {
        self.outbox.push(ClientMessage::Chat { text: text.into() });
    }

    /// Take the queued messages without sending them.
    pub fn take_outbox(&mut self) -> Vec<ClientMessage> {
        std::mem::take(&mut self.outbox)
    }

    /// Send every queued message to the host.
    ///
    /// Stops at the first failure; unsent messages stay queued.
    pub fn flush(&mut self, link: &mut dyn Transport) -> Result<(), SyncError> {
        while let Some(message) = self.outbox.first() {
            let frame = protocol::encode(message)?;
            link.send(ConnectionId::HOST, &frame)
                .map_err(SyncError::Connection)?;
            self.outbox.remove(0);
        }
        Ok(())
    }
}
