//! The roster of seats a connection can claim.
//!
//! A slot keeps its name and connection after a disconnect. Only a slot held
//! by a different, currently connected participant refuses a claim, so a
//! dropped player (or anyone taking their place) can reclaim the seat.

use serde::{Deserialize, Serialize};

use super::protocol::ProtocolError;
use super::transport::ConnectionId;
use crate::core::PlayerId;

/// One seat.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    pub index: usize,
    pub name: Option<String>,
    pub connection: Option<ConnectionId>,
    pub connected: bool,
    /// Player bound to this seat once the game starts.
    pub player: Option<PlayerId>,
}

impl Slot {
    #[must_use]
    pub fn is_claimed(&self) -> bool {
        self.name.is_some()
    }

    fn vacate(&mut self) {
        self.name = None;
        self.connection = None;
        self.connected = false;
    }
}

/// All seats of a room.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotTable {
    slots: Vec<Slot>,
}

impl SlotTable {
    #[must_use]
    pub fn new(count: usize) -> Self {
        let slots = (0..count)
            .map(|index| Slot {
                index,
                ..Slot::default()
            })
            .collect();
        Self { slots }
    }

    #[must_use]
    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Slot> {
        self.slots.get(index)
    }

    /// Give slot `index` to `connection`.
    ///
    /// Any other slot the connection held is vacated. The player binding of
    /// the claimed slot is kept.
    pub fn claim(
        &mut self,
        index: usize,
        connection: ConnectionId,
        name: &str,
    ) -> Result<(), ProtocolError> {
        let count = self.slots.len();
        let slot = self
            .slots
            .get(index)
            .ok_or(ProtocolError::SlotOutOfRange { index, count })?;
        if slot.connected && slot.connection != Some(connection) {
            return Err(ProtocolError::SlotTaken { index });
        }

        for other in &mut self.slots {
            if other.index != index && other.connection == Some(connection) {
                other.vacate();
            }
        }
        if let Some(slot) = self.slots.get_mut(index) {
            slot.name = Some(name.to_string());
            slot.connection = Some(connection);
            slot.connected = true;
        }
        Ok(())
    }

    /// Mark the connection's slot disconnected. Returns its index.
    pub fn disconnect(&mut self, connection: ConnectionId) -> Option<usize> {
        let slot = self
            .slots
            .iter_mut()
            .find(|s| s.connected && s.connection == Some(connection))?;
        slot.connected = false;
        Some(slot.index)
    }

    /// The slot `connection` currently occupies.
    #[must_use]
    pub fn slot_of(&self, connection: ConnectionId) -> Option<&Slot> {
        self.slots
            .iter()
            .find(|s| s.connected && s.connection == Some(connection))
    }

    /// Bind claimed slots to players, in slot order. Returns the names.
    pub fn bind_players(&mut self) -> Vec<String> {
        let mut names = Vec::new();
        for slot in self.slots.iter_mut().filter(|s| s.name.is_some()) {
            let id = u8::try_from(names.len()).unwrap_or(u8::MAX);
            slot.player = Some(PlayerId(id));
            names.push(slot.name.clone().unwrap_or_default());
        }
        names
    }
}
