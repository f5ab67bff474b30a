//! Wire messages between host and clients.
//!
//! Frames are JSON text. Both directions use adjacent tagging:
//!
//! ```json
//! {"type": "action", "data": {"place_marker": {"tile": 4}}}
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::room::RoomCode;
use super::slots::Slot;
use super::transport::ConnectionId;
use crate::core::{GameState, Intent};
use crate::resolution::EventReport;

/// Malformed frames and rejected protocol requests.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    #[error("malformed frame: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("bad room code {code:?}: {reason}")]
    RoomCode { code: String, reason: String },

    #[error("slot {index} does not exist (the room has {count})")]
    SlotOutOfRange { index: usize, count: usize },

    #[error("slot {index} is taken")]
    SlotTaken { index: usize },

    #[error("the game has not started")]
    NotStarted,

    #[error("chat text is longer than {max} characters")]
    ChatTooLong { max: usize },
}

/// One chat line, stamped by the host.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub sender: String,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

/// Host to client.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum HostMessage {
    /// First message on every new connection.
    Welcome {
        room: RoomCode,
        /// The receiving connection, so the client can find its own slot.
        connection: ConnectionId,
        slots: Vec<Slot>,
        /// Present once the game has started.
        state: Option<Box<GameState>>,
        /// Most recent chat lines, oldest first.
        chat: Vec<ChatMessage>,
    },
    SlotUpdate { slots: Vec<Slot> },
    /// Full snapshot after every state change.
    State(Box<GameState>),
    ShowEvent(Box<EventReport>),
    Chat(ChatMessage),
    Error { message: String },
}

/// Client to host.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum ClientMessage {
    SlotClaim { slot: usize, name: String },
    Action(Intent),
    Chat { text: String },
}

/// Encode any message as a JSON frame.
pub fn encode<T: Serialize>(message: &T) -> Result<String, ProtocolError> {
    Ok(serde_json::to_string(message)?)
}

/// Decode a JSON frame.
pub fn decode<T: for<'de> Deserialize<'de>>(frame: &str) -> Result<T, ProtocolError> {
    Ok(serde_json::from_str(frame)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::TileId;

    #[test]
    fn test_client_frame_shape() {
        let place = Intent::PlaceMarker { tile: TileId(4) };
        let frame = encode(&ClientMessage::Action(place)).unwrap();
        assert_eq!(frame, r#"{"type":"action","data":{"place_marker":{"tile":4}}}"#);

        let frame = encode(&ClientMessage::SlotClaim { slot: 1, name: "Bo".into() }).unwrap();
        assert_eq!(frame, r#"{"type":"slot_claim","data":{"slot":1,"name":"Bo"}}"#);
    }

    #[test]
    fn test_decode_roll_action() {
        let message: ClientMessage =
            decode(r#"{"type":"action","data":{"roll_reproduction":{"die":6}}}"#).unwrap();
        assert_eq!(message, ClientMessage::Action(Intent::RollReproduction { die: 6 }));
    }

    #[test]
    fn test_malformed_frames() {
        assert!(matches!(
            decode::<ClientMessage>("{not json"),
            Err(ProtocolError::Malformed(_))
        ));
        assert!(decode::<ClientMessage>(r#"{"type":"teleport","data":{}}"#).is_err());
    }

    #[test]
    fn test_error_frame() {
        let frame = encode(&HostMessage::Error { message: "slot 2 is taken".into() }).unwrap();
        assert_eq!(frame, r#"{"type":"error","data":{"message":"slot 2 is taken"}}"#);
        assert_eq!(
            decode::<HostMessage>(&frame).unwrap(),
            HostMessage::Error { message: "slot 2 is taken".into() }
        );
    }
}
