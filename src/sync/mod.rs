//! Host-authoritative session sync.
//!
//! One [`Host`] owns the canonical [`GameState`](crate::core::GameState) and is
//! its only writer. [`Client`]s forward intents and replace their copy with
//! every snapshot the host broadcasts; they never merge.
//!
//! ## Modules
//!
//! - `room`: six-character room codes and their transport addresses
//! - `protocol`: wire messages and frame encoding
//! - `slots`: the claimable roster
//! - `host` / `client`: the two roles, both sans-IO
//! - `transport`: the traits a real peer-connection layer implements

pub mod client;
pub mod host;
pub mod protocol;
pub mod room;
pub mod slots;
pub mod transport;

pub use client::Client;
pub use host::{Host, Recipient};
pub use protocol::{ChatMessage, ClientMessage, HostMessage, ProtocolError};
pub use room::RoomCode;
pub use slots::{Slot, SlotTable};
pub use transport::{ConnectionId, Connector, SyncError, Transport, TransportError};
