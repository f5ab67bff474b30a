//! The seam between the sync roles and a peer-connection transport.
//!
//! Host and client never do I/O themselves. They queue messages and hand
//! encoded frames to a [`Transport`]; a [`Connector`] opens the link a
//! client talks to the host over. Timeouts live entirely on this side of the
//! seam.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::protocol::ProtocolError;

/// Identifies one connection as seen by the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ConnectionId(pub u64);

impl ConnectionId {
    /// The host end of a client's link.
    pub const HOST: ConnectionId = ConnectionId(0);
}

impl std::fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "conn#{}", self.0)
    }
}

/// Failures reported by a transport.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    #[error("timed out after {after:?} connecting to {address}")]
    Timeout { address: String, after: Duration },

    #[error("peer {peer} failed: {reason}")]
    Peer { peer: ConnectionId, reason: String },

    #[error("link closed")]
    Closed,
}

/// Client-side failures.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    /// The link to the host could not be opened or used.
    #[error("connection failed: {0}")]
    Connection(#[source] TransportError),

    #[error(transparent)]
    Protocol(#[from] ProtocolError),
}

/// Sends encoded frames to peers.
pub trait Transport {
    fn send(&mut self, to: ConnectionId, frame: &str) -> Result<(), TransportError>;
}

/// Opens links to a room's transport address.
pub trait Connector {
    type Link: Transport;

    fn open(&mut self, address: &str, timeout: Duration) -> Result<Self::Link, TransportError>;
}
