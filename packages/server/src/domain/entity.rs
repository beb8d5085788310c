//! Core domain models for the chat relay.

use std::{fmt, sync::Arc};

use super::{
    error::SendError,
    sender::PeerSender,
    value_object::{DisplayName, MessageContent, PeerId, Timestamp},
};

/// A connected, named client.
///
/// Cloning a Peer is cheap: clones share the same outbound channel, which is
/// what lets the registry hand out snapshots.
#[derive(Clone)]
pub struct Peer {
    /// Peer identifier, stable for the connection lifetime
    pub id: PeerId,
    /// Name chosen by the client at connect time
    pub name: DisplayName,
    /// Timestamp when the peer finished its handshake
    pub connected_at: Timestamp,
    outbound: Arc<dyn PeerSender>,
}

impl Peer {
    /// Create a new peer
    pub fn new(
        id: PeerId,
        name: DisplayName,
        connected_at: Timestamp,
        outbound: Arc<dyn PeerSender>,
    ) -> Self {
        Self {
            id,
            name,
            connected_at,
            outbound,
        }
    }

    /// Hand rendered text to this peer's outbound channel
    pub fn send(&self, text: &str) -> Result<(), SendError> {
        self.outbound.send(text)
    }
}

impl fmt::Debug for Peer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Peer")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("connected_at", &self.connected_at)
            .finish_non_exhaustive()
    }
}

/// Kind of event relayed to peers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Joined,
    Message,
    Left,
}

/// An event to be rendered and fanned out to peers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BroadcastEvent {
    pub kind: EventKind,
    pub source: DisplayName,
    /// Message text; empty for `Joined` and `Left`
    pub payload: String,
}

impl BroadcastEvent {
    pub fn joined(source: DisplayName) -> Self {
        Self {
            kind: EventKind::Joined,
            source,
            payload: String::new(),
        }
    }

    pub fn message(source: DisplayName, content: MessageContent) -> Self {
        Self {
            kind: EventKind::Message,
            source,
            payload: content.into_string(),
        }
    }

    pub fn left(source: DisplayName) -> Self {
        Self {
            kind: EventKind::Left,
            source,
            payload: String::new(),
        }
    }

    /// Render the event to its newline-terminated wire text.
    pub fn render(&self) -> String {
        match self.kind {
            EventKind::Joined => format!("{} has connected\n", self.source),
            EventKind::Message => format!("{}: {}\n", self.source, self.payload),
            EventKind::Left => format!("{} has disconnected.\n", self.source),
        }
    }
}
