//! Outbound side of a peer connection.

use super::error::SendError;

/// Handle used to deliver rendered text to one peer.
///
/// Implementations must not block on network I/O: `send` hands the text to
/// the peer's writer and returns. Text sent through one handle reaches the
/// peer in the order it was sent.
#[cfg_attr(test, mockall::automock)]
pub trait PeerSender: Send + Sync {
    /// Queue `text` for delivery to the peer.
    fn send(&self, text: &str) -> Result<(), SendError>;
}
