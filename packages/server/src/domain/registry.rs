//! Peer registry abstraction.
//!
//! The use case layer depends on this trait; the concrete implementation
//! lives in the infrastructure layer.

use async_trait::async_trait;

use super::{entity::Peer, error::RegistryError, value_object::PeerId};

/// Thread-safe collection of the peers whose connections are currently
/// accepting writes.
///
/// `add`, `remove` and `snapshot` are atomic with respect to each other.
/// Implementations never hold their internal lock across network I/O.
#[async_trait]
pub trait PeerRegistry: Send + Sync {
    /// Register a peer.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::DuplicateId` if the id is already present.
    async fn add(&self, peer: Peer) -> Result<(), RegistryError>;

    /// Remove a peer by id, returning it if it was present.
    ///
    /// Removing an absent id is a no-op that returns `None`.
    async fn remove(&self, id: PeerId) -> Option<Peer>;

    /// Point-in-time copy of all registered peers, ordered by id.
    async fn snapshot(&self) -> Vec<Peer>;

    /// Number of registered peers.
    async fn count(&self) -> usize;
}
