//! InMemory peer registry
//!
//! A `HashMap` keyed by `PeerId` behind a single `tokio::sync::Mutex`.
//! Every operation takes the lock once, does map work only, and releases it;
//! senders are invoked by callers on the cloned snapshot, outside the lock.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{Peer, PeerId, PeerRegistry, RegistryError};

/// In-memory peer registry
#[derive(Default)]
pub struct InMemoryPeerRegistry {
    peers: Mutex<HashMap<PeerId, Peer>>,
}

impl InMemoryPeerRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PeerRegistry for InMemoryPeerRegistry {
    async fn add(&self, peer: Peer) -> Result<(), RegistryError> {
        let mut peers = self.peers.lock().await;
        if peers.contains_key(&peer.id) {
            return Err(RegistryError::DuplicateId(peer.id));
        }
        peers.insert(peer.id, peer);
        Ok(())
    }

    async fn remove(&self, id: PeerId) -> Option<Peer> {
        let mut peers = self.peers.lock().await;
        peers.remove(&id)
    }

    async fn snapshot(&self) -> Vec<Peer> {
        let mut snapshot: Vec<Peer> = {
            let peers = self.peers.lock().await;
            peers.values().cloned().collect()
        };
        snapshot.sort_by_key(|peer| peer.id);
        snapshot
    }

    async fn count(&self) -> usize {
        let peers = self.peers.lock().await;
        peers.len()
    }
}
