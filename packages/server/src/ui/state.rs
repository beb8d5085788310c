//! Server state shared by the accept loop and every peer session.

use std::sync::Arc;

use crate::domain::{PeerIdFactory, PeerRegistry};

/// Shared application state
pub struct AppState {
    /// Registry（データアクセス層の抽象化）
    pub registry: Arc<dyn PeerRegistry>,
    /// Source of connection ids
    pub peer_ids: PeerIdFactory,
}

impl AppState {
    pub fn new(registry: Arc<dyn PeerRegistry>) -> Self {
        Self {
            registry,
            peer_ids: PeerIdFactory::new(),
        }
    }
}
