//! Domain factories for creating value objects.

use std::sync::atomic::{AtomicU64, Ordering};

use super::PeerId;

/// Factory for generating PeerId instances.
///
/// Ids are handed out monotonically starting at 1 and are never reused for
/// the lifetime of the factory.
#[derive(Debug)]
pub struct PeerIdFactory {
    next: AtomicU64,
}

impl PeerIdFactory {
    /// Create a factory whose first id is 1.
    pub fn new() -> Self {
        Self {
            next: AtomicU64::new(1),
        }
    }

    /// Generate the next PeerId.
    pub fn generate(&self) -> PeerId {
        PeerId::new(self.next.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for PeerIdFactory {
    fn default() -> Self {
        Self::new()
    }
}
