//! Registry implementations
//!
//! Concrete implementations of the `PeerRegistry` trait defined by the domain
//! layer. The use case layer only depends on the trait.

pub mod inmemory;

pub use inmemory::InMemoryPeerRegistry;
