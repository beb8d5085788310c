//! Domain layer for the chat relay.
//!
//! This module contains the relay's core types and the traits the other
//! layers depend on. It is independent of sockets and of the async runtime's
//! I/O types.

pub mod entity;
pub mod error;
pub mod factory;
pub mod registry;
pub mod sender;
pub mod value_object;

pub use entity::{BroadcastEvent, EventKind, Peer};
pub use error::{RegistryError, SendError, ValueObjectError};
pub use factory::PeerIdFactory;
pub use registry::PeerRegistry;
pub use sender::PeerSender;
pub use value_object::{DisplayName, MessageContent, PeerId, Timestamp};
