//! Infrastructure layer: concrete registry, wire framing and socket writers.

pub mod codec;
pub mod registry;
pub mod transport;
