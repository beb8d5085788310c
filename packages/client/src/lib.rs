//! Interactive CLI client for the Relay chat server.
//!
//! - [`config`] holds the connection settings.
//! - [`error`] defines the client's error type.
//! - [`session`] multiplexes typed lines and lines from the server.

pub mod config;
pub mod error;
pub mod session;

pub use config::ClientConfig;
pub use error::ClientError;
pub use session::{SessionEnd, run_client};
