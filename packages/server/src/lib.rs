//! Line-oriented TCP chat relay.
//!
//! The server accepts TCP connections, registers each client under the
//! display name it sends first, and relays every following line to all other
//! connected clients.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;

pub mod config;
pub mod error;

// Re-export entry points
pub use config::ServerConfig;
pub use error::ServerError;
pub use ui::Server;
