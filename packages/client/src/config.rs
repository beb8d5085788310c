//! Client configuration.

use std::net::SocketAddr;

use relay_server::config::{DEFAULT_PORT, DEFAULT_SERVER_HOST};

/// Runtime configuration for the client
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Address of the relay server
    pub server: SocketAddr,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server: SocketAddr::new(DEFAULT_SERVER_HOST, DEFAULT_PORT),
        }
    }
}
