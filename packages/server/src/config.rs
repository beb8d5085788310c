//! Server configuration.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

/// Port the relay listens on unless told otherwise
pub const DEFAULT_PORT: u16 = 2000;

/// Interface the server binds to by default (all interfaces)
pub const DEFAULT_BIND_HOST: IpAddr = IpAddr::V4(Ipv4Addr::UNSPECIFIED);

/// Address clients connect to by default (loopback)
pub const DEFAULT_SERVER_HOST: IpAddr = IpAddr::V4(Ipv4Addr::LOCALHOST);

/// Runtime configuration for [`crate::Server`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Socket address to bind. Port 0 picks an ephemeral port.
    pub addr: SocketAddr,
}

impl ServerConfig {
    pub fn new(host: IpAddr, port: u16) -> Self {
        Self {
            addr: SocketAddr::new(host, port),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BIND_HOST, DEFAULT_PORT)
    }
}
