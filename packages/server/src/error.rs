//! Server error definitions.

use std::net::SocketAddr;

use thiserror::Error;

/// Errors that stop the server
#[derive(Debug, Error)]
pub enum ServerError {
    /// Binding the listening socket failed
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    /// Other I/O failure on the listening socket
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
