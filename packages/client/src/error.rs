//! Client error definitions.

use std::net::SocketAddr;

use rustyline::error::ReadlineError;
use thiserror::Error;

/// Errors that end the client
#[derive(Debug, Error)]
pub enum ClientError {
    /// The server could not be reached
    #[error("failed to connect to {addr}: {source}")]
    Connect {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    /// Input ended before a name was entered
    #[error("no name was entered")]
    NameMissing,

    /// Terminal input failed
    #[error("failed to read input: {0}")]
    Readline(#[from] ReadlineError),

    /// Socket I/O failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
