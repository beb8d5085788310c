//! Domain layer error definitions.

use thiserror::Error;

use super::value_object::PeerId;

/// Errors related to Value Objects validation
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueObjectError {
    /// DisplayName is empty after sanitizing
    #[error("DisplayName cannot be empty")]
    DisplayNameEmpty,

    /// MessageContent is empty after stripping the line terminator
    #[error("MessageContent cannot be empty")]
    MessageContentEmpty,
}

/// Errors raised by the peer registry
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// The id is already registered. Ids are assigned monotonically, so this
    /// indicates a programming defect rather than a client mistake.
    #[error("peer {0} is already registered")]
    DuplicateId(PeerId),
}

/// Errors raised when handing text to a peer's outbound channel
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SendError {
    /// The peer's writer has stopped (socket write failed or session closed)
    #[error("outbound channel is closed")]
    Closed,

    /// The peer is not reading fast enough and its outbound queue is full
    #[error("outbound queue is full")]
    Full,
}
