//! Client error types.

use thiserror::Error;

/// Errors that end a client session
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    /// Connection error
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// The relay answered create_room / join_room with an error
    #[error("Server rejected the request: {0}")]
    Rejected(String),

    #[error("Host disconnected, the room is closed")]
    HostDisconnected,

    /// A typed line could not be turned into a message
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
