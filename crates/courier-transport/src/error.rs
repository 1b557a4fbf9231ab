//! Error types for the transport boundary.

use thiserror::Error;

/// Errors reported by a transport implementation.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Session establishment failed before the handshake completed.
    #[error("connect failed: {0}")]
    ConnectFailed(String),

    /// A payload could not be delivered to a conversation. Reported to the
    /// caller per message; does not change the connection state.
    #[error("send failed: {0}")]
    SendFailed(String),

    /// Group metadata or display-name lookup failed.
    #[error("lookup failed: {0}")]
    LookupFailed(String),
}

/// Result type for transport operations.
pub type Result<T> = std::result::Result<T, TransportError>;
