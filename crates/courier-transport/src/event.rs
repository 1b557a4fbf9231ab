//! Events emitted by a live transport connection.

use std::fmt;

use courier_models::{CredentialBundle, MessageBatch};

/// Why a connection closed, as reported by the transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisconnectReason {
    /// The paired session was explicitly invalidated remotely (remote
    /// logout, pairing expiry). Terminal: only re-pairing brings the bot
    /// back online.
    LoggedOut,
    /// The transport requires a restart to finish pairing.
    RestartRequired,
    /// The socket dropped or timed out.
    ConnectionLost,
    /// The server closed the stream.
    ConnectionClosed,
    /// Any other transport-reported status code.
    Other(u16),
}

impl DisconnectReason {
    /// Recoverable disconnects trigger an automatic reconnect attempt;
    /// terminal ones require operator intervention.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, DisconnectReason::LoggedOut)
    }
}

impl fmt::Display for DisconnectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DisconnectReason::LoggedOut => write!(f, "logged out"),
            DisconnectReason::RestartRequired => write!(f, "restart required"),
            DisconnectReason::ConnectionLost => write!(f, "connection lost"),
            DisconnectReason::ConnectionClosed => write!(f, "connection closed"),
            DisconnectReason::Other(code) => write!(f, "status code {}", code),
        }
    }
}

/// Events emitted while a connection lives.
#[derive(Debug, Clone)]
pub enum TransportEvent {
    /// The handshake completed; the session is online.
    Opened,
    /// A batch of inbound messages arrived.
    Messages(MessageBatch),
    /// The transport accepted new credential material. The session must
    /// persist it before relying on the new credentials.
    CredentialsUpdated(CredentialBundle),
    /// A pairing payload for the operator to scan on another device.
    PairingQr(String),
    /// The connection closed for the given reason.
    Closed(DisconnectReason),
}
