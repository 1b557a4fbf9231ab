//! Error types for the session crate.

use thiserror::Error;

/// Errors that can end or prevent a session run.
///
/// Per-message failures (provider errors, send failures) never surface
/// here; they are contained inside the message pipeline.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Transport failure outside the per-message path.
    #[error("transport error: {0}")]
    Transport(#[from] courier_transport::TransportError),

    /// The credential store could not be read at startup.
    #[error("persistence error: {0}")]
    Persistence(#[from] courier_persistence::PersistenceError),
}

/// Result type for session operations.
pub type Result<T> = std::result::Result<T, SessionError>;
