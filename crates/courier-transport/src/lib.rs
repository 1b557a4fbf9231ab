//! Transport boundary for Courier.
//!
//! The messaging wire protocol, cryptographic pairing, and message envelope
//! encoding are external collaborators. This crate defines the seam the
//! session core talks through: a [`Transport`] that establishes or resumes a
//! connection from a credential bundle, the [`TransportEvent`] stream a live
//! connection emits, and a [`ConnectionHandle`] for the send path and
//! metadata lookups.

pub mod error;
pub mod event;
pub mod traits;

pub use error::{Result, TransportError};
pub use event::{DisconnectReason, TransportEvent};
pub use traits::{Connection, ConnectionHandle, Transport, EVENT_CHANNEL_CAPACITY};
