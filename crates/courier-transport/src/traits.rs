//! The seam between the session core and a concrete messaging library.

use std::sync::Arc;

use async_trait::async_trait;
use courier_models::{ConversationId, CredentialBundle, OutboundPayload};
use tokio::sync::mpsc;

use crate::error::Result;
use crate::event::TransportEvent;

/// Buffered events per connection before the transport backpressures.
pub const EVENT_CHANNEL_CAPACITY: usize = 64;

/// A live connection: the inbound event stream plus a shareable handle for
/// the send path and metadata lookups.
pub struct Connection {
    /// Transport events in delivery order.
    pub events: mpsc::Receiver<TransportEvent>,
    /// Send path and lookups, safe to share across message tasks.
    pub handle: Arc<dyn ConnectionHandle>,
}

/// Establishes or resumes sessions. Implemented by the binding to the
/// messaging-protocol library; the core never sees the wire protocol.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Connects with the given credential bundle. An empty bundle means
    /// interactive pairing: the connection emits
    /// [`TransportEvent::PairingQr`] before [`TransportEvent::Opened`].
    async fn connect(&self, creds: &CredentialBundle) -> Result<Connection>;
}

/// Operations available on an open connection.
#[async_trait]
pub trait ConnectionHandle: Send + Sync {
    /// Sends a text or image payload to a conversation.
    async fn send(&self, to: &ConversationId, payload: OutboundPayload) -> Result<()>;

    /// Fetches the display subject of a group conversation.
    async fn group_subject(&self, group: &ConversationId) -> Result<String>;

    /// Resolves the display name for a raw participant or conversation
    /// identifier.
    async fn display_name(&self, id: &str) -> Result<String>;
}
