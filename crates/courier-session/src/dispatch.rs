//! Reply delivery back into the originating conversation.

use courier_models::{ConversationId, OutboundPayload};
use courier_provider::ProviderError;
use courier_transport::ConnectionHandle;
use tracing::warn;

use crate::config::APOLOGY_TEXT;

/// Sends a handler's outcome to the conversation it came from.
///
/// A provider failure becomes the fixed apology text, with the underlying
/// reason logged for the operator. A failed send is terminal for this one
/// message: logged, not retried, and never allowed to take down the event
/// loop.
pub async fn deliver(
    handle: &dyn ConnectionHandle,
    conversation: &ConversationId,
    outcome: Result<OutboundPayload, ProviderError>,
) {
    let payload = match outcome {
        Ok(payload) => payload,
        Err(e) => {
            warn!(conversation = %conversation, error = %e, "provider call failed");
            OutboundPayload::text(APOLOGY_TEXT)
        }
    };

    if let Err(e) = handle.send(conversation, payload).await {
        warn!(conversation = %conversation, error = %e, "failed to send reply");
    }
}
