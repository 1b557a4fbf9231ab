//! Inbound event gating.
//!
//! Decides, per raw batch, whether anything is eligible for processing.
//! Pure and synchronous; rejecting an event produces no further action.

use courier_models::{BatchKind, ConversationId, MessageBatch, ParticipantId};

/// A message that passed the filter and is eligible for the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilteredMessage {
    /// Originating conversation.
    pub conversation: ConversationId,
    /// Sending participant, present for group conversations.
    pub participant: Option<ParticipantId>,
    /// Extracted message text.
    pub text: String,
}

/// Selects at most one actionable message from a batch; the rest of the
/// batch is discarded.
///
/// Rejected: batches that are not live notifications, events without a
/// message payload, the bot's own messages, and payloads with no text in
/// either the plain or extended slot.
pub fn select_actionable(batch: &MessageBatch) -> Option<FilteredMessage> {
    if batch.kind != BatchKind::Notify {
        return None;
    }

    let msg = batch.messages.first()?;
    if msg.from_self {
        return None;
    }

    let text = msg.content.as_ref()?.extract_text()?;
    Some(FilteredMessage {
        conversation: msg.conversation.clone(),
        participant: msg.participant.clone(),
        text: text.to_string(),
    })
}
