//! Inbound message events delivered by the transport.

use crate::ids::{ConversationId, ParticipantId};

/// How a batch of inbound messages arrived.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchKind {
    /// Fresh messages delivered live. Only these are actionable.
    Notify,
    /// Historical messages replayed during sync.
    Replay,
    /// Anything else the transport surfaces.
    Other,
}

/// The text-bearing payload of a message.
///
/// Depending on how the sending client composed the message, the text lives
/// in either the plain slot or the extended slot (quoted replies, link
/// previews). Both are checked when extracting.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageContent {
    /// Plain conversation text.
    pub text: Option<String>,
    /// Text of an extended message.
    pub extended_text: Option<String>,
}

impl MessageContent {
    /// Content with text in the plain slot.
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            extended_text: None,
        }
    }

    /// Content with text in the extended slot.
    pub fn extended(text: impl Into<String>) -> Self {
        Self {
            text: None,
            extended_text: Some(text.into()),
        }
    }

    /// Extracts the message text, preferring the plain slot.
    pub fn extract_text(&self) -> Option<&str> {
        self.text.as_deref().or(self.extended_text.as_deref())
    }
}

/// A single inbound message event. Transient: consumed once by the
/// pipeline and never stored.
#[derive(Debug, Clone)]
pub struct InboundMessage {
    /// The conversation the message belongs to.
    pub conversation: ConversationId,
    /// The sender within a group; absent for direct chats.
    pub participant: Option<ParticipantId>,
    /// Message payload; absent for events like reactions or deletes.
    pub content: Option<MessageContent>,
    /// True when the bot's own identity sent the message.
    pub from_self: bool,
}

impl InboundMessage {
    /// A live text message from a counterpart in a direct chat.
    pub fn direct_text(conversation: impl Into<ConversationId>, text: impl Into<String>) -> Self {
        Self {
            conversation: conversation.into(),
            participant: None,
            content: Some(MessageContent::plain(text)),
            from_self: false,
        }
    }

    /// A live text message from a participant in a group chat.
    pub fn group_text(
        conversation: impl Into<ConversationId>,
        participant: impl Into<ParticipantId>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            conversation: conversation.into(),
            participant: Some(participant.into()),
            content: Some(MessageContent::plain(text)),
            from_self: false,
        }
    }
}

/// A batch of inbound messages plus how they arrived.
#[derive(Debug, Clone)]
pub struct MessageBatch {
    /// Delivery class of the whole batch.
    pub kind: BatchKind,
    /// The messages in delivery order.
    pub messages: Vec<InboundMessage>,
}

impl MessageBatch {
    /// Creates a batch with the given delivery class.
    pub fn new(kind: BatchKind, messages: Vec<InboundMessage>) -> Self {
        Self { kind, messages }
    }

    /// Creates a live-notify batch.
    pub fn notify(messages: Vec<InboundMessage>) -> Self {
        Self::new(BatchKind::Notify, messages)
    }
}
