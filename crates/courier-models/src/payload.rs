//! Outbound payloads accepted by the transport send path.

use std::fmt;

/// What the bot sends back into a conversation.
#[derive(Clone, PartialEq, Eq)]
pub enum OutboundPayload {
    /// A plain text message.
    Text(String),
    /// Raw image bytes with a caption.
    Image {
        /// Encoded image bytes as fetched from the provider.
        data: Vec<u8>,
        /// Caption shown under the image.
        caption: String,
    },
}

impl OutboundPayload {
    /// Creates a text payload.
    pub fn text(text: impl Into<String>) -> Self {
        OutboundPayload::Text(text.into())
    }

    /// Creates an image payload.
    pub fn image(data: Vec<u8>, caption: impl Into<String>) -> Self {
        OutboundPayload::Image {
            data,
            caption: caption.into(),
        }
    }
}

// Manual Debug so image bytes are not dumped into logs.
impl fmt::Debug for OutboundPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutboundPayload::Text(text) => f.debug_tuple("Text").field(text).finish(),
            OutboundPayload::Image { data, caption } => f
                .debug_struct("Image")
                .field("bytes", &data.len())
                .field("caption", caption)
                .finish(),
        }
    }
}
