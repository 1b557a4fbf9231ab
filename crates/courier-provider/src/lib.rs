//! AI provider client for Courier.
//!
//! One request against the external completion or image-generation endpoint,
//! normalized to a single success/failure outcome. Both operations are
//! single-shot with no retry; converting a failure into a user-visible
//! notice is the reply dispatcher's job.

pub mod client;
pub mod error;

pub use client::{
    image_caption, GeneratedImage, OpenAiClient, Provider, DEFAULT_CHAT_MODEL,
    DEFAULT_IMAGE_MODEL,
};
pub use error::{ProviderError, Result};
