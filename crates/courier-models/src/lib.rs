//! Core data models for Courier.
//!
//! This crate provides the fundamental data types shared across the Courier
//! system: conversation and participant identifiers, inbound message events,
//! the command grammar, outbound payloads, and the opaque credential bundle.
//! It contains no I/O.

pub mod command;
pub mod creds;
pub mod ids;
pub mod message;
pub mod payload;

// Re-export main types
pub use command::{Command, COMPLETE_PREFIX, IMAGE_PREFIX};
pub use creds::CredentialBundle;
pub use ids::{ConversationId, ParticipantId};
pub use message::{BatchKind, InboundMessage, MessageBatch, MessageContent};
pub use payload::OutboundPayload;
