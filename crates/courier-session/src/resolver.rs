//! Sender identity resolution for observability.
//!
//! Produces the per-message log line with human-readable names. Lookup
//! failures degrade to the raw identifier; nothing here ever blocks or
//! fails command dispatch.

use std::fmt;

use courier_transport::ConnectionHandle;
use tracing::info;

use crate::filter::FilteredMessage;

/// Result of a display-name lookup.
///
/// The fallback is an explicit variant rather than a swallowed error so
/// tests can assert on both paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedName {
    /// The transport returned a display name.
    Display(String),
    /// Lookup failed or returned nothing; the raw identifier stands in.
    Raw(String),
}

impl ResolvedName {
    /// The name to show, whichever variant it came from.
    pub fn as_str(&self) -> &str {
        match self {
            ResolvedName::Display(s) | ResolvedName::Raw(s) => s,
        }
    }

    /// True when the lookup fell back to the raw identifier.
    pub fn is_fallback(&self) -> bool {
        matches!(self, ResolvedName::Raw(_))
    }
}

impl fmt::Display for ResolvedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Resolves a display name, falling back to the raw identifier on any
/// lookup failure or empty result.
pub async fn display_name(handle: &dyn ConnectionHandle, id: &str) -> ResolvedName {
    match handle.display_name(id).await {
        Ok(name) if !name.is_empty() => ResolvedName::Display(name),
        _ => ResolvedName::Raw(id.to_string()),
    }
}

/// Resolves a group's display subject with the same fallback behavior.
pub async fn group_subject(
    handle: &dyn ConnectionHandle,
    group: &courier_models::ConversationId,
) -> ResolvedName {
    match handle.group_subject(group).await {
        Ok(subject) if !subject.is_empty() => ResolvedName::Display(subject),
        _ => ResolvedName::Raw(group.to_string()),
    }
}

/// Emits one observability line for an accepted message: group subject and
/// participant name for group conversations, counterpart name for direct
/// ones.
pub async fn log_sender(handle: &dyn ConnectionHandle, msg: &FilteredMessage) {
    if msg.conversation.is_group() {
        let subject = group_subject(handle, &msg.conversation).await;
        let sender = match &msg.participant {
            Some(p) => display_name(handle, p.as_str()).await,
            None => ResolvedName::Raw(msg.conversation.to_string()),
        };
        info!(group = %subject, sender = %sender, text = %msg.text, "group message");
    } else {
        let sender = display_name(handle, msg.conversation.as_str()).await;
        info!(sender = %sender, text = %msg.text, "direct message");
    }
}
