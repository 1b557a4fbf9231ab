//! The user-facing command grammar.
//!
//! Two prefixes are recognized, matched case-sensitively and in priority
//! order. Everything else is silently ignored by the pipeline.

/// Prefix for chat-completion requests.
pub const COMPLETE_PREFIX: &str = "./ai";

/// Prefix for image-generation requests.
pub const IMAGE_PREFIX: &str = "./img";

/// A command extracted from inbound message text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `./ai <prompt>` — forward the prompt to the completion endpoint.
    Complete(String),
    /// `./img <prompt>` — forward the prompt to the image endpoint.
    Image(String),
}

impl Command {
    /// Matches the fixed prefixes in priority order; the first match wins.
    ///
    /// The argument is the remainder after the prefix, trimmed of
    /// surrounding whitespace. Non-matching text yields `None` and is not
    /// an error.
    pub fn parse(text: &str) -> Option<Command> {
        if let Some(rest) = text.strip_prefix(COMPLETE_PREFIX) {
            return Some(Command::Complete(rest.trim().to_string()));
        }
        if let Some(rest) = text.strip_prefix(IMAGE_PREFIX) {
            return Some(Command::Image(rest.trim().to_string()));
        }
        None
    }

    /// The trimmed argument string.
    pub fn prompt(&self) -> &str {
        match self {
            Command::Complete(p) | Command::Image(p) => p,
        }
    }

    /// A command is only actionable with a non-empty prompt. Bare prefixes
    /// get a usage notice instead of a provider call.
    pub fn has_prompt(&self) -> bool {
        !self.prompt().is_empty()
    }
}
