//! Session configuration.

/// Fixed apology sent when a provider call fails.
pub const APOLOGY_TEXT: &str = "⚠️ Sorry, something went wrong while answering.";

/// Notice sent for a recognized command with an empty prompt.
pub const USAGE_NOTICE: &str =
    "Please add a prompt after the command, e.g. `./ai <question>` or `./img <description>`.";

/// Configuration for a bot session.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Resolve human-readable sender and group names for the per-message
    /// log line. Costs one or two lookups per message; purely cosmetic,
    /// never blocks dispatch.
    pub resolve_names: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            resolve_names: true,
        }
    }
}

impl SessionConfig {
    /// Creates a config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets whether display names are resolved for logging.
    pub fn with_resolve_names(mut self, resolve: bool) -> Self {
        self.resolve_names = resolve;
        self
    }
}
