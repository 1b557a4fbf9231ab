//! Error types for the provider client.

use thiserror::Error;

/// Provider failures, normalized to one outcome with a best-effort
/// diagnostic string.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// API key missing from configuration.
    #[error("OpenAI API key not set. Set OPENAI_API_KEY environment variable.")]
    NoApiKey,

    /// The HTTP exchange itself failed (network error, timeout).
    #[error("request failed: {0}")]
    RequestFailed(String),

    /// The API answered with a non-success status.
    #[error("API error: {0}")]
    Api(String),

    /// The response body did not have the expected shape.
    #[error("failed to parse response: {0}")]
    Parse(String),

    /// The generated image could not be fetched from its URL.
    #[error("image download failed: {0}")]
    Download(String),
}

/// Result type for provider operations.
pub type Result<T> = std::result::Result<T, ProviderError>;
