//! OpenAI API client for chat completions and image generation.

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ProviderError, Result};

/// Environment variable for the OpenAI API key.
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Chat completions endpoint.
const CHAT_COMPLETIONS_URL: &str = "https://api.openai.com/v1/chat/completions";

/// Image generations endpoint.
const IMAGE_GENERATIONS_URL: &str = "https://api.openai.com/v1/images/generations";

/// Fixed system instruction for every completion exchange.
const SYSTEM_PROMPT: &str = "You are a helpful assistant for this conversation.";

/// Default completion model.
pub const DEFAULT_CHAT_MODEL: &str = "gpt-4o";

/// Default image model.
pub const DEFAULT_IMAGE_MODEL: &str = "dall-e-3";

/// Images are always requested as a single square output.
const IMAGE_SIZE: &str = "1024x1024";

/// Per-request timeout. Provider calls have no retry; a hung request would
/// otherwise stall its message task indefinitely.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// A successfully generated image: raw bytes plus the caption to attach.
#[derive(Debug, Clone)]
pub struct GeneratedImage {
    /// Encoded image bytes as fetched from the provider's URL.
    pub data: Vec<u8>,
    /// Caption embedding the original prompt.
    pub caption: String,
}

/// The caption attached to a generated image.
pub fn image_caption(prompt: &str) -> String {
    format!("🖼️ Here's your image for: \"{}\"", prompt)
}

/// One request/response exchange against the completion or image endpoint.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Single-turn completion: the fixed system instruction plus the user
    /// prompt. No conversation history is retained across invocations.
    /// Returns the trimmed text of the first choice.
    async fn complete(&self, prompt: &str) -> Result<String>;

    /// Generates exactly one 1024x1024 image for the prompt and fetches it
    /// down to raw bytes.
    async fn generate_image(&self, prompt: &str) -> Result<GeneratedImage>;
}

/// OpenAI API client.
#[derive(Clone)]
pub struct OpenAiClient {
    http: reqwest::Client,
    api_key: String,
    chat_model: String,
    image_model: String,
}

impl OpenAiClient {
    /// Creates a client with the given API key and default models.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| ProviderError::RequestFailed(e.to_string()))?;

        Ok(Self {
            http,
            api_key: api_key.into(),
            chat_model: DEFAULT_CHAT_MODEL.to_string(),
            image_model: DEFAULT_IMAGE_MODEL.to_string(),
        })
    }

    /// Creates a client from the `OPENAI_API_KEY` environment variable.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var(API_KEY_ENV).map_err(|_| ProviderError::NoApiKey)?;
        Self::new(api_key)
    }

    /// Overrides the completion model.
    pub fn with_chat_model(mut self, model: impl Into<String>) -> Self {
        self.chat_model = model.into();
        self
    }

    /// Overrides the image model.
    pub fn with_image_model(mut self, model: impl Into<String>) -> Self {
        self.image_model = model.into();
        self
    }

    async fn execute<B, R>(&self, url: &str, body: &B) -> Result<R>
    where
        B: Serialize + Sync,
        R: DeserializeOwned,
    {
        let response = self
            .http
            .post(url)
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| ProviderError::RequestFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.json().await.unwrap_or(serde_json::Value::Null);
            return Err(ProviderError::Api(api_error_detail(&body, status.as_u16())));
        }

        response
            .json()
            .await
            .map_err(|e| ProviderError::Parse(e.to_string()))
    }
}

#[async_trait]
impl Provider for OpenAiClient {
    async fn complete(&self, prompt: &str) -> Result<String> {
        let request = ChatRequest {
            model: self.chat_model.clone(),
            messages: vec![ChatMessage::system(SYSTEM_PROMPT), ChatMessage::user(prompt)],
        };

        debug!(model = %self.chat_model, "sending completion request");
        let response: ChatResponse = self.execute(CHAT_COMPLETIONS_URL, &request).await?;
        first_choice_text(&response)
    }

    async fn generate_image(&self, prompt: &str) -> Result<GeneratedImage> {
        let request = ImageRequest {
            model: self.image_model.clone(),
            prompt: prompt.to_string(),
            n: 1,
            size: IMAGE_SIZE.to_string(),
        };

        debug!(model = %self.image_model, "sending image generation request");
        let response: ImageResponse = self.execute(IMAGE_GENERATIONS_URL, &request).await?;
        let url = first_image_url(&response)?;

        let image = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| ProviderError::Download(e.to_string()))?;

        let status = image.status();
        if !status.is_success() {
            return Err(ProviderError::Download(format!("status {}", status)));
        }

        let data = image
            .bytes()
            .await
            .map_err(|e| ProviderError::Download(e.to_string()))?
            .to_vec();

        debug!(bytes = data.len(), "image fetched");
        Ok(GeneratedImage {
            data,
            caption: image_caption(prompt),
        })
    }
}

/// Extracts the provider's error detail from a failure body, falling back
/// to a generic message carrying the status code.
fn api_error_detail(body: &serde_json::Value, status: u16) -> String {
    body["error"]["message"]
        .as_str()
        .map(|s| s.to_string())
        .unwrap_or_else(|| format!("OpenAI API error {}", status))
}

/// The trimmed text of the first returned choice, with no formatting
/// injected.
fn first_choice_text(response: &ChatResponse) -> Result<String> {
    response
        .choices
        .first()
        .and_then(|c| c.message.content.as_deref())
        .map(|s| s.trim().to_string())
        .ok_or_else(|| ProviderError::Parse("no content in completion response".to_string()))
}

fn first_image_url(response: &ImageResponse) -> Result<&str> {
    response
        .data
        .first()
        .and_then(|d| d.url.as_deref())
        .ok_or_else(|| ProviderError::Parse("no image URL in response".to_string()))
}

/// Chat completion request.
#[derive(Debug, Clone, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
}

/// A message in the two-message system + user exchange.
#[derive(Debug, Clone, Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

impl ChatMessage {
    fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Chat completion response.
#[derive(Debug, Clone, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Clone, Deserialize)]
struct ChatChoice {
    message: ResponseMessage,
}

#[derive(Debug, Clone, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

/// Image generation request.
#[derive(Debug, Clone, Serialize)]
struct ImageRequest {
    model: String,
    prompt: String,
    n: u8,
    size: String,
}

/// Image generation response.
#[derive(Debug, Clone, Deserialize)]
struct ImageResponse {
    data: Vec<ImageDatum>,
}

#[derive(Debug, Clone, Deserialize)]
struct ImageDatum {
    url: Option<String>,
}
