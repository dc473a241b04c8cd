use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, error, instrument};

use crate::config::ProviderConfig;
use crate::constants;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("failed to reach the Anthropic API: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Anthropic API request failed with status {status}: {body}")]
    Status { status: StatusCode, body: String },
}

// Structures matching the Anthropic /v1/messages endpoint
#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    system: &'a str,
    messages: Vec<RequestMessage<'a>>,
}

#[derive(Serialize)]
struct RequestMessage<'a> {
    role: &'static str,
    content: Vec<RequestContent<'a>>,
}

#[derive(Serialize)]
struct RequestContent<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    text: &'a str,
}

#[derive(Deserialize, Debug)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
    // Other fields like id, usage, stop_reason are ignored
}

#[derive(Deserialize, Debug)]
#[serde(tag = "type")]
enum ContentBlock {
    #[serde(rename = "text")]
    Text { text: String },
    #[serde(other)]
    Other,
}

/// Thin client for the Anthropic Messages API. One call, one reply, no retries.
#[derive(Debug, Clone)]
pub struct AnthropicClient {
    http: Client,
    config: ProviderConfig,
    messages_url: String,
}

impl AnthropicClient {
    pub fn new(config: ProviderConfig) -> Result<Self, LlmError> {
        let http = Client::builder().timeout(config.request_timeout()).build()?;
        let messages_url = format!("{}/v1/messages", config.base_url.trim_end_matches('/'));
        Ok(Self {
            http,
            config,
            messages_url,
        })
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    /// Send a single-turn conversation and return the text of the first
    /// content block. A reply whose first block is not text yields "".
    #[instrument(skip(self, system, prompt), fields(model = %self.config.model))]
    pub async fn complete(&self, system: &str, prompt: &str) -> Result<String, LlmError> {
        let request_payload = MessagesRequest {
            model: &self.config.model,
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
            system,
            messages: vec![RequestMessage {
                role: "user",
                content: vec![RequestContent { kind: "text", text: prompt }],
            }],
        };

        debug!(?prompt, "Sending prompt to Anthropic");

        let response = self
            .http
            .post(&self.messages_url)
            .header("x-api-key", &self.config.api_key)
            .header("anthropic-version", constants::ANTHROPIC_VERSION)
            .json(&request_payload)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read error body".to_string());
            error!(%status, %body, "Anthropic API request failed");
            return Err(LlmError::Status { status, body });
        }

        let reply = response.json::<MessagesResponse>().await?;
        let text = match reply.content.into_iter().next() {
            Some(ContentBlock::Text { text }) => text,
            _ => String::new(),
        };

        debug!(response = %text, "Received Anthropic response");
        Ok(text)
    }
}
