//! Claude API integration.
//!
//! Implements the CompletionProvider trait for Claude.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

use super::{CompletionError, CompletionProvider};

const SYSTEM_PROMPT: &str = "You write sections of public procurement bid documents. \
Continue the text you are given with the requested section only. \
Do not repeat the prompt and do not add commentary.";

/// Claude API provider.
pub struct ClaudeProvider {
    client: Client,
    api_key: String,
    model: String,
}

impl ClaudeProvider {
    /// Create a new Claude provider.
    ///
    /// Reads API key from ANTHROPIC_API_KEY environment variable.
    pub fn new() -> anyhow::Result<Self> {
        let api_key = std::env::var("ANTHROPIC_API_KEY")
            .map_err(|_| anyhow::anyhow!("ANTHROPIC_API_KEY not set"))?;

        Ok(Self { client: Client::new(), api_key, model: "claude-sonnet-4-20250514".to_string() })
    }

    /// Create with a specific model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    fn build_request(&self, prompt: &str, max_new_tokens: u32) -> ClaudeRequest {
        ClaudeRequest {
            model: self.model.clone(),
            max_tokens: max_new_tokens,
            system: SYSTEM_PROMPT.to_string(),
            messages: vec![Message { role: "user".to_string(), content: prompt.to_string() }],
        }
    }
}

#[async_trait]
impl CompletionProvider for ClaudeProvider {
    async fn complete(&self, prompt: &str, max_new_tokens: u32) -> Result<String, CompletionError> {
        let request = self.build_request(prompt, max_new_tokens);

        let response = self
            .client
            .post("https://api.anthropic.com/v1/messages")
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", "2023-06-01")
            .header("content-type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| CompletionError::Transport(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse().ok())
                .unwrap_or(0);
            return Err(CompletionError::RateLimited(retry_after));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CompletionError::Api(format!("Claude ({status}): {body}")));
        }

        let response: ClaudeResponse =
            response.json().await.map_err(|e| CompletionError::Transport(e.to_string()))?;

        response.content.into_iter().next().map(|c| c.text).ok_or(CompletionError::NoResponse)
    }

    fn name(&self) -> &str {
        "claude"
    }

    async fn is_available(&self) -> bool {
        !self.api_key.is_empty()
    }
}

/// Claude API request structure.
#[derive(Debug, Serialize)]
struct ClaudeRequest {
    model: String,
    max_tokens: u32,
    system: String,
    messages: Vec<Message>,
}

/// Message in a Claude request.
#[derive(Debug, Serialize, Deserialize)]
struct Message {
    role: String,
    content: String,
}

/// Claude API response structure.
#[derive(Debug, Deserialize)]
struct ClaudeResponse {
    content: Vec<ContentBlock>,
}

/// Content block in a Claude response.
#[derive(Debug, Deserialize)]
struct ContentBlock {
    text: String,
}
