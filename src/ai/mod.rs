//! Language model completion.
//!
//! Generators only need one capability from a model: continue a prompt
//! within a token budget. [`CompletionProvider`] is that seam.
//!
//! ## Backends
//!
//! - Ollama (local)
//! - Claude
//! - OpenAI and compatible APIs
//!
//! [`CompletionManager`] wraps a list of candidate backends. Constructing it
//! is cheap; the first call probes the candidates once and caches the ones
//! that answered. A failed probe is not cached, so a later call retries.

#[cfg(feature = "ai")]
mod claude;
#[cfg(feature = "ai")]
mod ollama;
#[cfg(feature = "ai")]
mod openai;

#[cfg(feature = "ai")]
pub use claude::ClaudeProvider;
#[cfg(feature = "ai")]
pub use ollama::OllamaProvider;
#[cfg(feature = "ai")]
pub use openai::OpenAIProvider;

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::OnceCell;

/// Trait for text completion backends.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Continue `prompt`, generating at most `max_new_tokens` tokens.
    ///
    /// Backends may echo the prompt in front of the continuation; callers
    /// strip it with [`strip_prompt`].
    async fn complete(&self, prompt: &str, max_new_tokens: u32) -> Result<String, CompletionError>;

    /// Get the provider name.
    fn name(&self) -> &str;

    /// Check if the provider is reachable.
    async fn is_available(&self) -> bool;
}

/// Completion error types.
#[derive(Debug, Clone, thiserror::Error)]
pub enum CompletionError {
    #[error("Provider not available: {0}")]
    Unavailable(String),

    #[error("API error: {0}")]
    Api(String),

    #[error("Rate limited, retry after {0}s")]
    RateLimited(u64),

    #[error("Request failed: {0}")]
    Transport(String),

    #[error("No response from model")]
    NoResponse,
}

/// Remove an echoed prompt from a raw completion and trim it.
pub fn strip_prompt<'a>(raw: &'a str, prompt: &str) -> &'a str {
    raw.strip_prefix(prompt).unwrap_or(raw).trim()
}

/// Completion provider with lazy initialisation and fallback.
///
/// Tries active providers in order until one succeeds.
pub struct CompletionManager {
    candidates: Vec<Arc<dyn CompletionProvider>>,
    active: OnceCell<Vec<Arc<dyn CompletionProvider>>>,
}

impl CompletionManager {
    /// Wrap candidate providers. Nothing is contacted until first use.
    pub fn new(candidates: Vec<Arc<dyn CompletionProvider>>) -> Self {
        Self { candidates, active: OnceCell::new() }
    }

    /// Build the candidate chain from configuration.
    ///
    /// `auto` tries Claude, then OpenAI (when their API keys are set), then
    /// the local Ollama server.
    #[cfg(feature = "ai")]
    pub fn from_config(config: &crate::core::AiConfig) -> Self {
        let mut candidates: Vec<Arc<dyn CompletionProvider>> = Vec::new();
        let provider = config.provider.to_lowercase();

        let ollama = || {
            let model = config.model.clone().unwrap_or_else(|| config.ollama.model.clone());
            Arc::new(OllamaProvider::new().with_base_url(&config.ollama.base_url).with_model(model))
        };

        if matches!(provider.as_str(), "claude" | "auto") {
            match ClaudeProvider::new() {
                Ok(claude) => {
                    let model = config.model.clone().unwrap_or_else(|| config.claude.model.clone());
                    candidates.push(Arc::new(claude.with_model(model)));
                }
                Err(e) => tracing::debug!(error = %e, "Claude provider not configured"),
            }
        }

        if matches!(provider.as_str(), "openai" | "auto") {
            match OpenAIProvider::new() {
                Ok(openai) => {
                    let model = config.model.clone().unwrap_or_else(|| config.openai.model.clone());
                    candidates.push(Arc::new(
                        openai.with_model(model).with_base_url(&config.openai.base_url),
                    ));
                }
                Err(e) => tracing::debug!(error = %e, "OpenAI provider not configured"),
            }
        }

        match provider.as_str() {
            "ollama" | "auto" => candidates.push(ollama()),
            "claude" | "openai" => {}
            other => {
                tracing::warn!(provider = other, "Unknown AI provider, using Ollama");
                candidates.push(ollama());
            }
        }

        Self::new(candidates)
    }

    /// Probe candidates once and cache the available ones.
    ///
    /// Concurrent callers wait on the same probe.
    pub async fn ready(&self) -> Result<(), CompletionError> {
        self.active
            .get_or_try_init(|| async {
                let mut active = Vec::new();
                for provider in &self.candidates {
                    if provider.is_available().await {
                        tracing::info!(provider = provider.name(), "Completion provider ready");
                        active.push(Arc::clone(provider));
                    } else {
                        tracing::debug!(
                            provider = provider.name(),
                            "Completion provider unavailable"
                        );
                    }
                }

                if active.is_empty() {
                    tracing::warn!("No completion provider available, will retry on next use");
                    return Err(CompletionError::Unavailable(
                        "no completion provider available".to_string(),
                    ));
                }
                Ok(active)
            })
            .await
            .map(|_| ())
    }

    /// Whether initialisation has completed.
    pub fn is_ready(&self) -> bool {
        self.active.initialized()
    }

    /// Name of the preferred active provider, once ready.
    pub fn active_provider(&self) -> Option<&str> {
        self.active.get().and_then(|a| a.first()).map(|p| p.name())
    }
}

#[async_trait]
impl CompletionProvider for CompletionManager {
    async fn complete(&self, prompt: &str, max_new_tokens: u32) -> Result<String, CompletionError> {
        self.ready().await?;

        let mut last_error = CompletionError::NoResponse;
        for provider in self.active.get().into_iter().flatten() {
            match provider.complete(prompt, max_new_tokens).await {
                Ok(text) => return Ok(text),
                Err(e) => {
                    tracing::warn!(
                        provider = provider.name(),
                        error = %e,
                        "Provider failed, trying next"
                    );
                    last_error = e;
                }
            }
        }

        Err(last_error)
    }

    fn name(&self) -> &str {
        self.active_provider().unwrap_or("unavailable")
    }

    async fn is_available(&self) -> bool {
        self.ready().await.is_ok()
    }
}
