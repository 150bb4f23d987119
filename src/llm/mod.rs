//! LLM integration.
//!
//! The dialogue engine talks to the model through the [`LlmProvider`] trait:
//! given an ordered list of role-tagged messages, return one assistant
//! utterance, or fail with a transient error. The default implementation is
//! the OpenAI chat-completions API; when no credential is available the
//! [`UnconfiguredProvider`] stands in and every LLM-backed turn degrades to a
//! fixed reply.

pub mod openai;
pub mod provider;

pub use openai::{OpenAiConfig, OpenAiProvider};
pub use provider::{
    ChatMessage, CompletionRequest, CompletionResponse, LlmProvider, Role, UnconfiguredProvider,
};

use std::sync::Arc;

use secrecy::SecretString;

use crate::error::LlmError;

/// Configuration for creating an LLM provider.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    /// API key; `None` selects the unconfigured fallback provider.
    pub api_key: Option<SecretString>,
    pub model: String,
    pub timeout: std::time::Duration,
}

/// Create an LLM provider from configuration.
pub fn create_provider(config: &LlmConfig) -> Result<Arc<dyn LlmProvider>, LlmError> {
    match &config.api_key {
        Some(key) => {
            let provider = OpenAiProvider::new(
                OpenAiConfig::new(key.clone())
                    .with_model(&config.model)
                    .with_timeout(config.timeout),
            )?;
            tracing::info!("Using OpenAI (model: {})", config.model);
            Ok(Arc::new(provider))
        }
        None => {
            tracing::warn!("No API key configured; LLM-backed turns will be degraded");
            Ok(Arc::new(UnconfiguredProvider))
        }
    }
}
