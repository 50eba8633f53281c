pub mod chat_client;

use crate::{
    config::{GeminiConfig, GenerationConfig},
    error::{GeminiError, Result},
};
use std::sync::Arc;

pub use chat_client::{ChatSession, GeminiBackend, ModelBackend};

pub const DEFAULT_MODEL: &str = "gemini-1.5-pro";
pub const BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Entry point for talking to the Gemini API. Holds the configured backend
/// and hands out fresh chat sessions.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    backend: Arc<GeminiBackend>,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .ok_or_else(|| GeminiError::ConfigError("No Gemini API key configured".into()))?;
        let model = config.model.unwrap_or_else(|| DEFAULT_MODEL.to_string());
        let base_url = config.base_url.unwrap_or_else(|| BASE_URL.to_string());

        log::debug!("Gemini client ready for model {}", model);

        Ok(Self {
            backend: Arc::new(GeminiBackend::new(api_key, model, base_url)),
        })
    }

    /// Starts a chat session with an empty transcript. The generation
    /// configuration is fixed for the session's lifetime.
    pub fn start_chat(&self, generation: GenerationConfig) -> ChatSession {
        ChatSession::new(self.backend.clone(), generation)
    }
}
