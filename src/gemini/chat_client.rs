use crate::{
    config::GenerationConfig,
    error::{GeminiError, Result},
    models::{
        ApiErrorResponse, Content, GenerateContentRequest, GenerateContentResponse,
        ImageAttachment, InlineData, Part, Turn,
    },
};
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use std::sync::Arc;

/// Seam between the conversation bookkeeping and the hosted model. The
/// production implementation talks to the Gemini REST API; tests substitute
/// canned replies.
#[async_trait]
pub trait ModelBackend: Send + Sync {
    async fn generate(&self, contents: &[Content], config: &GenerationConfig) -> Result<String>;
}

#[derive(Debug, Clone)]
pub struct GeminiBackend {
    client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiBackend {
    pub fn new(
        api_key: impl Into<String>,
        model: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.into(),
            model: model.into(),
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl ModelBackend for GeminiBackend {
    async fn generate(&self, contents: &[Content], config: &GenerationConfig) -> Result<String> {
        let request = GenerateContentRequest {
            contents: contents.to_vec(),
            generation_config: (*config).into(),
        };

        let url = format!(
            "{}/{}:generateContent?key={}",
            self.base_url, self.model, self.api_key
        );

        log::info!("Invoking model: {}", self.model);
        log::debug!("Sending {} content entries", contents.len());

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                log::error!("Gemini request failed: {}", e);
                GeminiError::RequestError(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "failed to read error body".to_string());
            let message = serde_json::from_str::<ApiErrorResponse>(&body)
                .ok()
                .and_then(|parsed| parsed.error)
                .and_then(|error| error.message)
                .unwrap_or(body);
            log::error!("Gemini service error {}: {}", status, message);
            return Err(GeminiError::ResponseError(format!(
                "{} - {}",
                status, message
            )));
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| GeminiError::ResponseError(e.to_string()))?;

        extract_text(parsed)
    }
}

fn extract_text(response: GenerateContentResponse) -> Result<String> {
    let text = response
        .candidates
        .and_then(|mut candidates| {
            if candidates.is_empty() {
                None
            } else {
                Some(candidates.remove(0))
            }
        })
        .and_then(|candidate| candidate.content)
        .and_then(|content| content.parts)
        .map(|parts| {
            parts
                .into_iter()
                .filter_map(|part| part.text)
                .collect::<Vec<_>>()
                .join("")
        })
        .unwrap_or_default();

    if text.is_empty() {
        return Err(GeminiError::ResponseError(
            "Model returned no text candidates".into(),
        ));
    }

    Ok(text)
}

/// One ongoing exchange with the model. Owns the ordered transcript and the
/// generation configuration, which is fixed for the session's lifetime. Every
/// call resends the full accumulated transcript.
pub struct ChatSession {
    backend: Arc<dyn ModelBackend>,
    config: GenerationConfig,
    history: Vec<Turn>,
}

impl ChatSession {
    pub fn new(backend: Arc<dyn ModelBackend>, config: GenerationConfig) -> Self {
        Self {
            backend,
            config,
            history: Vec::new(),
        }
    }

    /// Appends a user turn, sends the whole transcript, waits for the complete
    /// reply, appends it as a model turn, and returns the reply text. No
    /// retries; a backend failure propagates as-is.
    pub async fn send_turn(
        &mut self,
        text: impl Into<String>,
        attachment: Option<&ImageAttachment>,
    ) -> Result<String> {
        self.history
            .push(Turn::user(text, attachment.cloned()));

        let contents = encode_contents(&self.history);
        let reply = self.backend.generate(&contents, &self.config).await?;

        log::debug!("Received reply of {} chars", reply.len());
        self.history.push(Turn::model(reply.clone()));
        Ok(reply)
    }

    pub fn history(&self) -> &[Turn] {
        &self.history
    }

    pub fn config(&self) -> &GenerationConfig {
        &self.config
    }
}

fn encode_contents(history: &[Turn]) -> Vec<Content> {
    history
        .iter()
        .map(|turn| {
            let mut parts = vec![Part::Text {
                text: turn.text.clone(),
            }];
            if let Some(attachment) = &turn.attachment {
                parts.push(Part::InlineData {
                    inline_data: InlineData {
                        mime_type: attachment.mime_type.clone(),
                        data: BASE64.encode(&attachment.data),
                    },
                });
            }
            Content {
                role: turn.role.as_str().to_string(),
                parts,
            }
        })
        .collect()
}
