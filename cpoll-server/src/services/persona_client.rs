//! Chat-completion client for persona answers
//!
//! Sends the fixed persona preamble and the respondent's question to an
//! OpenAI-compatible `/chat/completions` endpoint. Single attempt, bounded by
//! the configured timeout.

use async_trait::async_trait;
use cpoll_common::config::PersonaConfig;
use cpoll_common::persona::{validate_question, PersonaCompleter, PERSONA_PREAMBLE};
use cpoll_common::{Error, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info, warn};

const USER_AGENT: &str = concat!("cpoll/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    #[serde(default)]
    content: Option<String>,
}

/// Persona completer backed by a chat-completion HTTP API
pub struct ChatPersonaClient {
    http_client: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
    model: String,
    max_tokens: u32,
}

impl ChatPersonaClient {
    pub fn new(config: &PersonaConfig) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| Error::Config(format!("HTTP client setup failed: {}", e)))?;

        if config.api_key.is_none() {
            warn!("No persona API key configured; persona questions will fail");
        }

        Ok(Self {
            http_client,
            endpoint: format!("{}/chat/completions", config.base_url.trim_end_matches('/')),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            max_tokens: config.max_tokens,
        })
    }
}

#[async_trait]
impl PersonaCompleter for ChatPersonaClient {
    async fn complete(&self, question: &str) -> Result<String> {
        let question = validate_question(question)?;

        let Some(api_key) = &self.api_key else {
            return Err(Error::Upstream("Persona service is not configured".to_string()));
        };

        let request = ChatRequest {
            model: &self.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: PERSONA_PREAMBLE,
                },
                ChatMessage {
                    role: "user",
                    content: question,
                },
            ],
            max_tokens: self.max_tokens,
        };

        debug!(model = %self.model, "Requesting persona completion");

        let response = self
            .http_client
            .post(&self.endpoint)
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    Error::Upstream("Persona service timed out".to_string())
                } else {
                    Error::Upstream(format!("Persona service unreachable: {}", e))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), body = %body, "Persona service error");
            return Err(Error::Upstream(format!(
                "Persona service returned {}",
                status.as_u16()
            )));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| Error::Upstream(format!("Unreadable persona response: {}", e)))?;

        let text = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|content| content.trim().to_string())
            .filter(|content| !content.is_empty())
            .ok_or_else(|| Error::Upstream("Persona service returned no answer".to_string()))?;

        info!(chars = text.len(), "Persona answer received");
        Ok(text)
    }
}
