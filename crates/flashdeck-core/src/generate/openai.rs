use std::time::Duration;

use indoc::formatdoc;
use reqwest::{header, Client};
use serde::{Deserialize, Serialize};

use super::{parse_cards_response, CardGenerator};
use crate::credentials;
use crate::deck::CardDraft;
use crate::error::GenerationError;
use crate::storage::AiConfig;

/// Overrides `ai.base_url` when set.
pub const BASE_URL_ENV: &str = "OPENAI_API_BASE_URL";
/// Overrides `ai.model` when set.
pub const MODEL_ENV: &str = "MODEL_NAME";

/// Generator backed by an OpenAI-compatible chat completions API.
#[derive(Debug, Clone)]
pub struct OpenAiGenerator {
    client: Client,
    base_url: String,
    model: String,
    api_key: Option<String>,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: MessageResponse,
}

#[derive(Debug, Deserialize)]
struct MessageResponse {
    content: Option<String>,
}

impl OpenAiGenerator {
    pub fn new(
        base_url: impl Into<String>,
        model: impl Into<String>,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, GenerationError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GenerationError::Network(e.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
            api_key,
        })
    }

    /// Build from config, applying environment overrides and the stored key.
    ///
    /// # Errors
    /// Returns [`GenerationError::MissingApiKey`] when no key is available
    /// and the endpoint is not on the local machine.
    pub fn from_config(cfg: &AiConfig) -> Result<Self, GenerationError> {
        let base_url = std::env::var(BASE_URL_ENV)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| cfg.base_url.clone());
        let model = std::env::var(MODEL_ENV)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| cfg.model.clone());
        let api_key = credentials::api_key();

        if api_key.is_none() && !is_local_endpoint(&base_url) {
            return Err(GenerationError::MissingApiKey);
        }

        Self::new(base_url, model, api_key, Duration::from_secs(cfg.timeout_secs))
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn chat_completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    /// Ask the model for `count` cards and parse its reply.
    pub async fn generate_async(
        &self,
        title: &str,
        description: Option<&str>,
        count: u32,
    ) -> Result<Vec<CardDraft>, GenerationError> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system_prompt(count),
                },
                ChatMessage {
                    role: "user",
                    content: user_prompt(title, description),
                },
            ],
        };

        let mut http_request = self
            .client
            .post(self.chat_completions_url())
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(key) = &self.api_key {
            http_request = http_request.header(header::AUTHORIZATION, format!("Bearer {key}"));
        }

        let resp = http_request.json(&request).send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), "AI provider returned an error");
            return Err(GenerationError::Http {
                status: status.as_u16(),
                body,
            });
        }

        let chat: ChatResponse = resp
            .json()
            .await
            .map_err(|e| GenerationError::InvalidFormat(e.to_string()))?;
        let content = chat
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or(GenerationError::EmptyResponse)?;

        parse_cards_response(&content, count as usize).inspect_err(|e| {
            tracing::warn!(error = %e, raw = %content, "could not use AI response");
        })
    }
}

impl CardGenerator for OpenAiGenerator {
    fn generate(
        &self,
        title: &str,
        description: Option<&str>,
        count: u32,
    ) -> Result<Vec<CardDraft>, GenerationError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| GenerationError::Runtime(e.to_string()))?;
        runtime.block_on(self.generate_async(title, description, count))
    }
}

fn system_prompt(count: u32) -> String {
    formatdoc!(
        r#"
        You are an expert educator. Generate {count} high-quality, concise flashcards based on the provided deck title and description.
        Each card should have a clear question or concept on the 'front' and a clear, concise answer on the 'back'.
        Respond ONLY with a valid JSON object of the form {{"cards": [{{"front": "...", "back": "..."}}]}}."#
    )
}

fn user_prompt(title: &str, description: Option<&str>) -> String {
    let description = description
        .filter(|d| !d.trim().is_empty())
        .unwrap_or("No description provided.");
    format!("Deck Title: {title}\nDeck Description: {description}")
}

fn is_local_endpoint(base_url: &str) -> bool {
    url::Url::parse(base_url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_string))
        .is_some_and(|host| matches!(host.as_str(), "localhost" | "127.0.0.1" | "[::1]"))
}
