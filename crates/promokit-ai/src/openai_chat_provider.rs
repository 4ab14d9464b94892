use crate::llm_provider::*;
use crate::prompt_builder::SYSTEM_DIRECTIVE;
use async_trait::async_trait;
use promokit_core::{LLMConfig, ProviderKind};
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

/// Configuration for the OpenAI chat-completions backend
#[derive(Debug, Clone)]
pub struct OpenAIChatConfig {
    /// API key; without one the provider never touches the network
    pub api_key: Option<SecretString>,
    /// Base URL for the API (e.g., "https://api.openai.com/v1")
    pub base_url: String,
    /// Model to use
    pub model: String,
    /// Sampling temperature
    pub temperature: f32,
    /// Request timeout in seconds; `None` waits indefinitely
    pub timeout_secs: Option<u64>,
}

impl Default for OpenAIChatConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-4".to_string(),
            temperature: 0.7,
            timeout_secs: None,
        }
    }
}

impl From<&LLMConfig> for OpenAIChatConfig {
    fn from(config: &LLMConfig) -> Self {
        Self {
            api_key: config.openai_api_key.clone(),
            base_url: config.openai_base_url.clone(),
            model: config.openai_model.clone(),
            temperature: config.temperature,
            timeout_secs: config.timeout_secs,
        }
    }
}

/// Chat-completions provider asking for a JSON object reply
pub struct OpenAIChatProvider {
    config: OpenAIChatConfig,
    client: Client,
}

impl OpenAIChatProvider {
    pub fn new(config: OpenAIChatConfig) -> ProviderResult<Self> {
        let mut builder = Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder
            .build()
            .map_err(|e| TransportFailure::ClientInit(e.to_string()))?;

        Ok(Self { config, client })
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'))
    }

    /// Single request; no retries
    async fn try_request(
        &self,
        api_key: &SecretString,
        prompt: &str,
        config: &GenerationConfig,
    ) -> ProviderResult<String> {
        let request = ChatCompletionsRequest {
            model: self.config.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: Some(SYSTEM_DIRECTIVE.to_string()),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: Some(prompt.to_string()),
                },
            ],
            temperature: config.temperature,
            response_format: config
                .response_format
                .map(|format_type| ResponseFormatBody { format_type }),
        };

        let response = self
            .client
            .post(self.endpoint())
            .header("Content-Type", "application/json")
            .bearer_auth(api_key.expose_secret())
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            warn!(status = status.as_u16(), model = %self.config.model, "OpenAI request rejected");
            return Err(TransportFailure::from_status(status.as_u16(), error_text));
        }

        let chat_response: ChatCompletionsResponse = response.json().await?;
        let choice = chat_response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| TransportFailure::InvalidResponse("No choices in response".to_string()))?;

        match choice.message.content {
            Some(content) if !content.trim().is_empty() => {
                debug!(
                    finish_reason = ?choice.finish_reason,
                    length = content.len(),
                    "OpenAI returned content"
                );
                Ok(content)
            }
            _ => Err(TransportFailure::EmptyResponse),
        }
    }
}

#[async_trait]
impl TextCompletionProvider for OpenAIChatProvider {
    async fn send(&self, prompt: &str, config: &GenerationConfig) -> ProviderResult<String> {
        let Some(api_key) = self.config.api_key.as_ref() else {
            return Err(TransportFailure::ConfigurationMissing {
                provider: self.provider_name().to_string(),
            });
        };

        self.try_request(api_key, prompt, config).await
    }

    fn generation_config(&self) -> GenerationConfig {
        GenerationConfig::chat_json(self.config.temperature)
    }

    fn kind(&self) -> ProviderKind {
        ProviderKind::OpenAI
    }

    fn provider_name(&self) -> &str {
        "openai"
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }

    fn has_credential(&self) -> bool {
        self.config.api_key.is_some()
    }
}

// API request/response types for Chat Completions API

#[derive(Debug, Serialize)]
struct ChatCompletionsRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormatBody>,
}

#[derive(Debug, Serialize)]
struct ResponseFormatBody {
    #[serde(rename = "type")]
    format_type: ResponseFormat,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionsResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
    #[serde(default)]
    finish_reason: Option<String>,
}
