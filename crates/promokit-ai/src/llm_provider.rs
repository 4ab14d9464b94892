use async_trait::async_trait;
use promokit_core::ProviderKind;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type for text-generation calls
pub type ProviderResult<T> = Result<T, TransportFailure>;

/// Why a provider could not return raw text.
///
/// Every variant is recoverable: the generator routes all of them to the
/// fallback synthesizer.
#[derive(Debug, Error)]
pub enum TransportFailure {
    #[error("No API key configured for {provider}")]
    ConfigurationMissing { provider: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Authentication rejected ({status})")]
    Authentication { status: u16 },

    #[error("Quota or rate limit exceeded: {0}")]
    QuotaExceeded(String),

    #[error("API error ({status}): {body}")]
    Api { status: u16, body: String },

    #[error("Unexpected response shape: {0}")]
    InvalidResponse(String),

    #[error("Response contained no generated text")]
    EmptyResponse,

    #[error("Failed to create HTTP client: {0}")]
    ClientInit(String),
}

impl TransportFailure {
    /// Map a non-success HTTP status to the matching failure
    pub fn from_status(status: u16, body: String) -> Self {
        match status {
            401 | 403 => TransportFailure::Authentication { status },
            429 => TransportFailure::QuotaExceeded(body),
            _ => TransportFailure::Api { status, body },
        }
    }

    pub fn is_configuration_missing(&self) -> bool {
        matches!(self, TransportFailure::ConfigurationMissing { .. })
    }
}

impl From<reqwest::Error> for TransportFailure {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            TransportFailure::InvalidResponse(err.to_string())
        } else {
            TransportFailure::Network(err.to_string())
        }
    }
}

/// Structured output mode requested from chat backends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseFormat {
    Text,
    JsonObject,
}

/// Generation parameters sent with each request.
///
/// Each provider ignores the parameters its wire format has no slot for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Temperature for sampling (0.0 to 2.0)
    pub temperature: f32,
    /// Top-p nucleus sampling parameter
    pub top_p: Option<f32>,
    /// Maximum generated length
    pub max_length: Option<usize>,
    /// Structured output mode (chat backends only)
    pub response_format: Option<ResponseFormat>,
    /// Echo the prompt back in the generated text (raw inference only)
    pub return_full_text: bool,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            top_p: None,
            max_length: None,
            response_format: None,
            return_full_text: false,
        }
    }
}

impl GenerationConfig {
    /// Chat request asking for a JSON object reply
    pub fn chat_json(temperature: f32) -> Self {
        Self {
            temperature,
            response_format: Some(ResponseFormat::JsonObject),
            ..Default::default()
        }
    }

    /// Free-text completion with nucleus sampling and a length cap
    pub fn raw_completion(temperature: f32, top_p: f32, max_length: usize) -> Self {
        Self {
            temperature,
            top_p: Some(top_p),
            max_length: Some(max_length),
            ..Default::default()
        }
    }
}

/// A remote text-generation backend
#[async_trait]
pub trait TextCompletionProvider: Send + Sync {
    /// Send `prompt` and return the backend's raw text.
    ///
    /// Makes at most one outbound call and never retries. A provider without a
    /// credential returns `ConfigurationMissing` without touching the network.
    async fn send(&self, prompt: &str, config: &GenerationConfig) -> ProviderResult<String>;

    /// Generation parameters this provider is configured to use
    fn generation_config(&self) -> GenerationConfig;

    /// Send `prompt` with this provider's configured parameters
    async fn complete(&self, prompt: &str) -> ProviderResult<String> {
        self.send(prompt, &self.generation_config()).await
    }

    fn kind(&self) -> ProviderKind;

    /// Get the name of this provider
    fn provider_name(&self) -> &str;

    /// Get the model identifier
    fn model_name(&self) -> &str;

    /// Whether a credential was supplied
    fn has_credential(&self) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert!(matches!(
            TransportFailure::from_status(401, String::new()),
            TransportFailure::Authentication { status: 401 }
        ));
        assert!(matches!(
            TransportFailure::from_status(429, "slow down".into()),
            TransportFailure::QuotaExceeded(_)
        ));
        assert!(matches!(
            TransportFailure::from_status(503, "loading".into()),
            TransportFailure::Api { status: 503, .. }
        ));
    }

    #[test]
    fn test_generation_presets() {
        let chat = GenerationConfig::chat_json(0.7);
        assert_eq!(chat.response_format, Some(ResponseFormat::JsonObject));
        assert!(chat.top_p.is_none());

        let raw = GenerationConfig::raw_completion(0.7, 0.95, 2000);
        assert_eq!(raw.top_p, Some(0.95));
        assert_eq!(raw.max_length, Some(2000));
        assert!(!raw.return_full_text);
        assert!(raw.response_format.is_none());
    }

    #[test]
    fn test_response_format_wire_name() {
        let json = serde_json::to_string(&ResponseFormat::JsonObject).unwrap();
        assert_eq!(json, "\"json_object\"");
    }
}
