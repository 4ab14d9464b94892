use crate::llm_provider::*;
use async_trait::async_trait;
use promokit_core::{LLMConfig, ProviderKind};
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

/// Configuration for the Hugging Face raw inference backend
#[derive(Debug, Clone)]
pub struct HuggingFaceConfig {
    /// API token; without one the provider never touches the network
    pub api_key: Option<SecretString>,
    /// Inference base URL; the model id is appended as a path
    pub base_url: String,
    /// Model id (e.g., "bigscience/bloom-7b1")
    pub model: String,
    pub temperature: f32,
    pub top_p: f32,
    pub max_length: usize,
    /// Request timeout in seconds; `None` waits indefinitely
    pub timeout_secs: Option<u64>,
}

impl Default for HuggingFaceConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://api-inference.huggingface.co/models".to_string(),
            model: "bigscience/bloom-7b1".to_string(),
            temperature: 0.7,
            top_p: 0.95,
            max_length: 2000,
            timeout_secs: None,
        }
    }
}

impl From<&LLMConfig> for HuggingFaceConfig {
    fn from(config: &LLMConfig) -> Self {
        Self {
            api_key: config.huggingface_api_key.clone(),
            base_url: config.huggingface_base_url.clone(),
            model: config.huggingface_model.clone(),
            temperature: config.temperature,
            top_p: config.top_p,
            max_length: config.max_length,
            timeout_secs: config.timeout_secs,
        }
    }
}

/// Raw text-generation provider; the JSON instruction lives in the prompt only
pub struct HuggingFaceProvider {
    config: HuggingFaceConfig,
    client: Client,
}

impl HuggingFaceProvider {
    pub fn new(config: HuggingFaceConfig) -> ProviderResult<Self> {
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
        format!(
            "{}/{}",
            self.config.base_url.trim_end_matches('/'),
            self.config.model.trim_start_matches('/')
        )
    }

    async fn try_request(
        &self,
        api_key: &SecretString,
        prompt: &str,
        config: &GenerationConfig,
    ) -> ProviderResult<String> {
        let request = InferenceRequest {
            inputs: prompt.to_string(),
            parameters: InferenceParameters {
                max_length: config.max_length,
                temperature: config.temperature,
                top_p: config.top_p,
                return_full_text: config.return_full_text,
            },
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
            warn!(status = status.as_u16(), model = %self.config.model, "Hugging Face request rejected");
            return Err(TransportFailure::from_status(status.as_u16(), error_text));
        }

        let generated = match response.json::<InferenceResponse>().await? {
            InferenceResponse::Batch(outputs) => outputs.into_iter().next(),
            InferenceResponse::Single(output) => Some(output),
        }
        .ok_or_else(|| TransportFailure::InvalidResponse("Empty output array".to_string()))?;

        if generated.generated_text.trim().is_empty() {
            return Err(TransportFailure::EmptyResponse);
        }

        debug!(length = generated.generated_text.len(), "Hugging Face returned text");
        Ok(generated.generated_text)
    }
}

#[async_trait]
impl TextCompletionProvider for HuggingFaceProvider {
    async fn send(&self, prompt: &str, config: &GenerationConfig) -> ProviderResult<String> {
        let Some(api_key) = self.config.api_key.as_ref() else {
            return Err(TransportFailure::ConfigurationMissing {
                provider: self.provider_name().to_string(),
            });
        };

        self.try_request(api_key, prompt, config).await
    }

    fn generation_config(&self) -> GenerationConfig {
        GenerationConfig::raw_completion(
            self.config.temperature,
            self.config.top_p,
            self.config.max_length,
        )
    }

    fn kind(&self) -> ProviderKind {
        ProviderKind::HuggingFace
    }

    fn provider_name(&self) -> &str {
        "huggingface"
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }

    fn has_credential(&self) -> bool {
        self.config.api_key.is_some()
    }
}

#[derive(Debug, Serialize)]
struct InferenceRequest {
    inputs: String,
    parameters: InferenceParameters,
}

#[derive(Debug, Serialize)]
struct InferenceParameters {
    #[serde(skip_serializing_if = "Option::is_none")]
    max_length: Option<usize>,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f32>,
    return_full_text: bool,
}

/// The inference API answers with an array, some deployments with one object
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum InferenceResponse {
    Batch(Vec<GeneratedOutput>),
    Single(GeneratedOutput),
}

#[derive(Debug, Deserialize)]
struct GeneratedOutput {
    generated_text: String,
}
