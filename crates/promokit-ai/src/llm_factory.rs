use crate::llm_provider::*;
use anyhow::{Context, Result};
use promokit_core::{LLMConfig, ProviderKind};
use std::sync::Arc;
use tracing::{info, warn};

#[cfg(feature = "openai-chat")]
use crate::openai_chat_provider::{OpenAIChatConfig, OpenAIChatProvider};

#[cfg(feature = "huggingface")]
use crate::huggingface_provider::{HuggingFaceConfig, HuggingFaceProvider};

/// Factory for creating text-generation providers based on configuration
pub struct TextProviderFactory;

impl TextProviderFactory {
    /// Create the provider named by `config.provider`
    pub fn create_from_config(config: &LLMConfig) -> Result<Arc<dyn TextCompletionProvider>> {
        let kind: ProviderKind = config
            .provider
            .parse()
            .with_context(|| format!("Invalid provider in configuration: {}", config.provider))?;

        Self::create(kind, config)
    }

    /// Create a provider of `kind`.
    ///
    /// A missing credential is not an error here: the provider reports
    /// `ConfigurationMissing` when asked to generate, and the kit falls back.
    pub fn create(kind: ProviderKind, config: &LLMConfig) -> Result<Arc<dyn TextCompletionProvider>> {
        let provider = match kind {
            ProviderKind::OpenAI => Self::create_openai_provider(config)?,
            ProviderKind::HuggingFace => Self::create_huggingface_provider(config)?,
        };

        if provider.has_credential() {
            info!(
                provider = provider.provider_name(),
                model = provider.model_name(),
                "Created text-generation provider"
            );
        } else {
            warn!(
                provider = provider.provider_name(),
                "No API key configured; kits will use fallback content"
            );
        }

        Ok(provider)
    }

    /// Provider names compiled into this build
    pub fn supported_providers() -> Vec<&'static str> {
        ProviderKind::all()
            .into_iter()
            .filter(|kind| match kind {
                ProviderKind::OpenAI => cfg!(feature = "openai-chat"),
                ProviderKind::HuggingFace => cfg!(feature = "huggingface"),
            })
            .map(|kind| kind.as_str())
            .collect()
    }

    /// Create an OpenAI chat-completions provider
    fn create_openai_provider(config: &LLMConfig) -> Result<Arc<dyn TextCompletionProvider>> {
        #[cfg(feature = "openai-chat")]
        {
            let provider = OpenAIChatProvider::new(OpenAIChatConfig::from(config))
                .context("Failed to create OpenAI provider")?;
            Ok(Arc::new(provider))
        }

        #[cfg(not(feature = "openai-chat"))]
        {
            let _ = config;
            Err(anyhow::anyhow!(
                "OpenAI provider requires the 'openai-chat' feature to be enabled. \
                 Please rebuild with --features openai-chat or use 'huggingface' instead."
            ))
        }
    }

    /// Create a Hugging Face raw inference provider
    fn create_huggingface_provider(config: &LLMConfig) -> Result<Arc<dyn TextCompletionProvider>> {
        #[cfg(feature = "huggingface")]
        {
            let provider = HuggingFaceProvider::new(HuggingFaceConfig::from(config))
                .context("Failed to create Hugging Face provider")?;
            Ok(Arc::new(provider))
        }

        #[cfg(not(feature = "huggingface"))]
        {
            let _ = config;
            Err(anyhow::anyhow!(
                "Hugging Face provider requires the 'huggingface' feature to be enabled. \
                 Please rebuild with --features huggingface or use 'openai' instead."
            ))
        }
    }
}
