//! End-to-end kit generation: prompt, provider call, normalization, assembly.
//!
//! Once metadata validation passes, every path ends in an assembled kit. Backend
//! failures are logged and absorbed by the fallback synthesizer.

use crate::fallback_synthesizer::FallbackSynthesizer;
use crate::llm_factory::TextProviderFactory;
use crate::llm_provider::TextCompletionProvider;
use crate::prompt_builder::build_prompt;
use crate::response_normalizer::{ParseTier, ResponseNormalizer};
use crate::result_assembler::assemble;
use promokit_core::{
    KitProvenance, LLMConfig, PromotionKit, ProviderKind, SavedKit, SongMetadata,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Pipeline states of a single generation request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationStage {
    Idle,
    Building,
    Calling,
    Succeeded,
    Normalizing,
    Failed,
    FallbackOnly,
    Assembled,
}

impl fmt::Display for GenerationStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GenerationStage::Idle => "idle",
            GenerationStage::Building => "building",
            GenerationStage::Calling => "calling",
            GenerationStage::Succeeded => "succeeded",
            GenerationStage::Normalizing => "normalizing",
            GenerationStage::Failed => "failed",
            GenerationStage::FallbackOnly => "fallback_only",
            GenerationStage::Assembled => "assembled",
        };
        f.write_str(name)
    }
}

/// An assembled kit plus how it was produced
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedKit {
    pub kit: PromotionKit,
    pub provenance: KitProvenance,
    pub provider: ProviderKind,
    pub parse_tier: Option<ParseTier>,
    /// Backend keys (e.g. `thumbnailIdea`) filled or topped up from the fallback
    pub fallback_keys: Vec<String>,
    pub stages: Vec<GenerationStage>,
}

impl GeneratedKit {
    /// History entry for this kit, stamped now
    pub fn to_saved_kit(&self, song: &SongMetadata) -> SavedKit {
        SavedKit::new(song.clone(), self.kit.clone(), self.provider)
    }
}

/// Records the state path of one request
struct StageTrace {
    stages: Vec<GenerationStage>,
}

impl StageTrace {
    fn new() -> Self {
        Self {
            stages: vec![GenerationStage::Idle],
        }
    }

    fn advance(&mut self, stage: GenerationStage) {
        debug!(stage = %stage, "Generation stage");
        self.stages.push(stage);
    }
}

pub struct PromotionKitGenerator {
    provider: Arc<dyn TextCompletionProvider>,
    normalizer: ResponseNormalizer,
}

impl PromotionKitGenerator {
    pub fn new(provider: Arc<dyn TextCompletionProvider>) -> Self {
        Self {
            provider,
            normalizer: ResponseNormalizer::default(),
        }
    }

    /// Generator whose fallback content is stamped with `year`
    pub fn with_year(provider: Arc<dyn TextCompletionProvider>, year: i32) -> Self {
        Self {
            provider,
            normalizer: ResponseNormalizer::new(FallbackSynthesizer::for_year(year)),
        }
    }

    /// Build the provider named in `config` and wrap it
    pub fn from_config(config: &LLMConfig) -> anyhow::Result<Self> {
        Ok(Self::new(TextProviderFactory::create_from_config(config)?))
    }

    pub fn provider(&self) -> &Arc<dyn TextCompletionProvider> {
        &self.provider
    }

    /// Generate a complete kit for `song`.
    ///
    /// Only invalid metadata is an error; provider and parse failures degrade to
    /// fallback content.
    pub async fn generate(&self, song: &SongMetadata) -> promokit_core::Result<GeneratedKit> {
        song.validate()?;

        let mut trace = StageTrace::new();
        let provider_kind = self.provider.kind();

        trace.advance(GenerationStage::Building);
        let prompt = build_prompt(song);

        trace.advance(GenerationStage::Calling);
        debug!(
            provider = self.provider.provider_name(),
            model = self.provider.model_name(),
            prompt_len = prompt.len(),
            "Requesting promotion kit"
        );
        let raw = match self.provider.complete(&prompt).await {
            Ok(text) => {
                trace.advance(GenerationStage::Succeeded);
                trace.advance(GenerationStage::Normalizing);
                Some(text)
            }
            Err(failure) => {
                warn!(
                    provider = self.provider.provider_name(),
                    error = %failure,
                    "Provider call failed; using fallback kit"
                );
                trace.advance(GenerationStage::Failed);
                trace.advance(GenerationStage::FallbackOnly);
                None
            }
        };

        let normalized = self.normalizer.normalize(raw.as_deref(), song);
        let kit = assemble(normalized.fields);
        trace.advance(GenerationStage::Assembled);

        info!(
            provider = %provider_kind,
            provenance = %normalized.provenance,
            parse_tier = ?normalized.parse_tier,
            fallback_fields = normalized.fallback_keys.len(),
            "Promotion kit assembled"
        );

        Ok(GeneratedKit {
            kit,
            provenance: normalized.provenance,
            provider: provider_kind,
            parse_tier: normalized.parse_tier,
            fallback_keys: normalized
                .fallback_keys
                .iter()
                .map(|key| key.to_string())
                .collect(),
            stages: trace.stages,
        })
    }
}
