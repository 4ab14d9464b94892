pub mod fallback_synthesizer;
pub mod generator;
pub mod genre_styles;
pub mod llm_factory;
pub mod llm_provider;
pub mod prompt_builder;
pub mod response_normalizer;
pub mod result_assembler;

// Text-generation backends
#[cfg(feature = "huggingface")]
pub mod huggingface_provider;
#[cfg(feature = "openai-chat")]
pub mod openai_chat_provider;

pub use fallback_synthesizer::{synthesize, FallbackSynthesizer};
pub use generator::{GeneratedKit, GenerationStage, PromotionKitGenerator};
pub use genre_styles::{style_for_genre, GenreStyle};
pub use llm_factory::TextProviderFactory;
pub use llm_provider::*;
pub use prompt_builder::build_prompt;
pub use response_normalizer::{parse_tiered, ParseFailure, ParseTier, ProviderKit, ResponseNormalizer};
pub use result_assembler::assemble;

#[cfg(feature = "huggingface")]
pub use huggingface_provider::{HuggingFaceConfig, HuggingFaceProvider};
#[cfg(feature = "openai-chat")]
pub use openai_chat_provider::{OpenAIChatConfig, OpenAIChatProvider};
