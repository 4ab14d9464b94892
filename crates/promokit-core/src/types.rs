use crate::error::{PromoKitError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Number of YouTube title variants in a complete kit
pub const YOUTUBE_TITLE_COUNT: usize = 3;
/// Number of YouTube hashtags in a complete kit
pub const YOUTUBE_TAG_COUNT: usize = 10;
/// Number of short Reels captions in a complete kit
pub const REELS_CAPTION_COUNT: usize = 5;

/// Caller-supplied description of the song being promoted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SongMetadata {
    pub title: String,
    pub artist: String,
    /// Free text, matched case-insensitively against the genre style table
    pub genre: String,
    #[serde(default)]
    pub description: String,
}

impl SongMetadata {
    pub fn new(
        title: impl Into<String>,
        artist: impl Into<String>,
        genre: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            artist: artist.into(),
            genre: genre.into(),
            description: String::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Reject metadata that must never reach the generation pipeline
    pub fn validate(&self) -> Result<()> {
        let missing: Vec<&str> = [
            ("title", &self.title),
            ("artist", &self.artist),
            ("genre", &self.genre),
        ]
        .iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| *name)
        .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(PromoKitError::Validation(format!(
                "Missing required song fields: {}",
                missing.join(", ")
            )))
        }
    }
}

/// Canonical promotion kit returned to callers
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromotionKit {
    pub youtube_title: Vec<String>,
    pub youtube_description: String,
    pub youtube_tags: Vec<String>,
    pub facebook_post: String,
    pub instagram_caption: String,
    pub tiktok_caption: String,
    pub reels_short_captions: Vec<String>,
    pub thumbnail_idea: String,
}

impl PromotionKit {
    /// True when every sequence has its required length and no text is blank
    pub fn is_complete(&self) -> bool {
        let sequences_ok = [
            (&self.youtube_title, YOUTUBE_TITLE_COUNT),
            (&self.youtube_tags, YOUTUBE_TAG_COUNT),
            (&self.reels_short_captions, REELS_CAPTION_COUNT),
        ]
        .iter()
        .all(|(items, expected)| {
            items.len() == *expected && items.iter().all(|item| !item.trim().is_empty())
        });

        let texts_ok = [
            &self.youtube_description,
            &self.facebook_post,
            &self.instagram_caption,
            &self.tiktok_caption,
            &self.thumbnail_idea,
        ]
        .iter()
        .all(|text| !text.trim().is_empty());

        sequences_ok && texts_ok
    }
}

/// Text-generation backend a kit was requested from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Chat-completions backend with native JSON mode
    OpenAI,
    /// Raw text inference backend
    HuggingFace,
}

impl ProviderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::OpenAI => "openai",
            ProviderKind::HuggingFace => "huggingface",
        }
    }

    pub fn all() -> [ProviderKind; 2] {
        [ProviderKind::OpenAI, ProviderKind::HuggingFace]
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderKind {
    type Err = PromoKitError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "openai" => Ok(ProviderKind::OpenAI),
            "huggingface" | "hf" => Ok(ProviderKind::HuggingFace),
            other => Err(PromoKitError::Validation(format!(
                "Unsupported provider: {}. Available providers: openai, huggingface",
                other
            ))),
        }
    }
}

/// Where the fields of an assembled kit came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KitProvenance {
    /// Every field was taken from the backend response
    Backend,
    /// Backend response with at least one field filled from the fallback
    Merged,
    /// Backend unavailable or unparseable; fallback used in full
    Fallback,
}

impl fmt::Display for KitProvenance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KitProvenance::Backend => write!(f, "backend"),
            KitProvenance::Merged => write!(f, "merged"),
            KitProvenance::Fallback => write!(f, "fallback"),
        }
    }
}
