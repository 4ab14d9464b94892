//! Turns raw backend text into a complete, provider-shaped kit.
//!
//! Parsing tries three tiers in order (whole text, fenced block, first balanced
//! brace span) and stops at the first JSON object. Each of the eight expected
//! keys is then validated on its own; anything missing, blank or mis-shaped is
//! taken from the fallback synthesizer, so good backend fields survive a bad one.

use crate::fallback_synthesizer::FallbackSynthesizer;
use promokit_core::{
    KitProvenance, PromotionKit, SongMetadata, REELS_CAPTION_COUNT, YOUTUBE_TAG_COUNT,
    YOUTUBE_TITLE_COUNT,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use thiserror::Error;
use tracing::{debug, info, warn};

pub const KEY_YOUTUBE_TITLES: &str = "youtubeTitles";
pub const KEY_YOUTUBE_DESCRIPTION: &str = "youtubeDescription";
pub const KEY_YOUTUBE_HASHTAGS: &str = "youtubeHashtags";
pub const KEY_FACEBOOK_POST: &str = "facebookPost";
pub const KEY_INSTAGRAM_CAPTION: &str = "instagramCaption";
pub const KEY_TIKTOK_CAPTION: &str = "tiktokCaption";
pub const KEY_REELS_SHORT_CAPTIONS: &str = "reelsShortCaptions";
pub const KEY_THUMBNAIL_IDEA: &str = "thumbnailIdea";

/// The eight keys the backend is asked to return
pub const SOURCE_KEYS: [&str; 8] = [
    KEY_YOUTUBE_TITLES,
    KEY_YOUTUBE_DESCRIPTION,
    KEY_YOUTUBE_HASHTAGS,
    KEY_FACEBOOK_POST,
    KEY_INSTAGRAM_CAPTION,
    KEY_TIKTOK_CAPTION,
    KEY_REELS_SHORT_CAPTIONS,
    KEY_THUMBNAIL_IDEA,
];

/// Which parse strategy produced the JSON object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParseTier {
    Direct,
    Fenced,
    BraceSpan,
}

impl fmt::Display for ParseTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseTier::Direct => write!(f, "direct"),
            ParseTier::Fenced => write!(f, "fenced"),
            ParseTier::BraceSpan => write!(f, "brace_span"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseFailure {
    #[error("Response text is empty")]
    EmptyInput,

    #[error("No JSON object found in response")]
    NoJsonObject,
}

/// Kit fields under the backend's key names; `None` marks an absent field
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderKit {
    pub youtube_titles: Option<Vec<String>>,
    pub youtube_description: Option<String>,
    pub youtube_hashtags: Option<Vec<String>>,
    pub facebook_post: Option<String>,
    pub instagram_caption: Option<String>,
    pub tiktok_caption: Option<String>,
    pub reels_short_captions: Option<Vec<String>>,
    pub thumbnail_idea: Option<String>,
}

impl From<PromotionKit> for ProviderKit {
    fn from(kit: PromotionKit) -> Self {
        Self {
            youtube_titles: Some(kit.youtube_title),
            youtube_description: Some(kit.youtube_description),
            youtube_hashtags: Some(kit.youtube_tags),
            facebook_post: Some(kit.facebook_post),
            instagram_caption: Some(kit.instagram_caption),
            tiktok_caption: Some(kit.tiktok_caption),
            reels_short_captions: Some(kit.reels_short_captions),
            thumbnail_idea: Some(kit.thumbnail_idea),
        }
    }
}

/// Outcome of normalizing one backend reply
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedResponse {
    pub fields: ProviderKit,
    pub provenance: KitProvenance,
    pub parse_tier: Option<ParseTier>,
    /// Keys that were replaced or topped up from the fallback
    pub fallback_keys: Vec<&'static str>,
}

/// Run the parse tiers in order and return the first JSON object found
pub fn parse_tiered(raw: &str) -> Result<(ParseTier, Map<String, Value>), ParseFailure> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ParseFailure::EmptyInput);
    }

    if let Some(object) = decode_object(trimmed) {
        return Ok((ParseTier::Direct, object));
    }

    if let Some(object) = extract_fenced_block(trimmed).and_then(decode_object) {
        return Ok((ParseTier::Fenced, object));
    }

    if let Some(object) = extract_brace_span(trimmed).and_then(decode_object) {
        return Ok((ParseTier::BraceSpan, object));
    }

    Err(ParseFailure::NoJsonObject)
}

fn decode_object(candidate: &str) -> Option<Map<String, Value>> {
    match serde_json::from_str::<Value>(candidate.trim()) {
        Ok(Value::Object(object)) => Some(object),
        _ => None,
    }
}

/// Inner text of the first triple-backtick block, minus an optional `json` tag
fn extract_fenced_block(raw: &str) -> Option<&str> {
    const FENCE: &str = "```";

    let start = raw.find(FENCE)? + FENCE.len();
    let mut body = &raw[start..];
    if body.get(..4).is_some_and(|tag| tag.eq_ignore_ascii_case("json")) {
        body = &body[4..];
    }
    let end = body.find(FENCE)?;
    Some(body[..end].trim())
}

/// First `{ ... }` span with balanced braces, ignoring braces inside strings
fn extract_brace_span(raw: &str) -> Option<&str> {
    let start = raw.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escape = false;

    for (offset, c) in raw[start..].char_indices() {
        if escape {
            escape = false;
            continue;
        }
        match c {
            '\\' if in_string => escape = true,
            '"' => in_string = !in_string,
            '{' if !in_string => depth += 1,
            '}' if !in_string => {
                depth -= 1;
                if depth == 0 {
                    return Some(&raw[start..start + offset + 1]);
                }
            }
            _ => {}
        }
    }

    None
}

/// Non-blank string value for `key`
fn take_text(object: &Map<String, Value>, key: &str) -> Option<String> {
    match object.get(key) {
        Some(Value::String(text)) if !text.trim().is_empty() => Some(text.clone()),
        _ => None,
    }
}

/// Non-blank string elements of the array under `key`; `None` if there are none
fn take_list(object: &Map<String, Value>, key: &str) -> Option<Vec<String>> {
    let items: Vec<String> = object
        .get(key)?
        .as_array()?
        .iter()
        .filter_map(Value::as_str)
        .filter(|item| !item.trim().is_empty())
        .map(str::to_string)
        .collect();

    if items.is_empty() {
        None
    } else {
        Some(items)
    }
}

/// Force `items` to exactly `count` entries: truncate, or top up from `fallback`.
///
/// Returns true when fallback entries were used.
fn fit_to_count(items: &mut Vec<String>, count: usize, fallback: &[String]) -> bool {
    if items.len() >= count {
        items.truncate(count);
        return false;
    }

    for candidate in fallback {
        if items.len() == count {
            break;
        }
        if !items.contains(candidate) {
            items.push(candidate.clone());
        }
    }
    true
}

pub struct ResponseNormalizer {
    synthesizer: FallbackSynthesizer,
}

impl Default for ResponseNormalizer {
    fn default() -> Self {
        Self::new(FallbackSynthesizer::current())
    }
}

impl ResponseNormalizer {
    pub fn new(synthesizer: FallbackSynthesizer) -> Self {
        Self { synthesizer }
    }

    /// Normalize a backend reply; `None` means the provider call failed
    pub fn normalize(&self, raw: Option<&str>, song: &SongMetadata) -> NormalizedResponse {
        let fallback = self.synthesizer.synthesize(song);

        let Some(raw) = raw else {
            debug!("No backend text; using fallback kit");
            return Self::fallback_only(fallback);
        };

        match parse_tiered(raw) {
            Ok((tier, object)) => {
                debug!(tier = %tier, keys = object.len(), "Parsed backend response");
                self.merge(tier, &object, fallback)
            }
            Err(failure) => {
                warn!(
                    reason = %failure,
                    response_len = raw.len(),
                    "Backend response could not be parsed; using fallback kit"
                );
                Self::fallback_only(fallback)
            }
        }
    }

    fn fallback_only(fallback: PromotionKit) -> NormalizedResponse {
        NormalizedResponse {
            fields: ProviderKit::from(fallback),
            provenance: KitProvenance::Fallback,
            parse_tier: None,
            fallback_keys: SOURCE_KEYS.to_vec(),
        }
    }

    fn merge(
        &self,
        tier: ParseTier,
        object: &Map<String, Value>,
        fallback: PromotionKit,
    ) -> NormalizedResponse {
        let mut fallback_keys = Vec::new();

        let mut text = |key: &'static str, fallback_value: String| {
            take_text(object, key).unwrap_or_else(|| {
                fallback_keys.push(key);
                fallback_value
            })
        };
        let youtube_description = text(KEY_YOUTUBE_DESCRIPTION, fallback.youtube_description);
        let facebook_post = text(KEY_FACEBOOK_POST, fallback.facebook_post);
        let instagram_caption = text(KEY_INSTAGRAM_CAPTION, fallback.instagram_caption);
        let tiktok_caption = text(KEY_TIKTOK_CAPTION, fallback.tiktok_caption);
        let thumbnail_idea = text(KEY_THUMBNAIL_IDEA, fallback.thumbnail_idea);

        let mut list = |key: &'static str, count: usize, fallback_value: Vec<String>| {
            match take_list(object, key) {
                Some(mut items) => {
                    if fit_to_count(&mut items, count, &fallback_value) {
                        fallback_keys.push(key);
                    }
                    items
                }
                None => {
                    fallback_keys.push(key);
                    fallback_value
                }
            }
        };
        let youtube_titles = list(KEY_YOUTUBE_TITLES, YOUTUBE_TITLE_COUNT, fallback.youtube_title);
        let youtube_hashtags = list(KEY_YOUTUBE_HASHTAGS, YOUTUBE_TAG_COUNT, fallback.youtube_tags);
        let reels_short_captions = list(
            KEY_REELS_SHORT_CAPTIONS,
            REELS_CAPTION_COUNT,
            fallback.reels_short_captions,
        );

        // Report keys in their canonical order
        fallback_keys.sort_by_key(|key| SOURCE_KEYS.iter().position(|k| k == key));

        let provenance = if fallback_keys.is_empty() {
            KitProvenance::Backend
        } else {
            info!(
                tier = %tier,
                fallback_keys = ?fallback_keys,
                "Merged fallback values into backend response"
            );
            KitProvenance::Merged
        };

        NormalizedResponse {
            fields: ProviderKit {
                youtube_titles: Some(youtube_titles),
                youtube_description: Some(youtube_description),
                youtube_hashtags: Some(youtube_hashtags),
                facebook_post: Some(facebook_post),
                instagram_caption: Some(instagram_caption),
                tiktok_caption: Some(tiktok_caption),
                reels_short_captions: Some(reels_short_captions),
                thumbnail_idea: Some(thumbnail_idea),
            },
            provenance,
            parse_tier: Some(tier),
            fallback_keys,
        }
    }
}
