//! Maps provider-shaped kit fields onto the public [`PromotionKit`] names.

use crate::response_normalizer::ProviderKit;
use promokit_core::PromotionKit;

/// Rename provider keys to kit fields.
///
/// `youtubeTitles` becomes `youtube_title` and `youtubeHashtags` becomes
/// `youtube_tags`; everything else keeps its meaning. Absent fields become
/// empty values, which cannot happen for normalizer output.
pub fn assemble(fields: ProviderKit) -> PromotionKit {
    PromotionKit {
        youtube_title: fields.youtube_titles.unwrap_or_default(),
        youtube_description: fields.youtube_description.unwrap_or_default(),
        youtube_tags: fields.youtube_hashtags.unwrap_or_default(),
        facebook_post: fields.facebook_post.unwrap_or_default(),
        instagram_caption: fields.instagram_caption.unwrap_or_default(),
        tiktok_caption: fields.tiktok_caption.unwrap_or_default(),
        reels_short_captions: fields.reels_short_captions.unwrap_or_default(),
        thumbnail_idea: fields.thumbnail_idea.unwrap_or_default(),
    }
}
