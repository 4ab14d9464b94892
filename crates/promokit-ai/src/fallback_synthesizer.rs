//! Deterministic, template-based promotion kit.
//!
//! The synthesizer is total: for any metadata it produces a complete kit, so it
//! backs every field the backend fails to deliver.

use crate::genre_styles::{style_for_genre, GenreStyle};
use chrono::Datelike;
use promokit_core::{PromotionKit, SongMetadata, YOUTUBE_TAG_COUNT};
use tracing::debug;

/// Hashtags appended after the genre extras, before the reserve pool
const GENERIC_TAGS: &[&str] = &["#GreekMusic", "#MusicVideo", "#ΝέαΚυκλοφορία", "#ΕλληνικήΜουσική"];

/// Used only when duplicates leave fewer than ten distinct tags
const RESERVE_TAGS: &[&str] = &[
    "#NewRelease",
    "#MusicLovers",
    "#OfficialAudio",
    "#NowPlaying",
    "#Music",
    "#Τραγούδι",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FallbackSynthesizer {
    /// Pinned year; `None` reads the calendar on every call
    year: Option<i32>,
}

impl FallbackSynthesizer {
    /// Synthesizer that stamps each kit with the calendar year at synthesis time
    pub fn current() -> Self {
        Self { year: None }
    }

    pub fn for_year(year: i32) -> Self {
        Self { year: Some(year) }
    }

    /// Year the next kit will carry
    pub fn year(&self) -> i32 {
        self.year.unwrap_or_else(|| chrono::Local::now().year())
    }

    pub fn is_pinned(&self) -> bool {
        self.year.is_some()
    }

    pub fn synthesize(&self, song: &SongMetadata) -> PromotionKit {
        let year = self.year();
        let style = style_for_genre(&song.genre);
        debug!(genre = %song.genre, year, "Synthesizing fallback promotion kit");

        let title = song.title.as_str();
        let artist = song.artist.as_str();
        let genre = song.genre.as_str();
        let genre_lower = genre.to_lowercase();
        let artist_tag = strip_whitespace(artist);
        let title_tag = strip_whitespace(title);
        let genre_tag = strip_whitespace(genre);

        PromotionKit {
            youtube_title: vec![
                format!("{title} - {artist} | Official Audio"),
                format!("{artist} - \"{title}\" | Νέο Τραγούδι {year}"),
                format!("\"{title}\" - {artist} | {genre} Hit"),
            ],
            youtube_description: youtube_description(song, style, year),
            youtube_tags: hashtags(&artist_tag, &title_tag, &genre_tag, style, year),
            facebook_post: format!(
                "🎵 ΝΕΑ ΚΥΚΛΟΦΟΡΙΑ 🎵\n\n\"{title}\" - το νέο μας {genre_lower} τραγούδι είναι τώρα διαθέσιμο!{description}\n\n{social}\n\nΑκούστε το παντού: [link στο bio]\n\n#{title_tag} #{artist_tag} #NewMusic",
                description = inline_description(&song.description),
                social = style.social_post,
            ),
            instagram_caption: format!(
                "✨ \"{title}\" - Out Now! ✨\n\n{description}{instagram}\n\nΑκούστε το νέο μας τραγούδι (link στο bio)\n\n#{artist_tag} #{title_tag} #{genre_tag} #GreekMusic #NewRelease #ΝέαΚυκλοφορία #ΕλληνικήΜουσική",
                description = paragraph(&song.description),
                instagram = style.instagram_style,
            ),
            tiktok_caption: format!(
                "Νέο {genre_lower} τραγούδι! \"{title}\" - {artist} {emoji} #{genre_tag} #fyp #ΝέαΚυκλοφορία #{artist_tag}",
                emoji = style.emoji,
            ),
            reels_short_captions: vec![
                format!("\"{title}\" - {}", style.short_captions[0]),
                style.short_captions[1].to_string(),
                format!("Νιώσε τη μαγεία του \"{title}\" {}", style.emoji),
                format!("{artist} στα καλύτερά του/της {}", style.emoji2),
                format!("Αυτό το {genre} κομμάτι {}", style.short_captions[2]),
            ],
            thumbnail_idea: style
                .thumbnail_idea
                .replace("{artist}", artist)
                .replace("{title}", title),
        }
    }
}

impl Default for FallbackSynthesizer {
    fn default() -> Self {
        Self::current()
    }
}

/// Fallback kit for `song` stamped with the current year
pub fn synthesize(song: &SongMetadata) -> PromotionKit {
    FallbackSynthesizer::current().synthesize(song)
}

fn youtube_description(song: &SongMetadata, style: &GenreStyle, year: i32) -> String {
    format!(
        "\"{title}\" από {artist}\n\n{description}{style_line}\n\nΑκούστε το νέο μας τραγούδι στις ψηφιακές πλατφόρμες:\nSpotify: [link]\nApple Music: [link]\nYouTube Music: [link]\n\nFollow {artist}:\nInstagram: [link]\nFacebook: [link]\nTikTok: [link]\n\n© {year} All Rights Reserved",
        title = song.title,
        artist = song.artist,
        description = paragraph(&song.description),
        style_line = style.description,
    )
}

/// Exactly ten distinct tags: song tokens first, then genre extras, then generic tags
fn hashtags(
    artist_tag: &str,
    title_tag: &str,
    genre_tag: &str,
    style: &GenreStyle,
    year: i32,
) -> Vec<String> {
    let candidates = [
        format!("#{artist_tag}"),
        format!("#{title_tag}"),
        format!("#{genre_tag}Music"),
    ]
    .into_iter()
    .chain(style.tags.iter().map(|tag| tag.to_string()))
    .chain([format!("#NewMusic{year}"), format!("#{genre_tag}")])
    .chain(GENERIC_TAGS.iter().map(|tag| tag.to_string()))
    .chain(std::iter::once(format!("#{genre_tag}Τραγούδι")))
    .chain(RESERVE_TAGS.iter().map(|tag| tag.to_string()));

    let mut tags: Vec<String> = Vec::with_capacity(YOUTUBE_TAG_COUNT);
    for tag in candidates {
        if tags.len() == YOUTUBE_TAG_COUNT {
            break;
        }
        if !tags.contains(&tag) {
            tags.push(tag);
        }
    }
    tags
}

fn strip_whitespace(value: &str) -> String {
    value.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Description followed by a blank line, or nothing when absent
fn paragraph(description: &str) -> String {
    let description = description.trim();
    if description.is_empty() {
        String::new()
    } else {
        format!("{description}\n\n")
    }
}

/// Description as a trailing sentence, or nothing when absent
fn inline_description(description: &str) -> String {
    let description = description.trim();
    if description.is_empty() {
        String::new()
    } else {
        format!(" {description}")
    }
}
