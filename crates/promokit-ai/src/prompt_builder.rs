//! The single generation instruction shared by every provider.

use promokit_core::{SongMetadata, REELS_CAPTION_COUNT, YOUTUBE_TAG_COUNT, YOUTUBE_TITLE_COUNT};

/// System message for chat backends
pub const SYSTEM_DIRECTIVE: &str = "You are a music marketing expert specialized in creating promotional content for songs. Return only valid JSON.";

/// Build the instruction asking the backend for all eight kit fields as JSON
pub fn build_prompt(song: &SongMetadata) -> String {
    format!(
        "Δημιούργησε περιεχόμενο προώθησης για το παρακάτω τραγούδι:\n\
         \n\
         Τίτλος: {title}\n\
         Καλλιτέχνης: {artist}\n\
         Είδος: {genre}\n\
         Περιγραφή: {description}\n\
         \n\
         Δώσε μου τα παρακάτω σε μορφή JSON:\n\
         1. Τρεις τίτλους για YouTube (youtubeTitles - array of {titles} strings)\n\
         2. Μια περιγραφή για YouTube (youtubeDescription - string)\n\
         3. Δέκα hashtags για YouTube (youtubeHashtags - array of {tags} strings)\n\
         4. Μια ανάρτηση για Facebook (facebookPost - string)\n\
         5. Μια λεζάντα για Instagram (instagramCaption - string)\n\
         6. Μια λεζάντα για TikTok (tiktokCaption - string)\n\
         7. Πέντε σύντομες λεζάντες για Reels (reelsShortCaptions - array of {reels} strings)\n\
         8. Μια ιδέα για thumbnail (thumbnailIdea - string)\n\
         \n\
         Χρησιμοποίησε το στυλ που ταιριάζει στο είδος της μουσικής και φρόντισε το περιεχόμενο να είναι στα ελληνικά.\n\
         Η απάντησή σου πρέπει να είναι μόνο σε JSON format και τίποτα άλλο.",
        title = song.title,
        artist = song.artist,
        genre = song.genre,
        description = song.description,
        titles = YOUTUBE_TITLE_COUNT,
        tags = YOUTUBE_TAG_COUNT,
        reels = REELS_CAPTION_COUNT,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_embeds_song_fields() {
        let song = SongMetadata::new("Φως", "Νίκος", "Ροκ").with_description("Ένα τραγούδι για το καλοκαίρι");
        let prompt = build_prompt(&song);

        assert!(prompt.contains("Τίτλος: Φως"));
        assert!(prompt.contains("Καλλιτέχνης: Νίκος"));
        assert!(prompt.contains("Είδος: Ροκ"));
        assert!(prompt.contains("Περιγραφή: Ένα τραγούδι για το καλοκαίρι"));
    }

    #[test]
    fn test_prompt_enumerates_all_fields() {
        let prompt = build_prompt(&SongMetadata::new("Φως", "Νίκος", "Ροκ"));

        for key in [
            "youtubeTitles",
            "youtubeDescription",
            "youtubeHashtags",
            "facebookPost",
            "instagramCaption",
            "tiktokCaption",
            "reelsShortCaptions",
            "thumbnailIdea",
        ] {
            assert!(prompt.contains(key), "prompt is missing {}", key);
        }
        assert!(prompt.contains("array of 3 strings"));
        assert!(prompt.contains("array of 10 strings"));
        assert!(prompt.contains("array of 5 strings"));
        assert!(prompt.contains("μόνο σε JSON"));
    }

    #[test]
    fn test_prompt_is_deterministic() {
        let song = SongMetadata::new("Φως", "Νίκος", "Ροκ");
        assert_eq!(build_prompt(&song), build_prompt(&song));
        assert!(build_prompt(&song).contains("Περιγραφή: \n"));
    }
}
