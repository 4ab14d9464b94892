//! Genre-keyed phrasing, emoji and hashtag table used by the fallback synthesizer.

use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Template bundle for one music genre
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenreStyle {
    /// Sentence appended to the YouTube description
    pub description: &'static str,
    /// Genre-specific hashtags mixed into the YouTube tags
    pub tags: &'static [&'static str],
    /// Closing line of the Facebook post
    pub social_post: &'static str,
    /// Mood line of the Instagram caption
    pub instagram_style: &'static str,
    pub emoji: &'static str,
    pub emoji2: &'static str,
    /// Short caption fragments; the first and third are completions of a lead-in
    pub short_captions: [&'static str; 3],
    /// Thumbnail description with `{artist}` and `{title}` placeholders
    pub thumbnail_idea: &'static str,
}

pub static DEFAULT_STYLE: GenreStyle = GenreStyle {
    description: "Ένα μοναδικό μουσικό ταξίδι που θα σας συνεπάρει!",
    tags: &["#NewRelease", "#MusicLovers"],
    social_post: "Μοιραστείτε το με τους φίλους σας!",
    instagram_style: "Μια μελωδία που θα σας ταξιδέψει...",
    emoji: "🎵",
    emoji2: "✨",
    short_captions: [
        "η νέα μου αγαπημένη μελωδία 🎵",
        "Αυτό το τραγούδι μου μιλάει διαφορετικά ✨",
        "θα σε συνεπάρει 💫",
    ],
    thumbnail_idea: "Μια ατμοσφαιρική εικόνα που απεικονίζει τον/την {artist} σε μοντέρνο περιβάλλον με έντονα χρώματα. Ο τίτλος \"{title}\" εμφανίζεται με μοντέρνα γραμματοσειρά.",
};

static GENRE_STYLES: Lazy<HashMap<&'static str, GenreStyle>> = Lazy::new(|| {
    let mut styles = HashMap::new();

    styles.insert(
        "μπαλάντα",
        GenreStyle {
            description: "Μια συναισθηματική μπαλάντα που αγγίζει την καρδιά και την ψυχή.",
            tags: &["#Ballad", "#EmotionalSong", "#GreekBallad", "#Συναίσθημα"],
            social_post: "Ένα τραγούδι για τις στιγμές που αφήνεσαι στο συναίσθημα...",
            instagram_style: "Κάθε νότα, κάθε λέξη, αγγίζει μια διαφορετική χορδή συναισθημάτων...",
            emoji: "💔",
            emoji2: "🕯️",
            short_captions: [
                "αγγίζει την ψυχή μου 💔",
                "Όταν τα λόγια δεν αρκούν, αφήνεις τη μουσική να μιλήσει 🎹",
                "φέρνει δάκρυα στα μάτια ✨",
            ],
            thumbnail_idea: "Μια δραματική, συναισθηματική εικόνα του/της {artist} με απαλό, μπλε φωτισμό και σκιές. Ο τίτλος \"{title}\" εμφανίζεται με κομψή, καλλιγραφική γραμματοσειρά.",
        },
    );

    styles.insert(
        "ροκ",
        GenreStyle {
            description: "Ένα δυναμικό ροκ κομμάτι με έντονα riffs και παθιασμένους στίχους.",
            tags: &["#RockMusic", "#GreekRock", "#RockNRoll", "#LiveLoud", "#ΕλληνικήΡοκ"],
            social_post: "Δυναμώστε την ένταση και αφεθείτε στον ήχο!",
            instagram_style: "Rock n Roll δεν είναι μόνο μουσική, είναι στάση ζωής! 🤘",
            emoji: "🤘",
            emoji2: "🔥",
            short_captions: [
                "δίνει ενέργεια στη μέρα μου 🤘",
                "Όταν η μουσική σε κάνει να θες να σπάσεις την κιθάρα σου 🎸",
                "θα σε κάνει να headbang 🔥",
            ],
            thumbnail_idea: "Μια δυναμική εικόνα του/της {artist} σε σκηνή με έντονο κόκκινο και μαύρο φωτισμό, ενδεχομένως με μια κιθάρα. Ο τίτλος \"{title}\" εμφανίζεται με έντονα, σπασμένα γράμματα σε στυλ graffiti.",
        },
    );

    styles.insert(
        "λαϊκό",
        GenreStyle {
            description: "Ένα αυθεντικό λαϊκό τραγούδι που αντηχεί την ελληνική ψυχή και παράδοση.",
            tags: &["#GreekFolk", "#LaikiMusic", "#ΕλληνικόΛαϊκό", "#Ζεϊμπέκικο", "#Χασάπικο"],
            social_post: "Ένα τραγούδι που σε κάνει να θες να σηκωθείς για χορό!",
            instagram_style: "Η λαϊκή μουσική είναι η καρδιά και η ψυχή της Ελλάδας μας...",
            emoji: "🇬🇷",
            emoji2: "💃",
            short_captions: [
                "με κάνει να θέλω να χορέψω 💃",
                "Στο τραπέζι με φίλους, με μουσική που μιλάει στην ψυχή μας 🍷",
                "έχει την αυθεντική ελληνική ψυχή 🇬🇷",
            ],
            thumbnail_idea: "Μια ζεστή εικόνα του/της {artist} σε παραδοσιακό ελληνικό περιβάλλον, ίσως σε ταβέρνα ή με παραδοσιακά μουσικά όργανα. Ο τίτλος \"{title}\" εμφανίζεται με παραδοσιακή, χειροποίητη γραμματοσειρά.",
        },
    );

    styles.insert(
        "ποπ",
        GenreStyle {
            description: "Ένα φρέσκο, σύγχρονο ποπ κομμάτι με ρυθμούς που κολλάνε στο μυαλό.",
            tags: &["#PopMusic", "#GreekPop", "#FreshHit", "#ΕλληνικήΠοπ", "#PopHit"],
            social_post: "Το νέο hit που θα σας κάνει να χορεύετε όλο το καλοκαίρι!",
            instagram_style: "Catchy μελωδίες και στίχοι που δεν μπορείς να σταματήσεις να τραγουδάς!",
            emoji: "💃",
            emoji2: "✌️",
            short_captions: [
                "δεν βγαίνει από το μυαλό μου 🎧",
                "Όταν βρίσκεις το soundtrack του καλοκαιριού σου 🌞",
                "είναι το επόμενο hit 🎯",
            ],
            thumbnail_idea: "Μια φωτεινή, χρωματιστή εικόνα του/της {artist} με μοντέρνο, νεανικό στυλ. Ίσως με έντονα νέον χρώματα ή σε αστικό περιβάλλον. Ο τίτλος \"{title}\" εμφανίζεται με μοντέρνα, pop art γραμματοσειρά.",
        },
    );

    styles
});

/// Style for `genre` by case-insensitive exact match, or the default style.
///
/// No trimming, substring or fuzzy matching is applied.
pub fn style_for_genre(genre: &str) -> &'static GenreStyle {
    GENRE_STYLES
        .get(genre.to_lowercase().as_str())
        .unwrap_or(&DEFAULT_STYLE)
}

/// Genres with a dedicated style, in no particular order
pub fn known_genres() -> Vec<&'static str> {
    GENRE_STYLES.keys().copied().collect()
}
