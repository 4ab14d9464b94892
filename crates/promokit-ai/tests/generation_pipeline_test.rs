use async_trait::async_trait;
use promokit_ai::{
    FallbackSynthesizer, GenerationConfig, GenerationStage, HuggingFaceConfig,
    HuggingFaceProvider, OpenAIChatConfig, OpenAIChatProvider, ParseTier, PromotionKitGenerator,
    ProviderResult, TextCompletionProvider, TransportFailure,
};
use promokit_core::{
    KitHistory, KitProvenance, LLMConfig, PromoKitError, ProviderKind, SongMetadata,
};
use secrecy::SecretString;
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const YEAR: i32 = 2026;

/// Provider returning a canned reply and counting calls
struct ScriptedProvider {
    reply: Result<String, fn() -> TransportFailure>,
    calls: AtomicUsize,
}

impl ScriptedProvider {
    fn replying(text: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            reply: Ok(text.into()),
            calls: AtomicUsize::new(0),
        })
    }

    fn failing(failure: fn() -> TransportFailure) -> Arc<Self> {
        Arc::new(Self {
            reply: Err(failure),
            calls: AtomicUsize::new(0),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TextCompletionProvider for ScriptedProvider {
    async fn send(&self, _prompt: &str, _config: &GenerationConfig) -> ProviderResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.reply {
            Ok(text) => Ok(text.clone()),
            Err(failure) => Err(failure()),
        }
    }

    fn generation_config(&self) -> GenerationConfig {
        GenerationConfig::default()
    }

    fn kind(&self) -> ProviderKind {
        ProviderKind::OpenAI
    }

    fn provider_name(&self) -> &str {
        "scripted"
    }

    fn model_name(&self) -> &str {
        "scripted-model"
    }

    fn has_credential(&self) -> bool {
        true
    }
}

fn rock_song() -> SongMetadata {
    SongMetadata::new("Φως", "Νίκος", "Ροκ")
}

fn generator(provider: Arc<dyn TextCompletionProvider>) -> PromotionKitGenerator {
    PromotionKitGenerator::with_year(provider, YEAR)
}

fn seven_key_response() -> serde_json::Value {
    json!({
        "youtubeTitles": ["Τίτλος 1", "Τίτλος 2", "Τίτλος 3"],
        "youtubeDescription": "Περιγραφή",
        "youtubeHashtags": ["#a", "#b", "#c", "#d", "#e", "#f", "#g", "#h", "#i", "#j"],
        "facebookPost": "Facebook post",
        "instagramCaption": "Instagram caption",
        "tiktokCaption": "TikTok caption",
        "reelsShortCaptions": ["r1", "r2", "r3", "r4", "r5"]
    })
}

#[tokio::test]
async fn test_full_json_response_is_used_exactly() {
    let mut response = seven_key_response();
    response["thumbnailIdea"] = json!("Backend thumbnail");
    let provider = ScriptedProvider::replying(response.to_string());

    let generated = generator(provider.clone()).generate(&rock_song()).await.unwrap();

    assert_eq!(provider.calls(), 1);
    assert_eq!(generated.provenance, KitProvenance::Backend);
    assert_eq!(generated.parse_tier, Some(ParseTier::Direct));
    assert_eq!(generated.kit.youtube_title, vec!["Τίτλος 1", "Τίτλος 2", "Τίτλος 3"]);
    assert_eq!(generated.kit.youtube_tags[9], "#j");
    assert_eq!(generated.kit.thumbnail_idea, "Backend thumbnail");
    assert!(generated.fallback_keys.is_empty());
    assert_eq!(
        generated.stages,
        vec![
            GenerationStage::Idle,
            GenerationStage::Building,
            GenerationStage::Calling,
            GenerationStage::Succeeded,
            GenerationStage::Normalizing,
            GenerationStage::Assembled,
        ]
    );
}

#[tokio::test]
async fn test_fenced_response_missing_one_key_is_merged() {
    let raw = format!("```json\n{}\n```", seven_key_response());
    let provider = ScriptedProvider::replying(raw);

    let generated = generator(provider).generate(&rock_song()).await.unwrap();
    let fallback = FallbackSynthesizer::for_year(YEAR).synthesize(&rock_song());

    assert_eq!(generated.provenance, KitProvenance::Merged);
    assert_eq!(generated.parse_tier, Some(ParseTier::Fenced));
    assert_eq!(generated.fallback_keys, vec!["thumbnailIdea".to_string()]);
    assert_eq!(generated.kit.thumbnail_idea, fallback.thumbnail_idea);
    assert_eq!(generated.kit.youtube_description, "Περιγραφή");
    assert_eq!(generated.kit.facebook_post, "Facebook post");
    assert_eq!(generated.kit.instagram_caption, "Instagram caption");
    assert_eq!(generated.kit.tiktok_caption, "TikTok caption");
    assert_eq!(generated.kit.reels_short_captions, vec!["r1", "r2", "r3", "r4", "r5"]);
}

#[tokio::test]
async fn test_text_without_json_equals_fallback() {
    let provider = ScriptedProvider::replying("I'm sorry, I cannot help with that.");

    let generated = generator(provider).generate(&rock_song()).await.unwrap();

    assert_eq!(generated.provenance, KitProvenance::Fallback);
    assert_eq!(generated.parse_tier, None);
    assert_eq!(generated.fallback_keys.len(), 8);
    assert!(generated.fallback_keys.contains(&"youtubeTitles".to_string()));
    assert_eq!(
        generated.kit,
        FallbackSynthesizer::for_year(YEAR).synthesize(&rock_song())
    );
    assert_eq!(generated.stages.last(), Some(&GenerationStage::Assembled));
}

#[tokio::test]
async fn test_transport_failure_takes_fallback_path() {
    let provider = ScriptedProvider::failing(|| TransportFailure::QuotaExceeded("quota".into()));

    let generated = generator(provider.clone()).generate(&rock_song()).await.unwrap();

    assert_eq!(provider.calls(), 1);
    assert_eq!(generated.provenance, KitProvenance::Fallback);
    assert!(generated.kit.is_complete());
    assert_eq!(
        generated.stages,
        vec![
            GenerationStage::Idle,
            GenerationStage::Building,
            GenerationStage::Calling,
            GenerationStage::Failed,
            GenerationStage::FallbackOnly,
            GenerationStage::Assembled,
        ]
    );
}

#[tokio::test]
async fn test_invalid_metadata_is_rejected_before_calling() {
    let provider = ScriptedProvider::replying("{}");
    let song = SongMetadata::new("Φως", " ", "Ροκ");

    let err = generator(provider.clone()).generate(&song).await.unwrap_err();

    assert!(matches!(err, PromoKitError::Validation(_)));
    assert_eq!(provider.calls(), 0);
}

#[tokio::test]
async fn test_rock_fallback_kit_carries_genre_style() {
    let provider = ScriptedProvider::failing(|| TransportFailure::Network("down".into()));

    let kit = generator(provider).generate(&rock_song()).await.unwrap().kit;

    let captions = kit.reels_short_captions.join(" ");
    assert!(captions.contains("🤘"));
    assert!(captions.contains("🔥"));
    assert!(kit.youtube_tags.contains(&"#RockMusic".to_string()));
    assert!(kit.youtube_tags.contains(&"#GreekRock".to_string()));
}

#[tokio::test]
async fn test_missing_credential_makes_no_call_and_returns_fallback() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let provider = OpenAIChatProvider::new(OpenAIChatConfig {
        api_key: None,
        base_url: server.uri(),
        ..Default::default()
    })
    .unwrap();

    let generated = generator(Arc::new(provider)).generate(&rock_song()).await.unwrap();

    assert_eq!(generated.provenance, KitProvenance::Fallback);
    assert_eq!(generated.provider, ProviderKind::OpenAI);
    assert_eq!(
        generated.kit,
        FallbackSynthesizer::for_year(YEAR).synthesize(&rock_song())
    );
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_raw_backend_prose_around_json_is_parsed() {
    let server = MockServer::start().await;
    let mut response = seven_key_response();
    response["thumbnailIdea"] = json!("Σκοτεινή σκηνή");
    let generated_text = format!("Ορίστε το περιεχόμενο: {} Καλή επιτυχία!", response);

    Mock::given(method("POST"))
        .and(path("/models/bigscience/bloom-7b1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([{ "generated_text": generated_text }])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let provider = HuggingFaceProvider::new(HuggingFaceConfig {
        api_key: Some(SecretString::from("hf-test")),
        base_url: format!("{}/models", server.uri()),
        ..Default::default()
    })
    .unwrap();

    let generated = generator(Arc::new(provider)).generate(&rock_song()).await.unwrap();

    assert_eq!(generated.provenance, KitProvenance::Backend);
    assert_eq!(generated.parse_tier, Some(ParseTier::BraceSpan));
    assert_eq!(generated.provider, ProviderKind::HuggingFace);
    assert_eq!(generated.kit.thumbnail_idea, "Σκοτεινή σκηνή");
}

#[tokio::test]
async fn test_generated_kits_feed_history() {
    let provider = ScriptedProvider::failing(|| TransportFailure::EmptyResponse);
    let kit_generator = generator(provider);
    let mut history = KitHistory::with_limit(2);

    for title in ["Ένα", "Δύο", "Τρία"] {
        let song = SongMetadata::new(title, "Νίκος", "Ποπ");
        let generated = kit_generator.generate(&song).await.unwrap();
        history.record(generated.to_saved_kit(&song));
    }

    assert_eq!(history.len(), 2);
    let latest = history.latest().unwrap();
    assert_eq!(latest.form_data.title, "Τρία");
    assert_eq!(latest.provider_used, ProviderKind::OpenAI);
    assert!(latest.kit_data.is_complete());
}

#[tokio::test]
async fn test_configured_generator_serves_concurrent_requests() {
    let kit_generator = Arc::new(PromotionKitGenerator::from_config(&LLMConfig::default()).unwrap());

    assert_eq!(kit_generator.provider().kind(), ProviderKind::HuggingFace);
    assert_eq!(kit_generator.provider().model_name(), "bigscience/bloom-7b1");
    assert!(!kit_generator.provider().has_credential());

    let rock = rock_song();
    let pop = SongMetadata::new("Καλοκαίρι", "Μαρία", "Ποπ");
    let (first, second) = tokio::join!(
        {
            let kit_generator = Arc::clone(&kit_generator);
            let song = rock.clone();
            async move { kit_generator.generate(&song).await }
        },
        {
            let kit_generator = Arc::clone(&kit_generator);
            let song = pop.clone();
            async move { kit_generator.generate(&song).await }
        }
    );
    let (first, second) = (first.unwrap(), second.unwrap());

    for (generated, song) in [(&first, &rock), (&second, &pop)] {
        assert_eq!(generated.provenance, KitProvenance::Fallback);
        assert_eq!(generated.provider, ProviderKind::HuggingFace);
        assert!(generated.kit.is_complete());
        assert_eq!(generated.kit, FallbackSynthesizer::current().synthesize(song));
    }
    assert_ne!(first.kit, second.kit);
    assert!(first.kit.youtube_title[0].contains("Φως"));
    assert!(second.kit.youtube_title[0].contains("Καλοκαίρι"));
}
