//! Tests for the image service with stub model drivers.

use async_trait::async_trait;
use fabula_core::{AgeGroup, ArtStyle, AspectRatio, Genre, Scene, Story, StoryId};
use fabula_error::{FabulaResult, GeminiError, GeminiErrorKind};
use fabula_models::{ImageModel, ImagePayload};
use fabula_narrative::{ImageOutcome, ImageRequest, ImageService};
use fabula_storage::{ImageStore, StoryStore};
use std::sync::Arc;
use tempfile::TempDir;

/// A minimal buffer that passes PNG signature verification.
fn fake_png() -> Vec<u8> {
    let mut data = vec![0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
    data.extend_from_slice(b"payload");
    data
}

struct StubImageModel {
    payload: ImagePayload,
    description: String,
}

#[async_trait]
impl ImageModel for StubImageModel {
    async fn generate_image(&self, _prompt: &str) -> FabulaResult<ImagePayload> {
        Ok(self.payload.clone())
    }

    async fn describe_image(
        &self,
        _prompt: &str,
        _image_bytes: &[u8],
        _mime_type: &str,
    ) -> FabulaResult<String> {
        Ok(self.description.clone())
    }
}

struct FailingImageModel;

#[async_trait]
impl ImageModel for FailingImageModel {
    async fn generate_image(&self, _prompt: &str) -> FabulaResult<ImagePayload> {
        Err(GeminiError::new(GeminiErrorKind::NoImageReturned).into())
    }

    async fn describe_image(
        &self,
        _prompt: &str,
        _image_bytes: &[u8],
        _mime_type: &str,
    ) -> FabulaResult<String> {
        Err(GeminiError::new(GeminiErrorKind::EmptyResponse).into())
    }
}

async fn seed_story(store: &StoryStore, scenes: u32) -> Story {
    let mut story = Story::new(
        "The Fox",
        "a fox story",
        scenes.max(2),
        AgeGroup::Middle,
        Genre::Adventure,
        ArtStyle::Watercolor,
        AspectRatio::Wide,
    );
    story.characters.push(fabula_core::Character::new(
        "Luna",
        "a fox cub",
        "orange fox cub",
        fabula_core::CharacterRole::Main,
    ));
    for n in 1..=scenes {
        story
            .push_scene(Scene::new(
                n,
                format!("Scene {n}"),
                "text",
                "a fox",
                vec!["Luna".to_string()],
            ))
            .unwrap();
    }
    store.put(story.clone()).await.unwrap();
    story
}

fn service_with(model: Arc<dyn ImageModel>, dir: &TempDir) -> (ImageService, Arc<StoryStore>) {
    let store = Arc::new(StoryStore::open(dir.path().join("stories")).unwrap());
    let images = Arc::new(ImageStore::open(dir.path().join("images")).unwrap());
    (ImageService::new(model, store.clone(), images), store)
}

#[tokio::test]
async fn test_successful_generation_updates_scene() {
    let temp_dir = TempDir::new().unwrap();
    let model = Arc::new(StubImageModel {
        payload: ImagePayload::Bytes {
            mime_type: "image/png".to_string(),
            data: fake_png(),
        },
        description: String::new(),
    });
    let (service, store) = service_with(model, &temp_dir);
    let story = seed_story(&store, 1).await;

    let outcome = service
        .generate_scene_image(&ImageRequest {
            story_id: story.id,
            scene_number: 1,
            custom_prompt: None,
        })
        .await
        .unwrap();

    let ImageOutcome::Generated { image_url, scene_number } = outcome else {
        panic!("expected success");
    };
    assert_eq!(scene_number, 1);
    assert!(image_url.starts_with("/images/scene_"));

    let cached = store.get(story.id).unwrap();
    assert_eq!(cached.scene(1).unwrap().image_url.as_deref(), Some(image_url.as_str()));
}

#[tokio::test]
async fn test_missing_story_and_scene_are_failures_not_errors() {
    let temp_dir = TempDir::new().unwrap();
    let model = Arc::new(StubImageModel {
        payload: ImagePayload::Bytes {
            mime_type: "image/png".to_string(),
            data: fake_png(),
        },
        description: String::new(),
    });
    let (service, store) = service_with(model, &temp_dir);

    let outcome = service
        .generate_scene_image(&ImageRequest {
            story_id: StoryId::new(),
            scene_number: 1,
            custom_prompt: None,
        })
        .await
        .unwrap();
    assert_eq!(
        outcome,
        ImageOutcome::Failed {
            scene_number: 1,
            error: "Story not found".to_string()
        }
    );

    let story = seed_story(&store, 1).await;
    let outcome = service
        .generate_scene_image(&ImageRequest {
            story_id: story.id,
            scene_number: 9,
            custom_prompt: None,
        })
        .await
        .unwrap();
    assert_eq!(
        outcome,
        ImageOutcome::Failed {
            scene_number: 9,
            error: "Scene not found".to_string()
        }
    );
}

#[tokio::test]
async fn test_remote_payload_is_a_failure() {
    let temp_dir = TempDir::new().unwrap();
    let model = Arc::new(StubImageModel {
        payload: ImagePayload::Remote {
            mime_type: None,
            uri: "https://example.com/i.png".to_string(),
        },
        description: String::new(),
    });
    let (service, store) = service_with(model, &temp_dir);
    let story = seed_story(&store, 1).await;

    let outcome = service
        .generate_scene_image(&ImageRequest {
            story_id: story.id,
            scene_number: 1,
            custom_prompt: None,
        })
        .await
        .unwrap();

    assert!(!outcome.is_success());
    // The scene keeps its previous (absent) image
    assert!(store.get(story.id).unwrap().scene(1).unwrap().image_url.is_none());
}

#[tokio::test]
async fn test_regenerate_all_continues_past_failures() {
    let temp_dir = TempDir::new().unwrap();
    let (service, store) = service_with(Arc::new(FailingImageModel), &temp_dir);
    let story = seed_story(&store, 2).await;

    let results = service.regenerate_all(story.id).await.unwrap();
    assert_eq!(results.len(), 2);
    assert!(results.iter().all(|r| !r.success));
    assert_eq!(results[0].scene, 1);
    assert_eq!(results[1].scene, 2);
}

#[tokio::test]
async fn test_refine_character_stores_description() {
    let temp_dir = TempDir::new().unwrap();
    let model = Arc::new(StubImageModel {
        payload: ImagePayload::Bytes {
            mime_type: "image/png".to_string(),
            data: fake_png(),
        },
        description: "Orange fox cub with a notched left ear".to_string(),
    });
    let (service, store) = service_with(model, &temp_dir);
    let story = seed_story(&store, 1).await;

    let refined = service
        .refine_character(story.id, "Luna", &fake_png(), "image/png")
        .await
        .unwrap();
    assert!(refined.contains("notched"));

    let cached = store.get(story.id).unwrap();
    assert_eq!(
        cached.character("Luna").unwrap().refined_description.as_deref(),
        Some("Orange fox cub with a notched left ear")
    );

    // Unknown character is a hard error
    assert!(
        service
            .refine_character(story.id, "Nobody", &fake_png(), "image/png")
            .await
            .is_err()
    );
}
