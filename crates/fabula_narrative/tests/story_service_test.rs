//! Tests for the story service with a scripted text model.

use async_trait::async_trait;
use fabula_core::{AgeGroup, ArtStyle, AspectRatio, ChoiceKind, Genre, StoryChoice, TextRequest};
use fabula_error::{FabulaResult, GeminiError, GeminiErrorKind};
use fabula_models::TextModel;
use fabula_narrative::{ChoiceContext, StoryRequest, StoryService};
use fabula_storage::StoryStore;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tempfile::TempDir;

/// Text model that replays canned responses in order.
struct ScriptedModel {
    responses: Vec<String>,
    calls: AtomicUsize,
}

impl ScriptedModel {
    fn new(responses: Vec<&str>) -> Arc<Self> {
        Arc::new(Self {
            responses: responses.into_iter().map(String::from).collect(),
            calls: AtomicUsize::new(0),
        })
    }
}

#[async_trait]
impl TextModel for ScriptedModel {
    async fn generate_text(&self, _request: &TextRequest) -> FabulaResult<String> {
        let index = self.calls.fetch_add(1, Ordering::SeqCst);
        self.responses
            .get(index)
            .cloned()
            .ok_or_else(|| GeminiError::new(GeminiErrorKind::EmptyResponse).into())
    }
}

/// Text model that always fails.
struct FailingModel;

#[async_trait]
impl TextModel for FailingModel {
    async fn generate_text(&self, _request: &TextRequest) -> FabulaResult<String> {
        Err(GeminiError::new(GeminiErrorKind::HttpError {
            status_code: 500,
            message: "boom".to_string(),
        })
        .into())
    }
}

const OPENING_RESPONSE: &str = r#"```json
{
    "title": "The Lighthouse Fox",
    "characters": [
        {
            "name": "Luna",
            "description": "A curious fox cub",
            "visual_description": "Small orange fox with a white-tipped tail",
            "role": "main"
        }
    ],
    "scenes": [
        {
            "scene_number": 1,
            "title": "The Dark Lamp",
            "text": "The lamp would not light tonight.",
            "image_prompt": "a fox beside an unlit lighthouse lamp",
            "characters_present": ["Luna"]
        },
        {
            "scene_number": 2,
            "title": "Should Not Exist",
            "text": "The model ignored instructions.",
            "image_prompt": "extra scene",
            "characters_present": []
        }
    ]
}
```"#;

const NEXT_SCENE_RESPONSE: &str = r#"{
    "scene_number": 7,
    "title": "The Climb",
    "text": "Luna climbed the spiral stairs.",
    "image_prompt": "fox climbing lighthouse stairs",
    "characters_present": ["Luna"]
}"#;

fn sample_request() -> StoryRequest {
    StoryRequest {
        prompt: "A fox who keeps a lighthouse".to_string(),
        age_group: AgeGroup::Middle,
        genre: Genre::Adventure,
        num_scenes: 2,
        art_style: ArtStyle::Watercolor,
        aspect_ratio: AspectRatio::Wide,
    }
}

fn pick(kind: ChoiceKind) -> StoryChoice {
    StoryChoice::defaults()
        .into_iter()
        .find(|c| c.kind == kind)
        .unwrap()
}

#[tokio::test]
async fn test_generate_story_keeps_only_opening_scene() {
    let temp_dir = TempDir::new().unwrap();
    let store = Arc::new(StoryStore::open(temp_dir.path()).unwrap());
    let service = StoryService::new(ScriptedModel::new(vec![OPENING_RESPONSE]), store.clone());

    let story = service.generate_story(sample_request()).await.unwrap();

    assert_eq!(story.title, "The Lighthouse Fox");
    assert_eq!(story.scenes.len(), 1);
    assert_eq!(story.scenes[0].scene_number, 1);
    assert_eq!(story.characters.len(), 1);
    assert_eq!(story.characters[0].name, "Luna");

    // Cached and persisted
    assert!(store.get(story.id).is_some());
}

#[tokio::test]
async fn test_empty_scene_list_is_an_error() {
    let temp_dir = TempDir::new().unwrap();
    let store = Arc::new(StoryStore::open(temp_dir.path()).unwrap());
    let service = StoryService::new(
        ScriptedModel::new(vec![r#"{"title": "Empty", "characters": [], "scenes": []}"#]),
        store.clone(),
    );

    assert!(service.generate_story(sample_request()).await.is_err());
    assert!(store.is_empty());
}

#[tokio::test]
async fn test_scene_from_choice_takes_next_number() {
    let temp_dir = TempDir::new().unwrap();
    let store = Arc::new(StoryStore::open(temp_dir.path()).unwrap());
    let service = StoryService::new(
        ScriptedModel::new(vec![OPENING_RESPONSE, NEXT_SCENE_RESPONSE]),
        store.clone(),
    );

    let story = service.generate_story(sample_request()).await.unwrap();
    let outcome = service
        .generate_scene_from_choice(story.id, &pick(ChoiceKind::Magical))
        .await
        .unwrap();

    // Sequential numbering wins over the model's claimed number
    assert_eq!(outcome.scene.scene_number, 2);
    assert!(outcome.is_final);
    assert_eq!(outcome.scenes_remaining, 0);

    let cached = store.get(story.id).unwrap();
    assert_eq!(cached.scenes.len(), 2);
    assert!(cached.is_complete());
}

#[tokio::test]
async fn test_completed_story_refuses_more_scenes() {
    let temp_dir = TempDir::new().unwrap();
    let store = Arc::new(StoryStore::open(temp_dir.path()).unwrap());
    let service = StoryService::new(
        ScriptedModel::new(vec![OPENING_RESPONSE, NEXT_SCENE_RESPONSE, NEXT_SCENE_RESPONSE]),
        store.clone(),
    );

    let story = service.generate_story(sample_request()).await.unwrap();
    service
        .generate_scene_from_choice(story.id, &pick(ChoiceKind::Original))
        .await
        .unwrap();

    let result = service
        .generate_scene_from_choice(story.id, &pick(ChoiceKind::Original))
        .await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_choices_fall_back_to_defaults_on_failure() {
    let temp_dir = TempDir::new().unwrap();
    let store = Arc::new(StoryStore::open(temp_dir.path()).unwrap());
    let service = StoryService::new(Arc::new(FailingModel), store);

    let choices = service
        .generate_choices("The fox paused.", &ChoiceContext::default())
        .await;

    assert_eq!(choices.len(), 4);
    assert_eq!(choices[0].kind, ChoiceKind::Original);
}

#[tokio::test]
async fn test_generated_choices_are_parsed() {
    let response = r#"[
        {"title": "Up", "description": "Climb", "icon": "⬆️", "type": "original", "preview": "up we go"},
        {"title": "Down", "description": "Descend", "icon": "⬇️", "type": "surprise"}
    ]"#;
    let temp_dir = TempDir::new().unwrap();
    let store = Arc::new(StoryStore::open(temp_dir.path()).unwrap());
    let service = StoryService::new(ScriptedModel::new(vec![response]), store);

    let choices = service
        .generate_choices("The fox paused.", &ChoiceContext::default())
        .await;

    assert_eq!(choices.len(), 2);
    assert_eq!(choices[0].title, "Up");
    assert_eq!(choices[1].kind, ChoiceKind::Surprise);
    assert!(choices[1].preview.is_none());
}

#[tokio::test]
async fn test_update_character_rejects_unknown_fields() {
    let temp_dir = TempDir::new().unwrap();
    let store = Arc::new(StoryStore::open(temp_dir.path()).unwrap());
    let service = StoryService::new(ScriptedModel::new(vec![OPENING_RESPONSE]), store.clone());

    let story = service.generate_story(sample_request()).await.unwrap();

    let ok = service
        .update_character(
            story.id,
            "Luna",
            [("visual_description".to_string(), "Orange fox, notched ear".to_string())].into(),
        )
        .await;
    assert!(ok.is_ok());
    let cached = store.get(story.id).unwrap();
    assert_eq!(
        cached.character("Luna").unwrap().visual_description,
        "Orange fox, notched ear"
    );

    let ok = service
        .update_character(
            story.id,
            "Luna",
            [("role".to_string(), "supporting".to_string())].into(),
        )
        .await;
    assert!(ok.is_ok());
    let cached = store.get(story.id).unwrap();
    assert_eq!(
        cached.character("Luna").unwrap().role,
        fabula_core::CharacterRole::Supporting
    );

    let bad = service
        .update_character(story.id, "Luna", [("name".to_string(), "Evil".to_string())].into())
        .await;
    assert!(bad.is_err());

    let bad_role = service
        .update_character(story.id, "Luna", [("role".to_string(), "villain".to_string())].into())
        .await;
    assert!(bad_role.is_err());
}
