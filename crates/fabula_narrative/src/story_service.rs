//! Story generation and management.

use crate::draft::{SceneDraft, StoryDraft};
use crate::{extract_json, parse_json, prompts};
use fabula_core::{
    AgeGroup, ArtStyle, AspectRatio, Genre, Scene, Story, StoryChoice, StoryId, StorySummary,
    TextRequest,
};
use fabula_error::{FabulaResult, NarrativeError, NarrativeErrorKind};
use fabula_models::TextModel;
use fabula_storage::StoryStore;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

/// Parameters for generating a new story.
#[derive(Debug, Clone, Deserialize)]
pub struct StoryRequest {
    /// The story prompt.
    pub prompt: String,
    /// Reader age bracket.
    #[serde(default)]
    pub age_group: AgeGroup,
    /// Story genre.
    #[serde(default)]
    pub genre: Genre,
    /// Total number of scenes the story will have.
    #[serde(default = "default_num_scenes")]
    pub num_scenes: u32,
    /// Illustration art style.
    #[serde(default)]
    pub art_style: ArtStyle,
    /// Illustration aspect ratio.
    #[serde(default)]
    pub aspect_ratio: AspectRatio,
}

fn default_num_scenes() -> u32 {
    5
}

/// Context for choice generation, carried by the client between calls.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChoiceContext {
    /// Story genre.
    #[serde(default)]
    pub genre: Genre,
    /// Reader age bracket.
    #[serde(default)]
    pub age_group: AgeGroup,
}

/// A freshly generated scene plus pacing information for the client.
#[derive(Debug, Clone, Serialize)]
pub struct SceneOutcome {
    /// The new scene.
    pub scene: Scene,
    /// Whether this scene completes the story.
    pub is_final: bool,
    /// Scenes left after this one.
    pub scenes_remaining: u32,
}

/// Service for story generation and management.
///
/// Stories start with a single opening scene; every further scene is
/// generated from a reader choice, keeping numbering sequential and the
/// total capped at the planned scene count.
pub struct StoryService {
    model: Arc<dyn TextModel>,
    store: Arc<StoryStore>,
}

impl std::fmt::Debug for StoryService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoryService").finish_non_exhaustive()
    }
}

impl StoryService {
    /// Create a service over a text model and story store.
    pub fn new(model: Arc<dyn TextModel>, store: Arc<StoryStore>) -> Self {
        Self { model, store }
    }

    /// Generate the opening of a new story and cache it.
    ///
    /// The model is asked for exactly one scene; anything extra it
    /// returns is dropped. An output with no scenes at all is an error.
    #[tracing::instrument(skip(self, request), fields(num_scenes = request.num_scenes))]
    pub async fn generate_story(&self, request: StoryRequest) -> FabulaResult<Story> {
        tracing::info!(
            prompt_preview = %request.prompt.chars().take(50).collect::<String>(),
            "Generating story"
        );

        let system_prompt = prompts::initial_story(
            &request.age_group.to_string(),
            &request.genre.to_string(),
            request.num_scenes,
        );
        let text_request = TextRequest::new(format!("Story prompt: {}", request.prompt))
            .with_system_prompt(system_prompt);

        let response = self.model.generate_text(&text_request).await?;
        let draft: StoryDraft = parse_json(&extract_json(&response)?)?;

        if draft.scenes.is_empty() {
            return Err(NarrativeError::new(NarrativeErrorKind::InvalidStoryData(
                "model returned no scenes".to_string(),
            ))
            .into());
        }

        let mut story = Story::new(
            draft.title,
            request.prompt,
            request.num_scenes,
            request.age_group,
            request.genre,
            request.art_style,
            request.aspect_ratio,
        );
        story.characters = draft
            .characters
            .into_iter()
            .map(|c| c.into_character())
            .collect();

        // Only the opening scene, whatever the model produced
        let mut scenes = draft.scenes;
        scenes.truncate(1);
        let opening = scenes.remove(0).into_scene(1);
        story.push_scene(opening)?;

        self.store.put(story.clone()).await?;
        tracing::info!(story_id = %story.id, title = %story.title, "Story created");
        Ok(story)
    }

    /// Fetch a story by id.
    pub fn get_story(&self, id: StoryId) -> FabulaResult<Story> {
        self.store
            .get(id)
            .ok_or_else(|| NarrativeError::new(NarrativeErrorKind::StoryNotFound(id.to_string())).into())
    }

    /// Summaries of all cached stories.
    pub fn list_stories(&self) -> Vec<StorySummary> {
        self.store.list()
    }

    /// Delete a story. Returns whether it existed.
    pub async fn delete_story(&self, id: StoryId) -> FabulaResult<bool> {
        self.store.delete(id).await
    }

    /// Generate four branching choices for what happens next.
    ///
    /// Choice generation is best-effort: if the model call or parsing
    /// fails, the four stock choices come back instead so the reader is
    /// never left without a path forward.
    #[tracing::instrument(skip(self, current_scene, context))]
    pub async fn generate_choices(
        &self,
        current_scene: &str,
        context: &ChoiceContext,
    ) -> Vec<StoryChoice> {
        let prompt = prompts::story_choices(
            current_scene,
            &context.genre.to_string(),
            &context.age_group.to_string(),
        );
        let text_request =
            TextRequest::new(prompt).with_system_prompt("Generate story branching choices");

        match self.generate_choices_inner(&text_request).await {
            Ok(choices) if !choices.is_empty() => choices,
            Ok(_) => {
                tracing::warn!("Model returned no choices, using defaults");
                StoryChoice::defaults()
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to generate choices, using defaults");
                StoryChoice::defaults()
            }
        }
    }

    async fn generate_choices_inner(
        &self,
        request: &TextRequest,
    ) -> FabulaResult<Vec<StoryChoice>> {
        let response = self.model.generate_text(request).await?;
        parse_json(&extract_json(&response)?)
    }

    /// Generate the next scene of a story from a reader choice.
    ///
    /// The new scene always takes the next sequential number; generation
    /// past the planned scene count is refused.
    #[tracing::instrument(skip(self, choice), fields(story_id = %story_id, choice_title = %choice.title))]
    pub async fn generate_scene_from_choice(
        &self,
        story_id: StoryId,
        choice: &StoryChoice,
    ) -> FabulaResult<SceneOutcome> {
        let mut story = self.get_story(story_id)?;

        if story.is_complete() {
            return Err(NarrativeError::new(NarrativeErrorKind::SceneBudgetExhausted(
                story.num_scenes,
            ))
            .into());
        }

        let scene_number = story.next_scene_number();
        let remaining_before = story.remaining_scenes();

        let prompt = prompts::next_scene(&story, choice);
        let text_request = TextRequest::new(prompt)
            .with_system_prompt("Generate the next story scene dynamically based on reader choice");

        let response = self.model.generate_text(&text_request).await?;
        let draft: SceneDraft = parse_json(&extract_json(&response)?)?;
        let scene = draft.into_scene(scene_number);

        story.push_scene(scene.clone())?;
        self.store.put(story).await?;

        tracing::info!(scene_number, "Scene added");
        Ok(SceneOutcome {
            scene,
            is_final: remaining_before == 1,
            scenes_remaining: remaining_before - 1,
        })
    }

    /// Update character fields by name.
    ///
    /// Only `description`, `visual_description`, `refined_description`,
    /// and `role` can be updated; anything else is rejected rather than
    /// silently ignored.
    #[tracing::instrument(skip(self, updates), fields(story_id = %story_id, character = %character_name))]
    pub async fn update_character(
        &self,
        story_id: StoryId,
        character_name: &str,
        updates: HashMap<String, String>,
    ) -> FabulaResult<()> {
        let mut story = self.get_story(story_id)?;

        let character = story.character_mut(character_name).ok_or_else(|| {
            NarrativeError::new(NarrativeErrorKind::CharacterNotFound {
                story_id: story_id.to_string(),
                name: character_name.to_string(),
            })
        })?;

        for (field, value) in updates {
            match field.as_str() {
                "description" => character.description = value,
                "visual_description" => character.visual_description = value,
                "refined_description" => character.refined_description = Some(value),
                "role" => {
                    character.role = value.parse().map_err(|_| {
                        NarrativeError::new(NarrativeErrorKind::InvalidUpdateField(format!(
                            "role: {value}"
                        )))
                    })?;
                }
                other => {
                    return Err(NarrativeError::new(NarrativeErrorKind::InvalidUpdateField(
                        other.to_string(),
                    ))
                    .into());
                }
            }
        }

        self.store.put(story).await?;
        Ok(())
    }
}
