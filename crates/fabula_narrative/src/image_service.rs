//! Scene illustration and character refinement.

use crate::prompts;
use fabula_core::StoryId;
use fabula_error::{FabulaResult, NarrativeError, NarrativeErrorKind};
use fabula_models::ImageModel;
use fabula_storage::{ImageStore, StoryStore};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Parameters for illustrating a single scene.
#[derive(Debug, Clone, Deserialize)]
pub struct ImageRequest {
    /// Story to illustrate.
    pub story_id: StoryId,
    /// Scene number within the story.
    pub scene_number: u32,
    /// Replaces the built prompt entirely when present.
    #[serde(default)]
    pub custom_prompt: Option<String>,
}

/// Result of one illustration attempt.
///
/// Image generation failures are data, not errors: a scene without an
/// illustration is still a valid scene, and batch regeneration keeps
/// going past individual failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageOutcome {
    /// The scene now has an illustration at `image_url`.
    Generated {
        /// URL path under which the image is served.
        image_url: String,
        /// The illustrated scene.
        scene_number: u32,
    },
    /// The attempt failed; the scene is unchanged.
    Failed {
        /// The scene that was being illustrated.
        scene_number: u32,
        /// Human-readable failure reason.
        error: String,
    },
}

impl ImageOutcome {
    /// Whether the attempt produced an image.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Generated { .. })
    }
}

/// One entry in a batch regeneration report.
#[derive(Debug, Clone, Serialize)]
pub struct SceneImageResult {
    /// Scene number.
    pub scene: u32,
    /// Whether this scene got a new image.
    pub success: bool,
    /// URL of the new image, when successful.
    pub image_url: Option<String>,
}

impl From<&ImageOutcome> for SceneImageResult {
    fn from(outcome: &ImageOutcome) -> Self {
        match outcome {
            ImageOutcome::Generated {
                image_url,
                scene_number,
            } => Self {
                scene: *scene_number,
                success: true,
                image_url: Some(image_url.clone()),
            },
            ImageOutcome::Failed { scene_number, .. } => Self {
                scene: *scene_number,
                success: false,
                image_url: None,
            },
        }
    }
}

/// Service for scene illustration and character refinement.
pub struct ImageService {
    image_model: Arc<dyn ImageModel>,
    store: Arc<StoryStore>,
    images: Arc<ImageStore>,
}

impl std::fmt::Debug for ImageService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageService").finish_non_exhaustive()
    }
}

impl ImageService {
    /// Create a service over the image model and stores.
    pub fn new(
        image_model: Arc<dyn ImageModel>,
        store: Arc<StoryStore>,
        images: Arc<ImageStore>,
    ) -> Self {
        Self {
            image_model,
            store,
            images,
        }
    }

    /// Illustrate one scene and record the image URL on the story.
    ///
    /// Lookup failures and generation failures both come back as
    /// [`ImageOutcome::Failed`]; only storage-level faults while
    /// persisting the updated story are hard errors.
    #[tracing::instrument(skip(self, request), fields(story_id = %request.story_id, scene_number = request.scene_number))]
    pub async fn generate_scene_image(&self, request: &ImageRequest) -> FabulaResult<ImageOutcome> {
        let Some(mut story) = self.store.get(request.story_id) else {
            return Ok(ImageOutcome::Failed {
                scene_number: request.scene_number,
                error: "Story not found".to_string(),
            });
        };

        let Some(scene) = story.scene(request.scene_number) else {
            return Ok(ImageOutcome::Failed {
                scene_number: request.scene_number,
                error: "Scene not found".to_string(),
            });
        };

        let prompt = match &request.custom_prompt {
            Some(custom) => custom.clone(),
            None => prompts::scene_image(&story, scene),
        };

        let filename = match self.generate_and_store(&prompt, request).await {
            Ok(filename) => filename,
            Err(e) => {
                tracing::error!(error = %e, "Image generation failed");
                return Ok(ImageOutcome::Failed {
                    scene_number: request.scene_number,
                    error: e.to_string(),
                });
            }
        };

        let image_url = format!("/images/{filename}");
        if let Some(scene) = story.scene_mut(request.scene_number) {
            scene.image_url = Some(image_url.clone());
        }
        self.store.put(story).await?;

        Ok(ImageOutcome::Generated {
            image_url,
            scene_number: request.scene_number,
        })
    }

    async fn generate_and_store(
        &self,
        prompt: &str,
        request: &ImageRequest,
    ) -> FabulaResult<String> {
        let payload = self.image_model.generate_image(prompt).await?;
        let (_mime, bytes) = payload.into_bytes()?;
        self.images
            .store_scene_image(request.story_id, request.scene_number, &bytes)
            .await
    }

    /// Regenerate illustrations for every scene of a story.
    ///
    /// Scenes are processed in order; a failure on one scene does not
    /// stop the rest.
    #[tracing::instrument(skip(self), fields(story_id = %story_id))]
    pub async fn regenerate_all(&self, story_id: StoryId) -> FabulaResult<Vec<SceneImageResult>> {
        let story = self.store.get(story_id).ok_or_else(|| {
            NarrativeError::new(NarrativeErrorKind::StoryNotFound(story_id.to_string()))
        })?;

        let mut results = Vec::with_capacity(story.scenes.len());
        for scene in &story.scenes {
            let request = ImageRequest {
                story_id,
                scene_number: scene.scene_number,
                custom_prompt: None,
            };
            let outcome = self.generate_scene_image(&request).await?;
            results.push(SceneImageResult::from(&outcome));
        }
        Ok(results)
    }

    /// Rewrite a character's visual description from a reference image.
    ///
    /// The refined description is stored on the character and used in
    /// place of the original for all later image prompts.
    #[tracing::instrument(skip(self, image_bytes), fields(story_id = %story_id, character = %character_name))]
    pub async fn refine_character(
        &self,
        story_id: StoryId,
        character_name: &str,
        image_bytes: &[u8],
        mime_type: &str,
    ) -> FabulaResult<String> {
        let mut story = self.store.get(story_id).ok_or_else(|| {
            NarrativeError::new(NarrativeErrorKind::StoryNotFound(story_id.to_string()))
        })?;

        let character = story.character(character_name).ok_or_else(|| {
            NarrativeError::new(NarrativeErrorKind::CharacterNotFound {
                story_id: story_id.to_string(),
                name: character_name.to_string(),
            })
        })?;

        let prompt = prompts::refine_character(&character.name, &character.visual_description);
        let refined = self
            .image_model
            .describe_image(&prompt, image_bytes, mime_type)
            .await?;

        if let Some(character) = story.character_mut(character_name) {
            character.refined_description = Some(refined.clone());
        }
        self.store.put(story).await?;

        tracing::info!("Character refined");
        Ok(refined)
    }

    /// Read a cached image by filename.
    pub async fn read_image(&self, filename: &str) -> FabulaResult<Vec<u8>> {
        self.images.read(filename).await
    }
}
