//! Scene model.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single illustrated page of a story.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    /// Unique identifier assigned at creation.
    pub scene_id: Uuid,
    /// One-based position of the scene within its story.
    pub scene_number: u32,
    /// Short scene title.
    pub title: String,
    /// Narrative text of the scene.
    pub text: String,
    /// Prompt used to illustrate this scene.
    pub image_prompt: String,
    /// Names of characters appearing in the scene.
    #[serde(default)]
    pub characters_present: Vec<String>,
    /// Location of a generated illustration, when one exists.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl Scene {
    /// Create a scene with a fresh id and no illustration.
    pub fn new(
        scene_number: u32,
        title: impl Into<String>,
        text: impl Into<String>,
        image_prompt: impl Into<String>,
        characters_present: Vec<String>,
    ) -> Self {
        Self {
            scene_id: Uuid::new_v4(),
            scene_number,
            title: title.into(),
            text: text.into(),
            image_prompt: image_prompt.into(),
            characters_present,
            image_url: None,
        }
    }

    /// Whether an illustration has been generated for this scene.
    pub fn has_image(&self) -> bool {
        self.image_url.is_some()
    }
}
