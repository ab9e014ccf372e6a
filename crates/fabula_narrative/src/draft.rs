//! Model output shapes.
//!
//! These mirror the JSON structures the prompts in [`crate::prompts`] ask
//! for. They are lenient where model output drifts: missing lists default
//! to empty, and scene text may arrive under `text` or `content`.

use fabula_core::{Character, CharacterRole, Scene};
use serde::Deserialize;
use std::str::FromStr;

#[derive(Debug, Deserialize)]
pub(crate) struct StoryDraft {
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default)]
    pub characters: Vec<CharacterDraft>,
    #[serde(default)]
    pub scenes: Vec<SceneDraft>,
}

fn default_title() -> String {
    "Untitled Story".to_string()
}

#[derive(Debug, Deserialize)]
pub(crate) struct CharacterDraft {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub visual_description: String,
    #[serde(default)]
    pub role: Option<String>,
}

impl CharacterDraft {
    pub fn into_character(self) -> Character {
        // Models sometimes answer "main/supporting" with extra words
        let role = self
            .role
            .as_deref()
            .and_then(|r| CharacterRole::from_str(r.trim().to_lowercase().as_str()).ok())
            .unwrap_or_default();
        Character::new(self.name, self.description, self.visual_description, role)
    }
}

// The model also emits a scene_number; it is deliberately absent here
// so the caller's sequential number is the only one in play.
#[derive(Debug, Deserialize)]
pub(crate) struct SceneDraft {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub image_prompt: String,
    #[serde(default)]
    pub characters_present: Vec<String>,
}

impl SceneDraft {
    /// Build a [`Scene`] carrying `scene_number`.
    pub fn into_scene(self, scene_number: u32) -> Scene {
        let text = self.text.or(self.content).unwrap_or_default();
        Scene::new(
            scene_number,
            self.title,
            text,
            self.image_prompt,
            self.characters_present,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scene_text_falls_back_to_content() {
        let draft: SceneDraft =
            serde_json::from_str(r#"{"title": "T", "content": "from content"}"#).unwrap();
        let scene = draft.into_scene(3);
        assert_eq!(scene.text, "from content");
        assert_eq!(scene.scene_number, 3);
    }

    #[test]
    fn model_scene_number_is_ignored() {
        let draft: SceneDraft =
            serde_json::from_str(r#"{"scene_number": 99, "title": "T", "text": "x"}"#).unwrap();
        assert_eq!(draft.into_scene(2).scene_number, 2);
    }

    #[test]
    fn unknown_role_defaults_to_supporting() {
        let draft: CharacterDraft =
            serde_json::from_str(r#"{"name": "Luna", "role": "protagonist"}"#).unwrap();
        assert_eq!(draft.into_character().role, CharacterRole::Supporting);
    }

    #[test]
    fn main_role_is_recognized() {
        let draft: CharacterDraft =
            serde_json::from_str(r#"{"name": "Luna", "role": "Main"}"#).unwrap();
        assert_eq!(draft.into_character().role, CharacterRole::Main);
    }
}
