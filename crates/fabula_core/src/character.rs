//! Character model.

use crate::CharacterRole;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A named entity with a visual description used to keep illustrations
/// consistent across scenes.
///
/// # Examples
///
/// ```
/// use fabula_core::{Character, CharacterRole};
///
/// let mut luna = Character::new(
///     "Luna",
///     "A curious fox cub",
///     "Small orange fox with oversized ears and a white-tipped tail",
///     CharacterRole::Main,
/// );
/// assert_eq!(luna.effective_description(), luna.visual_description);
///
/// luna.refined_description = Some("Orange fox cub, left ear notched".to_string());
/// assert!(luna.effective_description().contains("notched"));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Character {
    /// Unique identifier assigned at creation.
    pub character_id: Uuid,
    /// Character name, unique within a story.
    pub name: String,
    /// Narrative description of the character.
    pub description: String,
    /// Visual description used in image prompts.
    pub visual_description: String,
    /// Visual description rewritten from a reference image, when available.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refined_description: Option<String>,
    /// Narrative role.
    #[serde(default)]
    pub role: CharacterRole,
}

impl Character {
    /// Create a character with a fresh id and no refined description.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        visual_description: impl Into<String>,
        role: CharacterRole,
    ) -> Self {
        Self {
            character_id: Uuid::new_v4(),
            name: name.into(),
            description: description.into(),
            visual_description: visual_description.into(),
            refined_description: None,
            role,
        }
    }

    /// The description image prompts should use: the refined description
    /// when one exists, otherwise the original visual description.
    pub fn effective_description(&self) -> &str {
        self.refined_description
            .as_deref()
            .unwrap_or(&self.visual_description)
    }
}
