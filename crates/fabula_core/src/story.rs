//! Story model.

use crate::{AgeGroup, ArtStyle, AspectRatio, Character, Genre, Scene};
use chrono::{DateTime, Utc};
use fabula_error::{NarrativeError, NarrativeErrorKind};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Opaque story identifier.
///
/// Serializes as a bare UUID string so it can be used directly in URLs
/// and cache filenames.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct StoryId(Uuid);

impl StoryId {
    /// Generate a fresh random id.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse an id from its string form.
    pub fn parse(s: &str) -> Result<Self, uuid::Error> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

impl Default for StoryId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for StoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A generated story: metadata, characters, and an ordered list of scenes.
///
/// Scenes are appended one at a time as the reader makes choices; scene
/// numbers are strictly sequential starting at 1.
///
/// # Examples
///
/// ```
/// use fabula_core::{AgeGroup, ArtStyle, AspectRatio, Genre, Scene, Story};
///
/// let mut story = Story::new(
///     "The Lighthouse Fox",
///     "A fox who keeps a lighthouse",
///     5,
///     AgeGroup::Middle,
///     Genre::Adventure,
///     ArtStyle::Watercolor,
///     AspectRatio::Wide,
/// );
/// assert_eq!(story.next_scene_number(), 1);
///
/// story
///     .push_scene(Scene::new(1, "Dusk", "The lamp would not light.", "fox at lamp", vec![]))
///     .unwrap();
/// assert_eq!(story.remaining_scenes(), 4);
/// assert!(!story.is_complete());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Story {
    /// Unique story identifier.
    pub id: StoryId,
    /// Story title.
    pub title: String,
    /// The prompt the story was generated from.
    pub prompt: String,
    /// Total number of scenes the story will have when complete.
    pub num_scenes: u32,
    /// Reader age bracket.
    #[serde(default)]
    pub age_group: AgeGroup,
    /// Story genre.
    #[serde(default)]
    pub genre: Genre,
    /// Illustration art style.
    #[serde(default)]
    pub art_style: ArtStyle,
    /// Illustration aspect ratio.
    #[serde(default)]
    pub aspect_ratio: AspectRatio,
    /// Characters appearing in the story.
    #[serde(default)]
    pub characters: Vec<Character>,
    /// Scenes generated so far, in order.
    #[serde(default)]
    pub scenes: Vec<Scene>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl Story {
    /// Create an empty story shell with a fresh id.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        title: impl Into<String>,
        prompt: impl Into<String>,
        num_scenes: u32,
        age_group: AgeGroup,
        genre: Genre,
        art_style: ArtStyle,
        aspect_ratio: AspectRatio,
    ) -> Self {
        Self {
            id: StoryId::new(),
            title: title.into(),
            prompt: prompt.into(),
            num_scenes,
            age_group,
            genre,
            art_style,
            aspect_ratio,
            characters: Vec::new(),
            scenes: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// The number the next scene must carry.
    pub fn next_scene_number(&self) -> u32 {
        self.scenes.len() as u32 + 1
    }

    /// Whether all planned scenes have been generated.
    pub fn is_complete(&self) -> bool {
        self.scenes.len() as u32 >= self.num_scenes
    }

    /// How many scenes remain before the story is complete.
    pub fn remaining_scenes(&self) -> u32 {
        self.num_scenes.saturating_sub(self.scenes.len() as u32)
    }

    /// Append a scene, enforcing sequential numbering and the scene budget.
    pub fn push_scene(&mut self, scene: Scene) -> Result<(), NarrativeError> {
        if self.is_complete() {
            return Err(NarrativeError::new(NarrativeErrorKind::SceneBudgetExhausted(
                self.num_scenes,
            )));
        }
        let expected = self.next_scene_number();
        if scene.scene_number != expected {
            return Err(NarrativeError::new(NarrativeErrorKind::NonSequentialScene {
                expected,
                got: scene.scene_number,
            }));
        }
        self.scenes.push(scene);
        Ok(())
    }

    /// Look up a scene by number.
    pub fn scene(&self, scene_number: u32) -> Option<&Scene> {
        self.scenes.iter().find(|s| s.scene_number == scene_number)
    }

    /// Mutable scene lookup by number.
    pub fn scene_mut(&mut self, scene_number: u32) -> Option<&mut Scene> {
        self.scenes
            .iter_mut()
            .find(|s| s.scene_number == scene_number)
    }

    /// Look up a character by name.
    pub fn character(&self, name: &str) -> Option<&Character> {
        self.characters.iter().find(|c| c.name == name)
    }

    /// Mutable character lookup by name.
    pub fn character_mut(&mut self, name: &str) -> Option<&mut Character> {
        self.characters.iter_mut().find(|c| c.name == name)
    }
}
