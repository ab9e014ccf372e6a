//! Branching choice model.

use serde::{Deserialize, Serialize};

/// The flavor of a branching choice offered to the reader.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ChoiceKind {
    /// Continue the story along its natural course
    Original,
    /// Introduce a magical twist
    Magical,
    /// Introduce an unexpected event
    Surprise,
    /// Steer toward action and exploration
    Adventure,
}

/// One of the options presented to the reader after a scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoryChoice {
    /// Short label shown on the choice button.
    pub title: String,
    /// One-sentence description of where this choice leads.
    pub description: String,
    /// Emoji icon for the choice.
    pub icon: String,
    /// Flavor of the branch.
    #[serde(rename = "type")]
    pub kind: ChoiceKind,
    /// Optional hint at the next scene.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preview: Option<String>,
}

impl StoryChoice {
    /// The four fallback choices used when choice generation fails.
    pub fn defaults() -> Vec<Self> {
        vec![
            Self {
                title: "Continue the journey".to_string(),
                description: "See what happens next".to_string(),
                icon: "\u{27a1}\u{fe0f}".to_string(),
                kind: ChoiceKind::Original,
                preview: None,
            },
            Self {
                title: "A touch of magic".to_string(),
                description: "Something enchanted appears".to_string(),
                icon: "\u{2728}".to_string(),
                kind: ChoiceKind::Magical,
                preview: None,
            },
            Self {
                title: "A surprising turn".to_string(),
                description: "Something unexpected happens".to_string(),
                icon: "\u{1f3b2}".to_string(),
                kind: ChoiceKind::Surprise,
                preview: None,
            },
            Self {
                title: "Seek adventure".to_string(),
                description: "Explore somewhere new".to_string(),
                icon: "\u{1f5fa}\u{fe0f}".to_string(),
                kind: ChoiceKind::Adventure,
                preview: None,
            },
        ]
    }
}
