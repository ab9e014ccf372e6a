//! Story listing summary.

use crate::{AgeGroup, Genre, Story, StoryId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lightweight view of a story for listing endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorySummary {
    /// Story identifier.
    pub id: StoryId,
    /// Story title.
    pub title: String,
    /// Total number of planned scenes.
    pub num_scenes: u32,
    /// Number of scenes generated so far.
    pub scenes_generated: u32,
    /// Story genre.
    pub genre: Genre,
    /// Reader age bracket.
    pub age_group: AgeGroup,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl From<&Story> for StorySummary {
    fn from(story: &Story) -> Self {
        Self {
            id: story.id,
            title: story.title.clone(),
            num_scenes: story.num_scenes,
            scenes_generated: story.scenes.len() as u32,
            genre: story.genre,
            age_group: story.age_group,
            created_at: story.created_at,
        }
    }
}
