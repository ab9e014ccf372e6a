//! Request validation.
//!
//! Shape and enum-value checks happen in deserialization; these checks
//! cover the value constraints that types alone cannot express. Each
//! failed check contributes one human-readable detail line.

use crate::ApiError;
use fabula_core::StoryId;
use fabula_narrative::{ImageRequest, StoryRequest};

const MIN_PROMPT_CHARS: usize = 10;
const MIN_SCENES: u32 = 3;
const MAX_SCENES: u32 = 10;
const INVALID_FILENAME_CHARS: [char; 9] = ['/', '\\', '<', '>', '|', ':', '*', '?', '"'];

pub(crate) fn story_request(request: &StoryRequest) -> Result<(), ApiError> {
    let mut details = Vec::new();
    if request.prompt.trim().chars().count() < MIN_PROMPT_CHARS {
        details.push(format!(
            "Prompt must be at least {MIN_PROMPT_CHARS} characters"
        ));
    }
    if !(MIN_SCENES..=MAX_SCENES).contains(&request.num_scenes) {
        details.push(format!(
            "Number of scenes must be between {MIN_SCENES} and {MAX_SCENES}"
        ));
    }
    fail_on(details)
}

pub(crate) fn image_request(request: &ImageRequest) -> Result<(), ApiError> {
    let mut details = Vec::new();
    if request.scene_number < 1 {
        details.push("Scene number must be at least 1".to_string());
    }
    if let Some(prompt) = &request.custom_prompt {
        if prompt.trim().chars().count() < MIN_PROMPT_CHARS {
            details.push(format!(
                "Custom prompt must be at least {MIN_PROMPT_CHARS} characters"
            ));
        }
    }
    fail_on(details)
}

pub(crate) fn export_filename(filename: &str) -> Result<(), ApiError> {
    if filename.is_empty()
        || filename.contains("..")
        || filename.contains(INVALID_FILENAME_CHARS)
    {
        return Err(ApiError::Validation(vec![format!(
            "Invalid filename: {filename}"
        )]));
    }
    Ok(())
}

pub(crate) fn required(value: &str, name: &str) -> Result<(), ApiError> {
    if value.trim().is_empty() {
        return Err(ApiError::Validation(vec![format!("{name} is required")]));
    }
    Ok(())
}

/// Parse a story id from a path or body string.
pub(crate) fn story_id(raw: &str) -> Result<StoryId, ApiError> {
    StoryId::parse(raw).map_err(|_| ApiError::Validation(vec![format!("Invalid story id: {raw}")]))
}

fn fail_on(details: Vec<String>) -> Result<(), ApiError> {
    if details.is_empty() {
        Ok(())
    } else {
        Err(ApiError::Validation(details))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(prompt: &str, num_scenes: u32) -> StoryRequest {
        serde_json::from_value(serde_json::json!({
            "prompt": prompt,
            "num_scenes": num_scenes,
        }))
        .unwrap()
    }

    #[test]
    fn short_prompts_are_rejected() {
        assert!(story_request(&request("tiny", 5)).is_err());
        assert!(story_request(&request("a fox who keeps a lighthouse", 5)).is_ok());
    }

    #[test]
    fn whitespace_does_not_count_toward_prompt_length() {
        assert!(story_request(&request("   a b   ", 5)).is_err());
    }

    #[test]
    fn scene_count_range_is_enforced() {
        assert!(story_request(&request("a fox who keeps a lighthouse", 2)).is_err());
        assert!(story_request(&request("a fox who keeps a lighthouse", 11)).is_err());
        assert!(story_request(&request("a fox who keeps a lighthouse", 3)).is_ok());
    }

    #[test]
    fn export_filenames_reject_traversal_and_reserved_chars() {
        assert!(export_filename("../escape.pdf").is_err());
        assert!(export_filename("a|b.pdf").is_err());
        assert!(export_filename("story.pdf").is_ok());
    }

    #[test]
    fn story_ids_must_be_uuids() {
        assert!(story_id("not-a-uuid").is_err());
        assert!(story_id("65ff2b24-7d6e-4fd3-8f4a-5f3f2c1f4b6f").is_ok());
    }
}
