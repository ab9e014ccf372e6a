//! Story generation and management endpoints.

use crate::{ApiError, AppState, validate};
use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use fabula_core::StoryChoice;
use fabula_narrative::{ChoiceContext, StoryRequest};
use serde::Deserialize;
use serde_json::json;
use std::collections::HashMap;

pub(super) async fn generate_story(
    State(state): State<AppState>,
    Json(request): Json<StoryRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate::story_request(&request)?;
    let story = state.stories.generate_story(request).await?;
    Ok(Json(json!({
        "story_id": story.id,
        "story": story,
    })))
}

pub(super) async fn get_story(
    State(state): State<AppState>,
    Path(story_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let story = state.stories.get_story(validate::story_id(&story_id)?)?;
    Ok(Json(story))
}

pub(super) async fn list_stories(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.stories.list_stories())
}

#[derive(Debug, Deserialize)]
pub(super) struct UpdateCharacterBody {
    story_id: String,
    character_name: String,
    #[serde(default)]
    updates: HashMap<String, String>,
}

pub(super) async fn update_character(
    State(state): State<AppState>,
    Json(body): Json<UpdateCharacterBody>,
) -> Result<impl IntoResponse, ApiError> {
    validate::required(&body.character_name, "character_name")?;
    let story_id = validate::story_id(&body.story_id)?;
    state
        .stories
        .update_character(story_id, &body.character_name, body.updates)
        .await?;
    Ok(Json(json!({"success": true, "message": "Character updated"})))
}

pub(super) async fn delete_story(
    State(state): State<AppState>,
    Path(story_id): Path<String>,
) -> Result<Response, ApiError> {
    let deleted = state
        .stories
        .delete_story(validate::story_id(&story_id)?)
        .await?;
    if deleted {
        Ok(Json(json!({"success": true, "message": "Story deleted"})).into_response())
    } else {
        Ok((StatusCode::NOT_FOUND, Json(json!({"error": "Story not found"}))).into_response())
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct StoryChoicesBody {
    current_scene: String,
    #[serde(default)]
    story_context: ChoiceContext,
}

/// Branching choices are best-effort: this endpoint always answers with
/// four choices, falling back to the stock set on model failure.
pub(super) async fn story_choices(
    State(state): State<AppState>,
    Json(body): Json<StoryChoicesBody>,
) -> Result<impl IntoResponse, ApiError> {
    validate::required(&body.current_scene, "Current scene")?;
    let choices = state
        .stories
        .generate_choices(&body.current_scene, &body.story_context)
        .await;
    Ok(Json(json!({"choices": choices})))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct SceneFromChoiceBody {
    story_id: String,
    choice: StoryChoice,
}

pub(super) async fn generate_scene_from_choice(
    State(state): State<AppState>,
    Json(body): Json<SceneFromChoiceBody>,
) -> Result<impl IntoResponse, ApiError> {
    let story_id = validate::story_id(&body.story_id)?;
    let outcome = state
        .stories
        .generate_scene_from_choice(story_id, &body.choice)
        .await?;
    Ok(Json(json!({
        "scene": outcome.scene,
        "is_final": outcome.is_final,
        "scenes_remaining": outcome.scenes_remaining,
    })))
}
