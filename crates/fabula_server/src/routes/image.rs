//! Scene illustration endpoints.

use crate::{ApiError, AppState, validate};
use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use fabula_narrative::{ImageOutcome, ImageRequest};
use serde::Deserialize;
use serde_json::json;

pub(super) async fn generate_scene_image(
    State(state): State<AppState>,
    Json(request): Json<ImageRequest>,
) -> Result<Response, ApiError> {
    validate::image_request(&request)?;
    match state.images.generate_scene_image(&request).await? {
        ImageOutcome::Generated {
            image_url,
            scene_number,
        } => Ok(Json(json!({
            "success": true,
            "image_url": image_url,
            "scene_number": scene_number,
        }))
        .into_response()),
        ImageOutcome::Failed { error, .. } => {
            Ok((StatusCode::BAD_REQUEST, Json(json!({"error": error}))).into_response())
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct RefineCharacterBody {
    story_id: String,
    character_name: String,
    /// A cached image URL (`/images/<filename>`) or bare filename.
    image_path: String,
}

pub(super) async fn refine_character(
    State(state): State<AppState>,
    Json(body): Json<RefineCharacterBody>,
) -> Result<impl IntoResponse, ApiError> {
    validate::required(&body.character_name, "character_name")?;
    validate::required(&body.image_path, "image_path")?;
    let story_id = validate::story_id(&body.story_id)?;

    let filename = body
        .image_path
        .strip_prefix("/images/")
        .unwrap_or(&body.image_path);
    let image_bytes = state.images.read_image(filename).await?;

    state
        .images
        .refine_character(story_id, &body.character_name, &image_bytes, "image/png")
        .await?;

    Ok(Json(json!({
        "success": true,
        "message": "Character refined successfully",
    })))
}

pub(super) async fn regenerate_all_images(
    State(state): State<AppState>,
    Path(story_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let results = state
        .images
        .regenerate_all(validate::story_id(&story_id)?)
        .await?;
    Ok(Json(json!({"success": true, "results": results})))
}
