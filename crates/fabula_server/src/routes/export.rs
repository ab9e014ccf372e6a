//! Document export endpoints.

use crate::{ApiError, AppState, validate};
use axum::Json;
use axum::extract::{Path, State};
use axum::response::IntoResponse;
use fabula_core::ExportFormat;
use fabula_error::{ExportError, ExportErrorKind};
use fabula_export::ExportRequest;
use serde::Deserialize;
use serde_json::json;
use std::str::FromStr;

// The image map is spelled out rather than flattening [`ExportRequest`]:
// serde's flatten buffering cannot parse the integer scene-index keys.
#[derive(Debug, Deserialize)]
pub(super) struct ExportBody {
    story_id: String,
    #[serde(default)]
    images: std::collections::BTreeMap<u32, String>,
    #[serde(default)]
    filename: Option<String>,
    #[serde(default = "default_true")]
    include_images: bool,
    #[serde(default = "default_true")]
    include_metadata: bool,
}

fn default_true() -> bool {
    true
}

pub(super) async fn export_story(
    State(state): State<AppState>,
    Path(format): Path<String>,
    Json(body): Json<ExportBody>,
) -> Result<impl IntoResponse, ApiError> {
    let format = ExportFormat::from_str(&format)
        .map_err(|_| ExportError::new(ExportErrorKind::UnsupportedFormat(format)))?;
    if let Some(filename) = &body.filename {
        validate::export_filename(filename)?;
    }

    let request = ExportRequest {
        images: body.images,
        filename: body.filename,
        include_images: body.include_images,
        include_metadata: body.include_metadata,
    };
    let story = state.stories.get_story(validate::story_id(&body.story_id)?)?;
    let filename = state.exporter.export(&story, format, &request).await?;

    Ok(Json(json!({
        "success": true,
        "file": format!("/output/{filename}"),
        "filename": filename,
    })))
}

pub(super) async fn list_exports(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(state.exporter.list()?))
}

pub(super) async fn download_export(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    super::files::attachment(&state, &filename).await
}
