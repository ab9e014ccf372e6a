//! Health, status, and public configuration endpoints.

use crate::{ApiError, AppState};
use axum::Json;
use axum::extract::State;
use axum::response::IntoResponse;
use fabula_core::{AgeGroup, ArtStyle, AspectRatio, Genre};
use serde_json::json;

pub(super) async fn health() -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "service": "Fabula",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

pub(super) async fn status(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let config = &state.config;
    Ok(Json(json!({
        "status": "operational",
        "api_key_configured": config.api_key.is_some(),
        "stories_cached": state.store.len(),
        "directories": {
            "stories": config.story_dir.exists(),
            "images": config.image_dir.exists(),
            "output": config.output_dir.exists(),
        },
        "file_counts": {
            "stories": count_files(&config.story_dir),
            "images": count_files(&config.image_dir),
            "exports": count_files(&config.output_dir),
        },
    })))
}

fn count_files(dir: &std::path::Path) -> usize {
    std::fs::read_dir(dir)
        .map(|entries| entries.flatten().count())
        .unwrap_or(0)
}

/// Public configuration, without secrets.
pub(super) async fn config(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "text_model": state.config.text_model,
        "image_model": state.config.image_model,
        "default_num_scenes": 5,
        "default_age_group": AgeGroup::default().to_string(),
        "default_genre": Genre::default().to_string(),
        "default_art_style": ArtStyle::default().to_string(),
        "default_aspect_ratio": AspectRatio::default().to_string(),
    }))
}
