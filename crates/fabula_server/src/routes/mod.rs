//! Route table and handlers.

use crate::AppState;
use axum::Router;
use axum::routing::{delete, get, post, put};

mod export;
mod files;
mod health;
mod image;
mod story;

/// Build the full API router over shared state.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health::health))
        .route("/api/status", get(health::status))
        .route("/api/config", get(health::config))
        .route("/api/generate-story", post(story::generate_story))
        .route("/api/get-story/:story_id", get(story::get_story))
        .route("/api/stories", get(story::list_stories))
        .route("/api/update-character", put(story::update_character))
        .route("/api/delete-story/:story_id", delete(story::delete_story))
        .route("/api/story-choices", post(story::story_choices))
        .route(
            "/api/generate-scene-from-choice",
            post(story::generate_scene_from_choice),
        )
        .route(
            "/api/generate-scene-image",
            post(image::generate_scene_image),
        )
        .route("/api/refine-character", post(image::refine_character))
        .route(
            "/api/regenerate-all-images/:story_id",
            post(image::regenerate_all_images),
        )
        .route("/api/export/list", get(export::list_exports))
        .route("/api/export/download/:filename", get(export::download_export))
        .route("/api/export/:format", post(export::export_story))
        .route("/images/:filename", get(files::serve_image))
        .route("/output/:filename", get(files::serve_export))
        .with_state(state)
}
