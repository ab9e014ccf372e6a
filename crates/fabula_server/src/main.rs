//! Fabula storybook service entry point.

use fabula_error::{FabulaResult, ServerError, ServerErrorKind};
use fabula_export::StoryExporter;
use fabula_models::GeminiClient;
use fabula_narrative::{ImageService, StoryService};
use fabula_server::{AppState, ServerConfig, router};
use fabula_storage::{ImageStore, StoryStore};
use std::sync::Arc;

#[tokio::main]
async fn main() -> FabulaResult<()> {
    dotenvy::dotenv().ok();
    fabula_core::init_telemetry();

    let config = ServerConfig::from_env()?;
    let api_key = config.api_key.clone().ok_or_else(|| {
        ServerError::new(ServerErrorKind::Configuration(
            "GEMINI_API_KEY not set".into(),
        ))
    })?;

    let client = Arc::new(GeminiClient::new(
        api_key,
        &config.text_model,
        &config.image_model,
    )?);
    let store = Arc::new(StoryStore::open(config.story_dir.clone())?);
    let images = Arc::new(ImageStore::open(config.image_dir.clone())?);
    let exporter = Arc::new(StoryExporter::new(
        config.output_dir.clone(),
        images.clone(),
    )?);

    let stories = Arc::new(StoryService::new(client.clone(), store.clone()));
    let image_service = Arc::new(ImageService::new(client, store.clone(), images));

    let addr = config.addr();
    let state = AppState::new(stories, image_service, exporter, store, Arc::new(config));

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| ServerError::new(ServerErrorKind::Serve(format!("{addr}: {e}"))))?;
    tracing::info!(%addr, "Fabula server listening");

    axum::serve(listener, router(state))
        .await
        .map_err(|e| ServerError::new(ServerErrorKind::Serve(e.to_string())))?;
    Ok(())
}
