//! Shared application state.

use crate::ServerConfig;
use fabula_export::StoryExporter;
use fabula_narrative::{ImageService, StoryService};
use fabula_storage::StoryStore;
use std::sync::Arc;

/// State shared by all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Story generation and management.
    pub stories: Arc<StoryService>,
    /// Scene illustration and character refinement.
    pub images: Arc<ImageService>,
    /// Document export.
    pub exporter: Arc<StoryExporter>,
    /// The story cache, for status reporting.
    pub store: Arc<StoryStore>,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
}

impl AppState {
    /// Bundle the services into shared state.
    pub fn new(
        stories: Arc<StoryService>,
        images: Arc<ImageService>,
        exporter: Arc<StoryExporter>,
        store: Arc<StoryStore>,
        config: Arc<ServerConfig>,
    ) -> Self {
        Self {
            stories,
            images,
            exporter,
            store,
            config,
        }
    }
}
