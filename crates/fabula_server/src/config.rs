//! Server configuration from the environment.

use fabula_error::{ServerError, ServerErrorKind};
use std::path::PathBuf;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 5001;
const DEFAULT_TEXT_MODEL: &str = "gemini-2.0-flash";
const DEFAULT_IMAGE_MODEL: &str = "gemini-2.5-flash-image-preview";

/// Configuration for the HTTP server and its data directories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Address to bind on.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
    /// Directory for cached story JSON files.
    pub story_dir: PathBuf,
    /// Directory for cached scene images.
    pub image_dir: PathBuf,
    /// Directory for exported documents.
    pub output_dir: PathBuf,
    /// Text generation model name.
    pub text_model: String,
    /// Image generation model name.
    pub image_model: String,
    /// Gemini API key, when configured.
    pub api_key: Option<String>,
}

impl ServerConfig {
    /// Create config from environment variables.
    ///
    /// Reads:
    /// - `FABULA_HOST` (default: "0.0.0.0")
    /// - `FABULA_PORT` (default: 5001)
    /// - `FABULA_STORY_DIR` (default: "data/stories")
    /// - `FABULA_IMAGE_DIR` (default: "data/images")
    /// - `FABULA_OUTPUT_DIR` (default: "data/output")
    /// - `FABULA_TEXT_MODEL` / `FABULA_IMAGE_MODEL` (model overrides)
    /// - `GEMINI_API_KEY` (optional here, required to serve)
    pub fn from_env() -> Result<Self, ServerError> {
        let host = std::env::var("FABULA_HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string());
        let port = match std::env::var("FABULA_PORT") {
            Ok(raw) => raw.parse().map_err(|_| {
                ServerError::new(ServerErrorKind::Configuration(format!(
                    "FABULA_PORT is not a valid port: {raw}"
                )))
            })?,
            Err(_) => DEFAULT_PORT,
        };

        let story_dir = std::env::var("FABULA_STORY_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("data/stories"));
        let image_dir = std::env::var("FABULA_IMAGE_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("data/images"));
        let output_dir = std::env::var("FABULA_OUTPUT_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("data/output"));

        let text_model =
            std::env::var("FABULA_TEXT_MODEL").unwrap_or_else(|_| DEFAULT_TEXT_MODEL.to_string());
        let image_model = std::env::var("FABULA_IMAGE_MODEL")
            .unwrap_or_else(|_| DEFAULT_IMAGE_MODEL.to_string());
        let api_key = std::env::var("GEMINI_API_KEY").ok();

        Ok(Self {
            host,
            port,
            story_dir,
            image_dir,
            output_dir,
            text_model,
            image_model,
            api_key,
        })
    }

    /// The socket address string to bind on.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
