//! Export orchestration and the output directory.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use chrono::{DateTime, Utc};
use fabula_core::{ExportFormat, ImageSource, Story};
use fabula_error::{ExportError, ExportErrorKind, FabulaResult, StorageError, StorageErrorKind};
use fabula_storage::ImageStore;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

/// Parameters for exporting a story.
#[derive(Debug, Clone, Deserialize)]
pub struct ExportRequest {
    /// Scene index (zero-based) to image location.
    #[serde(default)]
    pub images: BTreeMap<u32, String>,
    /// Output filename; generated from the story id when absent.
    #[serde(default)]
    pub filename: Option<String>,
    /// Whether to embed images.
    #[serde(default = "default_true")]
    pub include_images: bool,
    /// Whether to include export metadata (JSON format only).
    #[serde(default = "default_true")]
    pub include_metadata: bool,
}

fn default_true() -> bool {
    true
}

impl Default for ExportRequest {
    fn default() -> Self {
        Self {
            images: BTreeMap::new(),
            filename: None,
            include_images: true,
            include_metadata: true,
        }
    }
}

/// A file in the export output directory.
#[derive(Debug, Clone, Serialize)]
pub struct ExportEntry {
    /// Filename within the output directory.
    pub filename: String,
    /// File size in bytes.
    pub size: u64,
    /// Creation time.
    pub created: DateTime<Utc>,
    /// File extension without the dot.
    #[serde(rename = "type")]
    pub kind: String,
}

/// Service for exporting stories as PDF, HTML, or JSON documents.
pub struct StoryExporter {
    output_dir: PathBuf,
    images: Arc<ImageStore>,
}

impl std::fmt::Debug for StoryExporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoryExporter")
            .field("output_dir", &self.output_dir)
            .finish_non_exhaustive()
    }
}

impl StoryExporter {
    /// Create an exporter writing into `output_dir`, reading cached
    /// images from `images`.
    #[tracing::instrument(skip(output_dir, images))]
    pub fn new(output_dir: impl Into<PathBuf>, images: Arc<ImageStore>) -> FabulaResult<Self> {
        let output_dir = output_dir.into();
        std::fs::create_dir_all(&output_dir).map_err(|e| {
            StorageError::new(StorageErrorKind::DirectoryCreation(format!(
                "{}: {}",
                output_dir.display(),
                e
            )))
        })?;
        Ok(Self { output_dir, images })
    }

    /// Reject filenames that could escape the output directory.
    fn validate_filename(filename: &str) -> FabulaResult<()> {
        if filename.is_empty()
            || filename.contains('/')
            || filename.contains('\\')
            || filename.contains("..")
            || filename.contains('\0')
        {
            return Err(
                ExportError::new(ExportErrorKind::InvalidFilename(filename.to_string())).into(),
            );
        }
        Ok(())
    }

    fn output_filename(
        &self,
        story: &Story,
        format: ExportFormat,
        requested: Option<&str>,
    ) -> FabulaResult<String> {
        match requested {
            Some(name) => {
                Self::validate_filename(name)?;
                Ok(name.to_string())
            }
            None => Ok(format!(
                "story_{}_{}.{format}",
                story.id,
                Utc::now().format("%Y%m%d_%H%M%S"),
            )),
        }
    }

    /// Export a story, returning the output filename.
    #[tracing::instrument(skip(self, story, request), fields(story_id = %story.id, format = %format))]
    pub async fn export(
        &self,
        story: &Story,
        format: ExportFormat,
        request: &ExportRequest,
    ) -> FabulaResult<String> {
        let filename = self.output_filename(story, format, request.filename.as_deref())?;
        let path = self.output_dir.join(&filename);

        let bytes = match format {
            ExportFormat::Pdf => {
                let images = self.resolve_images(request).await;
                crate::pdf::render(story, &images)?
            }
            ExportFormat::Html => {
                let images = self.resolve_images(request).await;
                crate::html::render(story, &images).into_bytes()
            }
            ExportFormat::Json => self.render_json(story, request)?,
        };

        tokio::fs::write(&path, &bytes).await.map_err(|e| {
            StorageError::new(StorageErrorKind::FileWrite(format!(
                "{}: {}",
                path.display(),
                e
            )))
        })?;

        tracing::info!(filename = %filename, size = bytes.len(), "Story exported");
        Ok(filename)
    }

    /// Resolve requested images into raw bytes, keyed by scene index.
    ///
    /// Data URLs are decoded, cache filenames are read from the image
    /// store, and remote references are skipped. Unresolvable entries
    /// are dropped rather than failing the export.
    async fn resolve_images(&self, request: &ExportRequest) -> BTreeMap<u32, Vec<u8>> {
        let mut resolved = BTreeMap::new();
        if !request.include_images {
            return resolved;
        }

        for (&index, location) in &request.images {
            match self.resolve_image(location).await {
                Some(bytes) => {
                    resolved.insert(index, bytes);
                }
                None => {
                    tracing::warn!(scene_index = index, "Skipping unresolvable export image");
                }
            }
        }
        resolved
    }

    async fn resolve_image(&self, location: &str) -> Option<Vec<u8>> {
        match ImageSource::from(location.to_string()) {
            ImageSource::DataUrl(url) => {
                let encoded = url.split_once(',')?.1;
                STANDARD.decode(encoded).ok()
            }
            ImageSource::Remote(_) => None,
            ImageSource::File(name) => {
                let filename = name.strip_prefix("/images/").unwrap_or(&name);
                self.images.read(filename).await.ok()
            }
        }
    }

    fn render_json(&self, story: &Story, request: &ExportRequest) -> FabulaResult<Vec<u8>> {
        let images = if request.include_images {
            serde_json::to_value(&request.images)
                .map_err(|e| fabula_error::JsonError::new(e.to_string()))?
        } else {
            serde_json::json!({})
        };
        let metadata = if request.include_metadata {
            serde_json::json!({
                "exported_at": Utc::now().to_rfc3339(),
                "version": "1.0",
                "format": "json",
            })
        } else {
            serde_json::json!({})
        };

        let export_data = serde_json::json!({
            "story": story,
            "images": images,
            "metadata": metadata,
        });

        serde_json::to_vec_pretty(&export_data)
            .map_err(|e| fabula_error::JsonError::new(e.to_string()).into())
    }

    /// Exported files, newest first. Temp files are excluded.
    pub fn list(&self) -> FabulaResult<Vec<ExportEntry>> {
        let entries = std::fs::read_dir(&self.output_dir).map_err(|e| {
            StorageError::new(StorageErrorKind::DirectoryRead(format!(
                "{}: {}",
                self.output_dir.display(),
                e
            )))
        })?;

        let mut exports = Vec::new();
        for entry in entries.flatten() {
            let filename = entry.file_name().to_string_lossy().to_string();
            if filename.starts_with("temp_") || filename.ends_with(".tmp") {
                continue;
            }
            let Ok(metadata) = entry.metadata() else {
                continue;
            };
            if !metadata.is_file() {
                continue;
            }
            let created = metadata
                .created()
                .or_else(|_| metadata.modified())
                .map(DateTime::<Utc>::from)
                .unwrap_or_else(|_| Utc::now());
            let kind = filename
                .rsplit_once('.')
                .map(|(_, ext)| ext.to_string())
                .unwrap_or_default();

            exports.push(ExportEntry {
                filename,
                size: metadata.len(),
                created,
                kind,
            });
        }

        exports.sort_by(|a, b| b.created.cmp(&a.created));
        Ok(exports)
    }

    /// Read an exported file by name for download.
    pub async fn read(&self, filename: &str) -> FabulaResult<Vec<u8>> {
        Self::validate_filename(filename)?;
        let path = self.output_dir.join(filename);

        tokio::fs::read(&path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ExportError::new(ExportErrorKind::NotFound(filename.to_string())).into()
            } else {
                StorageError::new(StorageErrorKind::FileRead(format!(
                    "{}: {}",
                    path.display(),
                    e
                )))
                .into()
            }
        })
    }
}
