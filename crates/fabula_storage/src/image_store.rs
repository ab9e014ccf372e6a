//! Flat PNG cache for generated scene illustrations.

use chrono::Utc;
use fabula_core::StoryId;
use fabula_error::{FabulaResult, StorageError, StorageErrorKind};
use std::path::PathBuf;

/// First eight bytes of every PNG file.
const PNG_SIGNATURE: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

/// Image cache: one PNG file per generated illustration, named by story,
/// scene number, and timestamp so regenerated images never overwrite
/// their predecessors.
pub struct ImageStore {
    dir: PathBuf,
}

impl std::fmt::Debug for ImageStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageStore").field("dir", &self.dir).finish()
    }
}

impl ImageStore {
    /// Open an image cache rooted at `dir`, creating the directory if
    /// needed.
    #[tracing::instrument(skip(dir))]
    pub fn open(dir: impl Into<PathBuf>) -> FabulaResult<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir).map_err(|e| {
            StorageError::new(StorageErrorKind::DirectoryCreation(format!(
                "{}: {}",
                dir.display(),
                e
            )))
        })?;
        tracing::info!(path = %dir.display(), "Opened image cache");
        Ok(Self { dir })
    }

    /// Reject filenames that could escape the cache directory.
    fn validate_filename(filename: &str) -> FabulaResult<()> {
        if filename.is_empty()
            || filename.contains('/')
            || filename.contains('\\')
            || filename.contains("..")
        {
            return Err(
                StorageError::new(StorageErrorKind::InvalidPath(filename.to_string())).into(),
            );
        }
        Ok(())
    }

    /// Store a scene illustration, returning the cache filename.
    ///
    /// The write is verified by re-reading the PNG signature; a file
    /// that does not start with the PNG magic bytes is removed and the
    /// store reports [`StorageErrorKind::VerificationFailed`].
    #[tracing::instrument(skip(self, data), fields(story_id = %story_id, scene_number, size = data.len()))]
    pub async fn store_scene_image(
        &self,
        story_id: StoryId,
        scene_number: u32,
        data: &[u8],
    ) -> FabulaResult<String> {
        let timestamp = Utc::now().format("%Y%m%d_%H%M%S");
        let filename = format!("scene_{story_id}_{scene_number}_{timestamp}.png");
        let path = self.dir.join(&filename);

        let temp_path = path.with_extension("tmp");
        tokio::fs::write(&temp_path, data).await.map_err(|e| {
            StorageError::new(StorageErrorKind::FileWrite(format!(
                "{}: {}",
                temp_path.display(),
                e
            )))
        })?;
        tokio::fs::rename(&temp_path, &path).await.map_err(|e| {
            StorageError::new(StorageErrorKind::FileWrite(format!(
                "rename {} to {}: {}",
                temp_path.display(),
                path.display(),
                e
            )))
        })?;

        let written = tokio::fs::read(&path).await.map_err(|e| {
            StorageError::new(StorageErrorKind::FileRead(format!(
                "{}: {}",
                path.display(),
                e
            )))
        })?;
        if written.len() < PNG_SIGNATURE.len() || written[..8] != PNG_SIGNATURE {
            let _ = tokio::fs::remove_file(&path).await;
            return Err(StorageError::new(StorageErrorKind::VerificationFailed(format!(
                "{} is not a PNG",
                filename
            )))
            .into());
        }

        tracing::info!(path = %path.display(), "Stored scene image");
        Ok(filename)
    }

    /// Read a cached image by filename.
    #[tracing::instrument(skip(self))]
    pub async fn read(&self, filename: &str) -> FabulaResult<Vec<u8>> {
        Self::validate_filename(filename)?;
        let path = self.dir.join(filename);

        tokio::fs::read(&path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                StorageError::new(StorageErrorKind::NotFound(filename.to_string())).into()
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

    /// Whether a cached image exists.
    pub async fn exists(&self, filename: &str) -> bool {
        if Self::validate_filename(filename).is_err() {
            return false;
        }
        tokio::fs::try_exists(self.dir.join(filename))
            .await
            .unwrap_or(false)
    }
}
