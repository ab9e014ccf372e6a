//! In-memory story cache backed by one JSON file per story.

use fabula_core::{Story, StoryId, StorySummary};
use fabula_error::{FabulaResult, JsonError, StorageError, StorageErrorKind};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

/// Story store: a write-through in-memory map with a JSON file per story.
///
/// All reads are served from memory; every mutation is persisted before
/// it is visible. On startup the cache directory is scanned and each
/// story file is loaded back; files that fail to parse are skipped with
/// a warning so one corrupt entry cannot take the service down.
///
/// # Examples
///
/// ```no_run
/// use fabula_storage::StoryStore;
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let store = StoryStore::open("./story_cache")?;
/// println!("{} stories loaded", store.len());
/// # Ok(())
/// # }
/// ```
pub struct StoryStore {
    stories: RwLock<HashMap<StoryId, Story>>,
    // Serializes persist-then-insert so memory and disk cannot settle
    // on different versions of one story.
    write_gate: tokio::sync::Mutex<()>,
    dir: PathBuf,
}

impl std::fmt::Debug for StoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoryStore")
            .field("dir", &self.dir)
            .field("stories", &self.len())
            .finish()
    }
}

impl StoryStore {
    /// Open a store rooted at `dir`, creating the directory and loading
    /// any existing story files.
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

        let stories = Self::load_all(&dir)?;
        tracing::info!(
            path = %dir.display(),
            stories = stories.len(),
            "Opened story store"
        );

        Ok(Self {
            stories: RwLock::new(stories),
            write_gate: tokio::sync::Mutex::new(()),
            dir,
        })
    }

    /// Read every `.json` file in `dir`, skipping entries that fail to
    /// parse.
    fn load_all(dir: &Path) -> FabulaResult<HashMap<StoryId, Story>> {
        let mut stories = HashMap::new();

        let entries = std::fs::read_dir(dir).map_err(|e| {
            StorageError::new(StorageErrorKind::DirectoryRead(format!(
                "{}: {}",
                dir.display(),
                e
            )))
        })?;

        for entry in entries {
            let entry = entry.map_err(|e| {
                StorageError::new(StorageErrorKind::DirectoryRead(format!(
                    "{}: {}",
                    dir.display(),
                    e
                )))
            })?;
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }

            match Self::load_one(&path) {
                Ok(story) => {
                    stories.insert(story.id, story);
                }
                Err(e) => {
                    tracing::warn!(
                        path = %path.display(),
                        error = %e,
                        "Skipping unreadable story file"
                    );
                }
            }
        }

        Ok(stories)
    }

    fn load_one(path: &Path) -> FabulaResult<Story> {
        let data = std::fs::read_to_string(path).map_err(|e| {
            StorageError::new(StorageErrorKind::FileRead(format!(
                "{}: {}",
                path.display(),
                e
            )))
        })?;
        let story: Story =
            serde_json::from_str(&data).map_err(|e| JsonError::new(e.to_string()))?;
        Ok(story)
    }

    fn story_path(&self, id: StoryId) -> PathBuf {
        self.dir.join(format!("{id}.json"))
    }

    /// Number of stories in the cache.
    pub fn len(&self) -> usize {
        self.stories.read().expect("story lock poisoned").len()
    }

    /// Whether the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Insert or replace a story, persisting it to disk first.
    ///
    /// The file write goes through a temp file and rename so a crash
    /// mid-write cannot leave a truncated story file. Writes are
    /// serialized by a mutex held across both the persist and the cache
    /// insert, so the file and the cache always hold the same version.
    #[tracing::instrument(skip(self, story), fields(story_id = %story.id))]
    pub async fn put(&self, story: Story) -> FabulaResult<()> {
        let path = self.story_path(story.id);
        let json = serde_json::to_string_pretty(&story)
            .map_err(|e| JsonError::new(e.to_string()))?;

        let _gate = self.write_gate.lock().await;
        let temp_path = self.dir.join(format!("{}.tmp", story.id));
        tokio::fs::write(&temp_path, &json).await.map_err(|e| {
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

        self.stories
            .write()
            .expect("story lock poisoned")
            .insert(story.id, story);

        tracing::debug!(path = %path.display(), "Persisted story");
        Ok(())
    }

    /// Fetch a story by id.
    pub fn get(&self, id: StoryId) -> Option<Story> {
        self.stories
            .read()
            .expect("story lock poisoned")
            .get(&id)
            .cloned()
    }

    /// Summaries of all cached stories, newest first.
    pub fn list(&self) -> Vec<StorySummary> {
        let mut summaries: Vec<StorySummary> = self
            .stories
            .read()
            .expect("story lock poisoned")
            .values()
            .map(StorySummary::from)
            .collect();
        summaries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        summaries
    }

    /// Remove a story from memory and disk.
    ///
    /// Returns `true` if the story existed. A missing file is not an
    /// error when the in-memory entry was present.
    #[tracing::instrument(skip(self), fields(story_id = %id))]
    pub async fn delete(&self, id: StoryId) -> FabulaResult<bool> {
        let _gate = self.write_gate.lock().await;
        let existed = self
            .stories
            .write()
            .expect("story lock poisoned")
            .remove(&id)
            .is_some();

        let path = self.story_path(id);
        match tokio::fs::remove_file(&path).await {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                return Err(StorageError::new(StorageErrorKind::FileWrite(format!(
                    "delete {}: {}",
                    path.display(),
                    e
                )))
                .into());
            }
        }

        if existed {
            tracing::info!("Deleted story");
        }
        Ok(existed)
    }
}
