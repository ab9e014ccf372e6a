//! Story and image persistence for the Fabula storybook service.
//!
//! Stories live in memory with a JSON file per story on disk; images are
//! PNG files in a flat cache directory. Both stores survive process
//! restarts by re-reading their directories on startup.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod image_store;
mod story_store;

pub use image_store::ImageStore;
pub use story_store::StoryStore;
