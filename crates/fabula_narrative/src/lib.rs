//! Story and illustration generation for the Fabula storybook service.
//!
//! [`StoryService`] turns prompts into stories one scene at a time,
//! steering each continuation by a reader choice. [`ImageService`]
//! illustrates scenes and refines character descriptions from reference
//! images. Both persist through [`fabula_storage`].

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod draft;
mod extraction;
mod image_service;
mod prompts;
mod story_service;

pub use extraction::{extract_json, parse_json};
pub use image_service::{ImageOutcome, ImageRequest, ImageService, SceneImageResult};
pub use story_service::{ChoiceContext, SceneOutcome, StoryRequest, StoryService};
