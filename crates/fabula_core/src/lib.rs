//! Core data types for the Fabula storybook service.
//!
//! This crate provides the story data model and the enumerated generation
//! parameters shared across all Fabula crates.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod character;
mod choice;
mod image;
mod params;
mod request;
mod scene;
mod story;
mod summary;
mod telemetry;

pub use character::Character;
pub use choice::{ChoiceKind, StoryChoice};
pub use image::ImageSource;
pub use params::{AgeGroup, ArtStyle, AspectRatio, CharacterRole, ExportFormat, Genre};
pub use request::TextRequest;
pub use scene::Scene;
pub use story::{Story, StoryId};
pub use summary::StorySummary;
pub use telemetry::init_telemetry;
