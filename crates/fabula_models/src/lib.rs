//! Model provider drivers for the Fabula storybook service.
//!
//! Defines the [`TextModel`] and [`ImageModel`] traits that narrative and
//! image services program against, plus the Google Gemini implementation
//! of both.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod driver;
pub mod gemini;
mod payload;

pub use driver::{ImageModel, TextModel};
pub use gemini::GeminiClient;
pub use payload::ImagePayload;
