//! PDF, HTML, and JSON story export for the Fabula storybook service.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod exporter;
mod html;
mod pdf;

pub use exporter::{ExportEntry, ExportRequest, StoryExporter};
