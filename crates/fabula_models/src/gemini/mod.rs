//! Google Gemini API implementation.

mod client;
mod wire;

pub use client::GeminiClient;

/// Result type for Gemini-internal operations.
pub(crate) type GeminiResult<T> = std::result::Result<T, fabula_error::GeminiError>;
