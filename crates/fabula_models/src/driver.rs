//! Provider-agnostic model traits.

use crate::ImagePayload;
use async_trait::async_trait;
use fabula_core::TextRequest;
use fabula_error::FabulaResult;

/// A text generation model.
///
/// Implementations handle transport, retry, and provider error mapping;
/// callers supply a prompt and get plain text back.
#[async_trait]
pub trait TextModel: Send + Sync {
    /// Generate text for the given request.
    async fn generate_text(&self, request: &TextRequest) -> FabulaResult<String>;
}

/// An image generation model.
#[async_trait]
pub trait ImageModel: Send + Sync {
    /// Generate an image from a prompt.
    ///
    /// The provider decides how the image comes back (inline base64,
    /// raw bytes, or a remote reference); callers normalize through
    /// [`ImagePayload`].
    async fn generate_image(&self, prompt: &str) -> FabulaResult<ImagePayload>;

    /// Describe a reference image in text, guided by a prompt.
    async fn describe_image(
        &self,
        prompt: &str,
        image_bytes: &[u8],
        mime_type: &str,
    ) -> FabulaResult<String>;
}
