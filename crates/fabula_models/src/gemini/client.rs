//! Gemini client implementing both model traits.
//!
//! Text generation goes through the `gemini-rust` SDK builder. Image
//! generation and image description go through the REST endpoint directly
//! because they need request fields the SDK builder does not expose (see
//! [`super::wire`]).

use std::env;
use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use gemini_rust::{Gemini, client::Model};
use tokio_retry2::strategy::{ExponentialBackoff, jitter};
use tokio_retry2::{Retry, RetryError};
use tracing::{instrument, warn};

use fabula_core::TextRequest;
use fabula_error::{FabulaResult, GeminiError, GeminiErrorKind, RetryableError};

use super::GeminiResult;
use super::wire::{GenerateContentRequest, GenerateContentResponse};
use crate::{ImageModel, ImagePayload, TextModel};

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

const DEFAULT_TEXT_MODEL: &str = "gemini-2.0-flash";
const DEFAULT_IMAGE_MODEL: &str = "gemini-2.5-flash-image-preview";

/// Client for the Google Gemini API.
///
/// # Examples
///
/// ```no_run
/// use fabula_models::{GeminiClient, TextModel};
/// use fabula_core::TextRequest;
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let client = GeminiClient::from_env()?;
/// let text = client
///     .generate_text(&TextRequest::new("Tell me a story about a fox"))
///     .await?;
/// println!("{text}");
/// # Ok(())
/// # }
/// ```
pub struct GeminiClient {
    text_client: Gemini,
    http: reqwest::Client,
    api_key: String,
    image_model: String,
    no_retry: bool,
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("image_model", &self.image_model)
            .field("no_retry", &self.no_retry)
            .finish_non_exhaustive()
    }
}

impl GeminiClient {
    /// Convert a model name string to a gemini-rust Model enum variant.
    ///
    /// Unrecognized names use `Model::Custom` with the `models/` prefix
    /// the API requires.
    fn model_name_to_enum(name: &str) -> Model {
        match name {
            "gemini-2.5-flash" => Model::Gemini25Flash,
            "gemini-2.5-flash-lite" => Model::Gemini25FlashLite,
            "gemini-2.5-pro" => Model::Gemini25Pro,
            other => {
                if other.starts_with("models/") {
                    Model::Custom(other.to_string())
                } else {
                    Model::Custom(format!("models/{other}"))
                }
            }
        }
    }

    /// Create a client from the environment.
    ///
    /// Reads the API key from `GEMINI_API_KEY`, and optional model
    /// overrides from `FABULA_TEXT_MODEL` and `FABULA_IMAGE_MODEL`.
    #[instrument(name = "gemini_client_from_env")]
    pub fn from_env() -> FabulaResult<Self> {
        let api_key = env::var("GEMINI_API_KEY")
            .map_err(|_| GeminiError::new(GeminiErrorKind::MissingApiKey))?;
        let text_model =
            env::var("FABULA_TEXT_MODEL").unwrap_or_else(|_| DEFAULT_TEXT_MODEL.to_string());
        let image_model =
            env::var("FABULA_IMAGE_MODEL").unwrap_or_else(|_| DEFAULT_IMAGE_MODEL.to_string());
        Self::new(api_key, &text_model, &image_model)
    }

    /// Create a client with explicit model names.
    pub fn new(
        api_key: impl Into<String>,
        text_model: &str,
        image_model: &str,
    ) -> FabulaResult<Self> {
        let api_key = api_key.into();
        let text_client = Gemini::with_model(&api_key, Self::model_name_to_enum(text_model))
            .map_err(|e| GeminiError::new(GeminiErrorKind::ClientCreation(e.to_string())))?;

        Ok(Self {
            text_client,
            http: reqwest::Client::new(),
            api_key,
            image_model: image_model.to_string(),
            no_retry: false,
        })
    }

    /// Disable automatic retry on transient errors.
    pub fn without_retry(mut self) -> Self {
        self.no_retry = true;
        self
    }

    /// Run an operation with error-specific exponential backoff.
    ///
    /// The first failure decides the strategy: permanent errors fail
    /// immediately, transient errors pick backoff parameters from their
    /// status code.
    async fn with_retry<T, F, Fut>(&self, mut op: F) -> GeminiResult<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = GeminiResult<T>>,
    {
        if self.no_retry {
            return op().await;
        }

        match op().await {
            Ok(value) => Ok(value),
            Err(e) if e.is_retryable() => {
                let (initial_ms, max_retries, max_delay_secs) = e.retry_strategy_params();
                warn!(
                    error = %e,
                    initial_backoff_ms = initial_ms,
                    max_retries,
                    max_delay_secs,
                    "transient Gemini error, retrying with backoff"
                );

                let strategy = ExponentialBackoff::from_millis(initial_ms)
                    .factor(2)
                    .max_delay(Duration::from_secs(max_delay_secs))
                    .map(jitter)
                    .take(max_retries);

                Retry::spawn(strategy, || {
                    let fut = op();
                    async move {
                        fut.await.map_err(|e| {
                            if e.is_retryable() {
                                warn!(error = %e, "retryable Gemini error");
                                RetryError::Transient {
                                    err: e,
                                    retry_after: None,
                                }
                            } else {
                                RetryError::Permanent(e)
                            }
                        })
                    }
                })
                .await
            }
            Err(e) => Err(e),
        }
    }

    async fn generate_text_once(&self, request: &TextRequest) -> GeminiResult<String> {
        let mut builder = self
            .text_client
            .generate_content()
            .with_user_message(&request.prompt);

        if let Some(system_prompt) = &request.system_prompt {
            builder = builder.with_system_prompt(system_prompt);
        }
        if let Some(temperature) = request.temperature {
            builder = builder.with_temperature(temperature);
        }
        if let Some(max_tokens) = request.max_tokens {
            builder = builder.with_max_output_tokens(max_tokens as i32);
        }

        let response = builder.execute().await.map_err(Self::parse_gemini_error)?;
        let text = response.text();
        if text.trim().is_empty() {
            return Err(GeminiError::new(GeminiErrorKind::EmptyResponse));
        }
        Ok(text)
    }

    async fn post_generate_content(
        &self,
        body: &GenerateContentRequest,
    ) -> GeminiResult<GenerateContentResponse> {
        let url = format!(
            "{GEMINI_API_BASE}/models/{}:generateContent",
            self.image_model
        );

        let response = self
            .http
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| GeminiError::new(GeminiErrorKind::ApiRequest(e.to_string())))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(GeminiError::new(GeminiErrorKind::HttpError {
                status_code: status.as_u16(),
                message,
            }));
        }

        response
            .json::<GenerateContentResponse>()
            .await
            .map_err(|e| GeminiError::new(GeminiErrorKind::ApiRequest(e.to_string())))
    }

    async fn generate_image_once(&self, prompt: &str) -> GeminiResult<ImagePayload> {
        let body = GenerateContentRequest::image(prompt);
        let response = self.post_generate_content(&body).await?;
        response
            .first_image()
            .ok_or_else(|| GeminiError::new(GeminiErrorKind::NoImageReturned))
    }

    async fn describe_image_once(
        &self,
        prompt: &str,
        image_bytes: &[u8],
        mime_type: &str,
    ) -> GeminiResult<String> {
        let body = GenerateContentRequest::describe(prompt, STANDARD.encode(image_bytes), mime_type);
        let response = self.post_generate_content(&body).await?;
        let text = response.text();
        if text.trim().is_empty() {
            return Err(GeminiError::new(GeminiErrorKind::EmptyResponse));
        }
        Ok(text)
    }

    /// Parse SDK errors to extract HTTP status codes.
    ///
    /// The SDK reports API failures as strings like
    /// "bad response from server; code 503; description: ...".
    fn parse_gemini_error(err: impl std::fmt::Display) -> GeminiError {
        let err_msg = err.to_string();

        if let Some(status_code) = Self::extract_status_code(&err_msg) {
            GeminiError::new(GeminiErrorKind::HttpError {
                status_code,
                message: err_msg,
            })
        } else {
            GeminiError::new(GeminiErrorKind::ApiRequest(err_msg))
        }
    }

    /// Extract an HTTP status code from an error message string.
    fn extract_status_code(error_msg: &str) -> Option<u16> {
        if let Some(code_start) = error_msg.find("code ") {
            let code_str = &error_msg[code_start + 5..];
            if let Some(end) = code_str.find(|c: char| !c.is_numeric()) {
                return code_str[..end].parse().ok();
            }
            return code_str.parse().ok();
        }
        None
    }
}

#[async_trait]
impl TextModel for GeminiClient {
    #[instrument(name = "gemini_generate_text", skip(self, request))]
    async fn generate_text(&self, request: &TextRequest) -> FabulaResult<String> {
        self.with_retry(|| self.generate_text_once(request))
            .await
            .map_err(Into::into)
    }
}

#[async_trait]
impl ImageModel for GeminiClient {
    #[instrument(name = "gemini_generate_image", skip(self, prompt))]
    async fn generate_image(&self, prompt: &str) -> FabulaResult<ImagePayload> {
        self.with_retry(|| self.generate_image_once(prompt))
            .await
            .map_err(Into::into)
    }

    #[instrument(name = "gemini_describe_image", skip_all)]
    async fn describe_image(
        &self,
        prompt: &str,
        image_bytes: &[u8],
        mime_type: &str,
    ) -> FabulaResult<String> {
        self.with_retry(|| self.describe_image_once(prompt, image_bytes, mime_type))
            .await
            .map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_status_code_from_sdk_error() {
        let msg = "bad response from server; code 503; description: overloaded";
        assert_eq!(GeminiClient::extract_status_code(msg), Some(503));
    }

    #[test]
    fn extracts_trailing_status_code() {
        assert_eq!(GeminiClient::extract_status_code("failed with code 429"), Some(429));
    }

    #[test]
    fn missing_status_code_yields_none() {
        assert_eq!(GeminiClient::extract_status_code("connection refused"), None);
    }

    #[test]
    fn custom_model_names_get_prefixed() {
        match GeminiClient::model_name_to_enum("gemini-2.0-flash") {
            Model::Custom(name) => assert_eq!(name, "models/gemini-2.0-flash"),
            other => panic!("expected Custom, got {other:?}"),
        }
        match GeminiClient::model_name_to_enum("models/foo") {
            Model::Custom(name) => assert_eq!(name, "models/foo"),
            other => panic!("expected Custom, got {other:?}"),
        }
    }
}
