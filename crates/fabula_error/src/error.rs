//! Top-level error wrapper types.

use crate::{
    ConfigError, ExportError, GeminiError, JsonError, NarrativeError, ServerError, StorageError,
};

/// The foundation error enum. Each Fabula crate contributes a variant for
/// its own error wrapper type.
///
/// # Examples
///
/// ```
/// use fabula_error::{FabulaError, ConfigError};
///
/// let cfg_err = ConfigError::new("port out of range");
/// let err: FabulaError = cfg_err.into();
/// assert!(format!("{}", err).contains("Configuration Error"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum FabulaErrorKind {
    /// JSON serialization/deserialization error
    #[from(JsonError)]
    Json(JsonError),
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
    /// Gemini provider error
    #[from(GeminiError)]
    Gemini(GeminiError),
    /// Story or image storage error
    #[from(StorageError)]
    Storage(StorageError),
    /// Story generation error
    #[from(NarrativeError)]
    Narrative(NarrativeError),
    /// Document export error
    #[from(ExportError)]
    Export(ExportError),
    /// HTTP server error
    #[from(ServerError)]
    Server(ServerError),
}

/// Fabula error with kind discrimination.
///
/// # Examples
///
/// ```
/// use fabula_error::{FabulaResult, ConfigError};
///
/// fn might_fail() -> FabulaResult<()> {
///     Err(ConfigError::new("Missing field"))?
/// }
///
/// match might_fail() {
///     Ok(_) => println!("Success"),
///     Err(e) => println!("Error: {}", e),
/// }
/// ```
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Fabula Error: {}", _0)]
pub struct FabulaError(Box<FabulaErrorKind>);

impl FabulaError {
    /// Create a new error from a kind.
    pub fn new(kind: FabulaErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &FabulaErrorKind {
        &self.0
    }
}

// Generic From implementation for any type that converts to FabulaErrorKind
impl<T> From<T> for FabulaError
where
    T: Into<FabulaErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for Fabula operations.
///
/// # Examples
///
/// ```
/// use fabula_error::{FabulaResult, JsonError};
///
/// fn parse_payload() -> FabulaResult<String> {
///     Err(JsonError::new("trailing characters"))?
/// }
/// ```
pub type FabulaResult<T> = std::result::Result<T, FabulaError>;
