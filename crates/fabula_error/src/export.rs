//! Export error types.

/// Kinds of export errors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum ExportErrorKind {
    /// Requested format has no renderer
    #[display("Unsupported export format: {}", _0)]
    UnsupportedFormat(String),
    /// Embedded image could not be decoded
    #[display("Failed to decode image: {}", _0)]
    ImageDecode(String),
    /// PDF assembly failed
    #[display("PDF rendering failed: {}", _0)]
    PdfRender(String),
    /// Requested export file does not exist
    #[display("Export not found: {}", _0)]
    NotFound(String),
    /// Export filename contains forbidden characters
    #[display("Invalid export filename: {}", _0)]
    InvalidFilename(String),
}

/// Export error with location tracking.
///
/// # Examples
///
/// ```
/// use fabula_error::{ExportError, ExportErrorKind};
///
/// let err = ExportError::new(ExportErrorKind::UnsupportedFormat("epub".to_string()));
/// assert!(format!("{}", err).contains("epub"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Export Error: {} at line {} in {}", kind, line, file)]
pub struct ExportError {
    /// The kind of error that occurred
    pub kind: ExportErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl ExportError {
    /// Create a new export error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: ExportErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
