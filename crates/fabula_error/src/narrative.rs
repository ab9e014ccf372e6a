//! Narrative error types.

/// Specific error conditions for story operations.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum NarrativeErrorKind {
    /// Story not found in the store
    #[display("Story not found: {}", _0)]
    StoryNotFound(String),
    /// Character not found within a story
    #[display("Character '{}' not found in story {}", name, story_id)]
    CharacterNotFound {
        /// Story identifier
        story_id: String,
        /// Character name
        name: String,
    },
    /// Model output did not match the expected story structure
    #[display("Invalid story data: {}", _0)]
    InvalidStoryData(String),
    /// Scene number breaks the sequential numbering invariant
    #[display("Non-sequential scene number: expected {}, got {}", expected, got)]
    NonSequentialScene {
        /// The next valid scene number
        expected: u32,
        /// The number that was supplied
        got: u32,
    },
    /// All planned scenes have already been generated
    #[display("Story already has all {} planned scenes", _0)]
    SceneBudgetExhausted(u32),
    /// Character update referenced a field that cannot be updated
    #[display("Invalid update field: {}", _0)]
    InvalidUpdateField(String),
}

/// Error type for story operations.
///
/// # Examples
///
/// ```
/// use fabula_error::{NarrativeError, NarrativeErrorKind};
///
/// let err = NarrativeError::new(NarrativeErrorKind::StoryNotFound("abc".to_string()));
/// assert!(format!("{}", err).contains("not found"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Narrative Error: {} at line {} in {}", kind, line, file)]
pub struct NarrativeError {
    /// The specific error condition
    pub kind: NarrativeErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl NarrativeError {
    /// Create a new NarrativeError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: NarrativeErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
