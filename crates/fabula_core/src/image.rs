//! Image location classification.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Where a scene illustration lives.
///
/// Stored URLs come in three shapes: inline `data:` URLs, remote HTTP
/// URLs, and bare cache filenames. Classification happens once at the
/// string boundary so downstream code can match instead of re-testing
/// prefixes.
///
/// # Examples
///
/// ```
/// use fabula_core::ImageSource;
///
/// let source = ImageSource::from("scene_abc_1_20260101_120000.png".to_string());
/// assert!(matches!(source, ImageSource::File(_)));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ImageSource {
    /// Base64-encoded image inlined as a `data:` URL.
    DataUrl(String),
    /// Image hosted at a remote HTTP(S) URL.
    Remote(String),
    /// Filename within the local image cache.
    File(String),
}

impl ImageSource {
    /// The underlying URL or filename string.
    pub fn as_str(&self) -> &str {
        match self {
            Self::DataUrl(s) | Self::Remote(s) | Self::File(s) => s,
        }
    }
}

impl From<String> for ImageSource {
    fn from(s: String) -> Self {
        if s.starts_with("data:") {
            Self::DataUrl(s)
        } else if s.starts_with("http://") || s.starts_with("https://") {
            Self::Remote(s)
        } else {
            Self::File(s)
        }
    }
}

impl From<ImageSource> for String {
    fn from(source: ImageSource) -> Self {
        match source {
            ImageSource::DataUrl(s) | ImageSource::Remote(s) | ImageSource::File(s) => s,
        }
    }
}

impl fmt::Display for ImageSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_by_prefix() {
        assert!(matches!(
            ImageSource::from("data:image/png;base64,AAAA".to_string()),
            ImageSource::DataUrl(_)
        ));
        assert!(matches!(
            ImageSource::from("https://example.com/a.png".to_string()),
            ImageSource::Remote(_)
        ));
        assert!(matches!(
            ImageSource::from("scene_1.png".to_string()),
            ImageSource::File(_)
        ));
    }

    #[test]
    fn serde_round_trips_as_plain_string() {
        let source = ImageSource::from("https://example.com/a.png".to_string());
        let json = serde_json::to_string(&source).unwrap();
        assert_eq!(json, "\"https://example.com/a.png\"");
        let back: ImageSource = serde_json::from_str(&json).unwrap();
        assert_eq!(back, source);
    }
}
