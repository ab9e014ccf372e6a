//! Normalized image generation results.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use fabula_error::{FabulaResult, GeminiError, GeminiErrorKind};

/// The shape an image came back from a provider in.
///
/// Providers return images in one of three shapes; tagging the result at
/// the provider boundary lets downstream code match once instead of
/// sniffing strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImagePayload {
    /// Base64-encoded image data, not yet decoded.
    Base64 {
        /// MIME type reported by the provider.
        mime_type: String,
        /// Base64 payload without a `data:` prefix.
        data: String,
    },
    /// Raw image bytes.
    Bytes {
        /// MIME type reported by the provider.
        mime_type: String,
        /// Decoded image bytes.
        data: Vec<u8>,
    },
    /// A reference to an image hosted by the provider.
    Remote {
        /// MIME type, when the provider reports one.
        mime_type: Option<String>,
        /// The remote URI.
        uri: String,
    },
}

impl ImagePayload {
    /// The MIME type, when known.
    pub fn mime_type(&self) -> Option<&str> {
        match self {
            Self::Base64 { mime_type, .. } | Self::Bytes { mime_type, .. } => Some(mime_type),
            Self::Remote { mime_type, .. } => mime_type.as_deref(),
        }
    }

    /// Decode into `(mime_type, bytes)`.
    ///
    /// Remote references are not fetched; they fail with
    /// [`GeminiErrorKind::RemoteMediaNotSupported`].
    pub fn into_bytes(self) -> FabulaResult<(String, Vec<u8>)> {
        match self {
            Self::Bytes { mime_type, data } => Ok((mime_type, data)),
            Self::Base64 { mime_type, data } => {
                let bytes = STANDARD
                    .decode(data.as_bytes())
                    .map_err(|e| GeminiError::new(GeminiErrorKind::Base64Decode(e.to_string())))?;
                Ok((mime_type, bytes))
            }
            Self::Remote { uri, .. } => {
                Err(GeminiError::new(GeminiErrorKind::RemoteMediaNotSupported(uri)).into())
            }
        }
    }

    /// Render as a `data:` URL without re-encoding when already base64.
    pub fn to_data_url(&self) -> FabulaResult<String> {
        match self {
            Self::Base64 { mime_type, data } => Ok(format!("data:{mime_type};base64,{data}")),
            Self::Bytes { mime_type, data } => {
                Ok(format!("data:{mime_type};base64,{}", STANDARD.encode(data)))
            }
            Self::Remote { uri, .. } => Err(GeminiError::new(
                GeminiErrorKind::RemoteMediaNotSupported(uri.clone()),
            )
            .into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base64_payload_decodes() {
        let payload = ImagePayload::Base64 {
            mime_type: "image/png".to_string(),
            data: STANDARD.encode(b"pngbytes"),
        };
        let (mime, bytes) = payload.into_bytes().unwrap();
        assert_eq!(mime, "image/png");
        assert_eq!(bytes, b"pngbytes");
    }

    #[test]
    fn invalid_base64_is_an_error() {
        let payload = ImagePayload::Base64 {
            mime_type: "image/png".to_string(),
            data: "not base64!!!".to_string(),
        };
        assert!(payload.into_bytes().is_err());
    }

    #[test]
    fn remote_payload_is_not_fetched() {
        let payload = ImagePayload::Remote {
            mime_type: None,
            uri: "https://example.com/img.png".to_string(),
        };
        assert!(payload.into_bytes().is_err());
    }

    #[test]
    fn data_url_keeps_existing_encoding() {
        let payload = ImagePayload::Base64 {
            mime_type: "image/jpeg".to_string(),
            data: "AAAA".to_string(),
        };
        assert_eq!(
            payload.to_data_url().unwrap(),
            "data:image/jpeg;base64,AAAA"
        );
    }
}
