//! REST wire types for the `generateContent` endpoint.
//!
//! The SDK builder covers text generation, but image output requires the
//! `responseModalities` generation config field, which it does not expose.
//! These types mirror the REST schema for that one call.

use crate::ImagePayload;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GenerateContentRequest {
    pub contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,
}

impl GenerateContentRequest {
    /// A request asking for an illustration of `prompt`.
    pub fn image(prompt: &str) -> Self {
        Self {
            contents: vec![Content {
                parts: vec![Part::text(prompt)],
            }],
            generation_config: Some(GenerationConfig {
                response_modalities: vec!["TEXT".to_string(), "IMAGE".to_string()],
                temperature: None,
            }),
        }
    }

    /// A request asking for a text description of an inline reference image.
    pub fn describe(prompt: &str, image_base64: String, mime_type: &str) -> Self {
        Self {
            contents: vec![Content {
                parts: vec![
                    Part {
                        text: None,
                        inline_data: Some(Blob {
                            mime_type: mime_type.to_string(),
                            data: image_base64,
                        }),
                        file_data: None,
                    },
                    Part::text(prompt),
                ],
            }],
            generation_config: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Content {
    #[serde(default)]
    pub parts: Vec<Part>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inline_data: Option<Blob>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_data: Option<FileData>,
}

impl Part {
    fn text(text: &str) -> Self {
        Self {
            text: Some(text.to_string()),
            inline_data: None,
            file_data: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Blob {
    pub mime_type: String,
    pub data: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct FileData {
    #[serde(default)]
    pub mime_type: Option<String>,
    pub file_uri: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GenerationConfig {
    pub response_modalities: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Candidate {
    #[serde(default)]
    pub content: Option<Content>,
}

impl GenerateContentResponse {
    /// The first image part across all candidates, in whichever shape the
    /// provider returned it.
    pub fn first_image(&self) -> Option<ImagePayload> {
        self.candidates
            .iter()
            .filter_map(|c| c.content.as_ref())
            .flat_map(|content| content.parts.iter())
            .find_map(|part| {
                if let Some(blob) = &part.inline_data {
                    Some(ImagePayload::Base64 {
                        mime_type: blob.mime_type.clone(),
                        data: blob.data.clone(),
                    })
                } else if let Some(file) = &part.file_data {
                    Some(ImagePayload::Remote {
                        mime_type: file.mime_type.clone(),
                        uri: file.file_uri.clone(),
                    })
                } else {
                    None
                }
            })
    }

    /// All text parts joined with newlines.
    pub fn text(&self) -> String {
        self.candidates
            .iter()
            .filter_map(|c| c.content.as_ref())
            .flat_map(|content| content.parts.iter())
            .filter_map(|part| part.text.as_deref())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_inline_image_response() {
        let json = r#"{
            "candidates": [{
                "content": {
                    "parts": [
                        {"text": "Here is your illustration."},
                        {"inlineData": {"mimeType": "image/png", "data": "AAAA"}}
                    ]
                }
            }]
        }"#;
        let response: GenerateContentResponse = serde_json::from_str(json).unwrap();
        let image = response.first_image().unwrap();
        assert_eq!(
            image,
            ImagePayload::Base64 {
                mime_type: "image/png".to_string(),
                data: "AAAA".to_string(),
            }
        );
        assert_eq!(response.text(), "Here is your illustration.");
    }

    #[test]
    fn parses_file_reference_response() {
        let json = r#"{
            "candidates": [{
                "content": {
                    "parts": [{"fileData": {"fileUri": "https://example.com/i.png"}}]
                }
            }]
        }"#;
        let response: GenerateContentResponse = serde_json::from_str(json).unwrap();
        assert!(matches!(
            response.first_image(),
            Some(ImagePayload::Remote { uri, .. }) if uri == "https://example.com/i.png"
        ));
    }

    #[test]
    fn empty_candidates_yield_no_image() {
        let response: GenerateContentResponse = serde_json::from_str("{}").unwrap();
        assert!(response.first_image().is_none());
        assert_eq!(response.text(), "");
    }

    #[test]
    fn image_request_sets_modalities() {
        let request = GenerateContentRequest::image("a fox");
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(
            json["generationConfig"]["responseModalities"],
            serde_json::json!(["TEXT", "IMAGE"])
        );
        assert_eq!(json["contents"][0]["parts"][0]["text"], "a fox");
    }
}
