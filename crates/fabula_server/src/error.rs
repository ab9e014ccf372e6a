//! API error responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use fabula_error::{
    ExportErrorKind, FabulaError, FabulaErrorKind, NarrativeErrorKind, ServerErrorKind,
    StorageErrorKind,
};
use serde_json::json;

/// An error on its way out as an HTTP response.
///
/// Service errors map onto status codes by kind; anything without a
/// client-facing meaning becomes a logged 500 with a generic body so
/// internal details never leak.
#[derive(Debug)]
pub enum ApiError {
    /// The request failed validation; each detail names one problem.
    Validation(Vec<String>),
    /// An error from the underlying services.
    Service(FabulaError),
}

impl<E> From<E> for ApiError
where
    E: Into<FabulaError>,
{
    fn from(err: E) -> Self {
        Self::Service(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            Self::Validation(details) => (
                StatusCode::BAD_REQUEST,
                Json(json!({"error": "Validation failed", "details": details})),
            )
                .into_response(),
            Self::Service(err) => {
                let (status, message) = classify(&err);
                if status.is_server_error() {
                    tracing::error!(error = %err, "Request failed");
                    (status, Json(json!({"error": "Internal server error"}))).into_response()
                } else {
                    (status, Json(json!({"error": message}))).into_response()
                }
            }
        }
    }
}

/// Status code and client-facing message for a service error.
fn classify(err: &FabulaError) -> (StatusCode, String) {
    match err.kind() {
        FabulaErrorKind::Narrative(e) => {
            let status = match &e.kind {
                NarrativeErrorKind::StoryNotFound(_)
                | NarrativeErrorKind::CharacterNotFound { .. } => StatusCode::NOT_FOUND,
                NarrativeErrorKind::InvalidUpdateField(_)
                | NarrativeErrorKind::SceneBudgetExhausted(_) => StatusCode::BAD_REQUEST,
                NarrativeErrorKind::InvalidStoryData(_)
                | NarrativeErrorKind::NonSequentialScene { .. } => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            };
            (status, e.kind.to_string())
        }
        FabulaErrorKind::Export(e) => {
            let status = match &e.kind {
                ExportErrorKind::NotFound(_) => StatusCode::NOT_FOUND,
                ExportErrorKind::InvalidFilename(_) | ExportErrorKind::UnsupportedFormat(_) => {
                    StatusCode::BAD_REQUEST
                }
                ExportErrorKind::ImageDecode(_) | ExportErrorKind::PdfRender(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            };
            (status, e.kind.to_string())
        }
        FabulaErrorKind::Storage(e) => {
            let status = match &e.kind {
                StorageErrorKind::NotFound(_) => StatusCode::NOT_FOUND,
                StorageErrorKind::InvalidPath(_) => StatusCode::BAD_REQUEST,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            };
            (status, e.kind.to_string())
        }
        FabulaErrorKind::Server(e) => {
            let status = match &e.kind {
                ServerErrorKind::Validation(_) => StatusCode::BAD_REQUEST,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            };
            (status, e.kind.to_string())
        }
        _ => (StatusCode::INTERNAL_SERVER_ERROR, String::new()),
    }
}
