//! Raw file routes for cached images and exported documents.

use crate::{ApiError, AppState};
use axum::extract::{Path, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};

pub(super) async fn serve_image(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let bytes = state.images.read_image(&filename).await?;
    Ok(([(header::CONTENT_TYPE, "image/png")], bytes))
}

pub(super) async fn serve_export(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Result<Response, ApiError> {
    attachment(&state, &filename).await
}

/// Read an exported file and wrap it as a download response.
pub(super) async fn attachment(state: &AppState, filename: &str) -> Result<Response, ApiError> {
    let bytes = state.exporter.read(filename).await?;
    Ok((
        [
            (header::CONTENT_TYPE, content_type(filename).to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        bytes,
    )
        .into_response())
}

fn content_type(filename: &str) -> &'static str {
    match filename.rsplit_once('.').map(|(_, ext)| ext) {
        Some("pdf") => "application/pdf",
        Some("html") => "text/html; charset=utf-8",
        Some("json") => "application/json",
        Some("png") => "image/png",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::content_type;

    #[test]
    fn content_types_follow_extension() {
        assert_eq!(content_type("story.pdf"), "application/pdf");
        assert_eq!(content_type("story.html"), "text/html; charset=utf-8");
        assert_eq!(content_type("backup.json"), "application/json");
        assert_eq!(content_type("noext"), "application/octet-stream");
    }
}
