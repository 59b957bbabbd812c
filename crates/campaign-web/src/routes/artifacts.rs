//! Generated images.

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use campaign_core::ArtifactKind;
use tracing::debug;

use crate::state::AppState;

/// GET /artifacts/{name} - Serve one of the fixed artifact files.
pub async fn get_artifact(State(state): State<AppState>, Path(name): Path<String>) -> Response {
    let Some(kind) = ArtifactKind::from_file_name(&name) else {
        return (StatusCode::NOT_FOUND, "Unknown artifact").into_response();
    };

    match state.pipeline.artifacts().read(kind) {
        Ok(bytes) => (
            [
                (header::CONTENT_TYPE, "image/png"),
                (header::CACHE_CONTROL, "no-cache"),
            ],
            bytes,
        )
            .into_response(),
        Err(e) => {
            debug!(artifact = %name, error = %e, "Artifact not available");
            (StatusCode::NOT_FOUND, "Artifact not generated").into_response()
        }
    }
}
