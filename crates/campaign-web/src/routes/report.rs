//! PDF download of the last analysis.

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
};
use campaign_core::campaign::safe_file_name;
use campaign_core::StageOutcome;
use campaign_render::{report_text, ReportExporter};
use tracing::info;

use crate::state::AppState;

/// GET /report - Export the last analysis as a PDF attachment.
pub async fn download_report(State(state): State<AppState>) -> Response {
    let session = state.session.lock().await;
    let Some(result) = session.last() else {
        return (StatusCode::NOT_FOUND, Html("Aucune analyse à exporter".to_string())).into_response();
    };

    let mut exporter = ReportExporter::new();
    if let Some(logo) = state.pipeline.artifacts().load_logo() {
        exporter = exporter.with_logo(logo);
    }

    match exporter.export(&report_text(result)) {
        StageOutcome::Success(bytes) => {
            let filename = safe_file_name(&result.report_filename);
            info!(file = %filename, size = bytes.len(), "Report exported");
            (
                [
                    (header::CONTENT_TYPE, "application/pdf".to_string()),
                    (
                        header::CONTENT_DISPOSITION,
                        format!("attachment; filename=\"{}\"", filename),
                    ),
                ],
                bytes,
            )
                .into_response()
        }
        StageOutcome::Degraded { warning: message } | StageOutcome::Failed { error: message } => {
            (StatusCode::INTERNAL_SERVER_ERROR, Html(message)).into_response()
        }
    }
}
