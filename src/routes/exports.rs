//! Attendance export downloads.

#[cfg(test)]
#[path = "exports_test.rs"]
mod exports_test;

use axum::extract::State;
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::response::{IntoResponse, Response};
use time::OffsetDateTime;
use tracing::info;

use super::ApiError;
use crate::services::export::{self, ExportDocument, ExportFormat};
use crate::state::AppState;

/// `GET /api/attendances/export.xlsx`
pub async fn export_xlsx(State(state): State<AppState>) -> Result<Response, ApiError> {
    export_as(state, ExportFormat::Xlsx).await
}

/// `GET /api/attendances/export.pdf`
pub async fn export_pdf(State(state): State<AppState>) -> Result<Response, ApiError> {
    export_as(state, ExportFormat::Pdf).await
}

/// `GET /api/attendances/export.doc`
pub async fn export_doc(State(state): State<AppState>) -> Result<Response, ApiError> {
    export_as(state, ExportFormat::Doc).await
}

async fn export_as(state: AppState, format: ExportFormat) -> Result<Response, ApiError> {
    let records = state.store.list().await?;
    let rows = records.len();
    let config = state.config.clone();
    let now = OffsetDateTime::now_utc();

    let document = tokio::task::spawn_blocking(move || {
        export::render(format, &records, &config.heading, config.display_offset, now)
    })
    .await
    .map_err(|e| ApiError::internal(format!("export task failed: {e}")))??;

    info!(format = format.extension(), rows, bytes = document.bytes.len(), "export rendered");
    Ok(attachment(document))
}

fn attachment(document: ExportDocument) -> Response {
    let disposition = format!("attachment; filename=\"{}\"", document.filename);
    (
        [(CONTENT_TYPE, document.content_type.to_owned()), (CONTENT_DISPOSITION, disposition)],
        document.bytes,
    )
        .into_response()
}
