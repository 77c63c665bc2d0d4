//! Attendance submission and listing routes.

#[cfg(test)]
#[path = "attendances_test.rs"]
mod attendances_test;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Json;
use tracing::info;

use super::{ApiError, ApiResponse};
use crate::services::attendance::Attendance;
use crate::services::validation::{self, AttendanceForm};
use crate::state::AppState;

/// `POST /api/attendances`: validate and store a submitted form.
pub async fn submit(
    State(state): State<AppState>,
    Json(form): Json<AttendanceForm>,
) -> Result<(StatusCode, Json<ApiResponse<Attendance>>), ApiError> {
    let record = validation::validate(form)?;
    let saved = state.store.save(record).await?;
    info!(id = %saved.id, region = %saved.region, "attendance recorded");
    Ok((StatusCode::CREATED, ApiResponse::ok(saved)))
}

/// `GET /api/attendances`: all records, newest first.
pub async fn list(State(state): State<AppState>) -> Result<Json<ApiResponse<Vec<Attendance>>>, ApiError> {
    let records = state.store.list().await?;
    Ok(ApiResponse::ok(records))
}
