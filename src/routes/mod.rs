//! Router assembly and the JSON envelope shared by every API route.
//!
//! SYSTEM CONTEXT
//! ==============
//! The browser form posts submissions here and the admin page lists and
//! exports them. Successful API responses are `{success: true, data}`;
//! failures are `{success: false, error: {code, message}}`, where `code` is
//! the typed error's grepable `E_*` code.

pub mod attendances;
pub mod exports;


use axum::Router;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use axum::routing::get;
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::error;

use crate::services::attendance::StoreError;
use crate::services::catalog::{self, FormOptions};
use crate::services::export::ExportError;
use crate::services::validation::{FieldErrors, ValidationError};
use crate::state::AppState;

// =============================================================================
// ERRORS
// =============================================================================

/// Grepable error code and retryable flag for error envelopes.
pub trait ErrorCode: std::fmt::Display {
    fn error_code(&self) -> &'static str;

    fn retryable(&self) -> bool {
        false
    }
}

/// A failed API call, rendered as the error envelope.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub code: &'static str,
    pub message: String,
    pub retryable: bool,
    pub fields: Option<FieldErrors>,
}

impl ApiError {
    #[must_use]
    pub fn from_error(status: StatusCode, err: &(impl ErrorCode + ?Sized)) -> Self {
        Self {
            status,
            code: err.error_code(),
            message: err.to_string(),
            retryable: err.retryable(),
            fields: None,
        }
    }

    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            code: "E_INTERNAL",
            message: message.into(),
            retryable: false,
            fields: None,
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        error!(error = %err, "record store failed");
        Self::from_error(StatusCode::INTERNAL_SERVER_ERROR, &err)
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        let mut api = Self::from_error(StatusCode::UNPROCESSABLE_ENTITY, &err);
        api.fields = Some(err.0);
        api
    }
}

impl From<ExportError> for ApiError {
    fn from(err: ExportError) -> Self {
        error!(error = %err, "export rendering failed");
        Self::from_error(StatusCode::INTERNAL_SERVER_ERROR, &err)
    }
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    code: &'a str,
    message: &'a str,
    retryable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    fields: Option<&'a FieldErrors>,
}

#[derive(Serialize)]
struct ErrorEnvelope<'a> {
    success: bool,
    error: ErrorBody<'a>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorEnvelope {
            success: false,
            error: ErrorBody {
                code: self.code,
                message: &self.message,
                retryable: self.retryable,
                fields: self.fields.as_ref(),
            },
        };
        (self.status, Json(body)).into_response()
    }
}

// =============================================================================
// ENVELOPE
// =============================================================================

/// Successful API payload.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Json<Self> {
        Json(Self { success: true, data })
    }
}

// =============================================================================
// ROUTER
// =============================================================================

pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/attendances", get(attendances::list).post(attendances::submit))
        .route("/api/attendances/export.xlsx", get(exports::export_xlsx))
        .route("/api/attendances/export.pdf", get(exports::export_pdf))
        .route("/api/attendances/export.doc", get(exports::export_doc))
        .route("/api/options", get(options))
        .route("/healthz", get(healthz))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// `GET /api/options`: region and department choices for the form.
pub async fn options() -> Json<ApiResponse<FormOptions>> {
    ApiResponse::ok(catalog::options())
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}
