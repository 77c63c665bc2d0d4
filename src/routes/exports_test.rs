use axum::http::StatusCode;

use super::*;
use crate::services::test_helpers::new_attendance;
use crate::state::test_helpers::{failing_app_state, test_app_state};

fn header<'a>(response: &'a Response, name: axum::http::HeaderName) -> &'a str {
    response.headers().get(name).unwrap().to_str().unwrap()
}

async fn seeded_state() -> AppState {
    let state = test_app_state();
    state.store.save(new_attendance("Budi")).await.unwrap();
    state.store.save(new_attendance("Sari")).await.unwrap();
    state
}

#[tokio::test]
async fn pdf_export_is_attachment() {
    let response = export_pdf(State(seeded_state().await)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(header(&response, CONTENT_TYPE), "application/pdf");

    let disposition = header(&response, CONTENT_DISPOSITION);
    assert!(disposition.starts_with("attachment; filename=\"Daftar_Kehadiran_"));
    assert!(disposition.ends_with(".pdf\""));

    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert!(body.starts_with(b"%PDF"));
}

#[tokio::test]
async fn xlsx_export_has_spreadsheet_type() {
    let response = export_xlsx(State(seeded_state().await)).await.unwrap();
    assert!(header(&response, CONTENT_TYPE).contains("spreadsheetml"));
    assert!(header(&response, CONTENT_DISPOSITION).ends_with(".xlsx\""));
}

#[tokio::test]
async fn doc_export_lists_records_newest_first() {
    let response = export_doc(State(seeded_state().await)).await.unwrap();
    assert_eq!(header(&response, CONTENT_TYPE), "application/msword");

    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let html = String::from_utf8(body.to_vec()).unwrap();
    assert!(html.find("Sari").unwrap() < html.find("Budi").unwrap());
}

#[tokio::test]
async fn export_surfaces_store_failure() {
    let err = export_doc(State(failing_app_state())).await.unwrap_err();
    assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(err.code, "E_DATABASE");
}
