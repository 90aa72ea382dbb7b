// src/handlers/documents.rs

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

use crate::{
    common::error::ApiError,
    config::AppState,
    middleware::i18n::Locale,
    models::document::{HandoverDocument, HandoverPayload},
};

// POST /api/documents/handover/{entry_id}
#[utoipa::path(
    post,
    path = "/api/documents/handover/{entry_id}",
    tag = "Documents",
    request_body = HandoverPayload,
    params(("entry_id" = i64, Path, description = "ID da movimentação de entrega")),
    responses(
        (status = 200, description = "Termo de responsabilidade", body = HandoverDocument),
        (status = 400, description = "Checklist incompleto ou movimentação não é uma entrega"),
        (status = 404, description = "Movimentação não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn handover_document(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(entry_id): Path<i64>,
    Json(payload): Json<HandoverPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let document = app_state
        .document_service
        .build_handover(entry_id, payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(document)))
}

// POST /api/documents/handover/{entry_id}/pdf
#[utoipa::path(
    post,
    path = "/api/documents/handover/{entry_id}/pdf",
    tag = "Documents",
    request_body = HandoverPayload,
    params(("entry_id" = i64, Path, description = "ID da movimentação de entrega")),
    responses(
        (status = 200, description = "Termo em PDF", content_type = "application/pdf"),
        (status = 400, description = "Checklist incompleto ou movimentação não é uma entrega"),
        (status = 404, description = "Movimentação não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn handover_pdf(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(entry_id): Path<i64>,
    Json(payload): Json<HandoverPayload>,
) -> Result<Response, ApiError> {
    let pdf_bytes = app_state
        .document_service
        .handover_pdf(entry_id, payload)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    // Headers para o navegador baixar ou mostrar o PDF
    let headers = [
        (header::CONTENT_TYPE, "application/pdf".to_string()),
        (header::CONTENT_DISPOSITION, format!("attachment; filename=\"termo_{}.pdf\"", entry_id)),
    ];

    Ok((headers, pdf_bytes).into_response())
}
