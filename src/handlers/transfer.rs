// src/handlers/transfer.rs
//
// Importação e exportação de planilhas. O cliente converte a planilha em
// um array JSON (uma linha por objeto, chaves = cabeçalhos fixos).

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::Value;

use crate::{
    common::error::ApiError,
    config::AppState,
    middleware::{
        i18n::Locale,
        rbac::{RequireRole, RoleEditor},
    },
    models::import::{ExportEntity, ImportEntity, ImportReport},
};

// POST /api/import/{entity}
#[utoipa::path(
    post,
    path = "/api/import/{entity}",
    tag = "Transfer",
    request_body(content = String, content_type = "application/json", description = "Array JSON com as linhas da planilha"),
    params(("entity" = ImportEntity, Path, description = "employees, devices, brands, gmail-accounts ou movements")),
    responses(
        (status = 200, description = "Relatório por linha; falhas não interrompem as demais", body = ImportReport)
    ),
    security(("api_jwt" = []))
)]
pub async fn import_rows(
    State(app_state): State<AppState>,
    _guard: RequireRole<RoleEditor>,
    Path(entity): Path<ImportEntity>,
    Json(rows): Json<Vec<Value>>,
) -> Result<impl IntoResponse, ApiError> {
    let total = rows.len();
    let service = &app_state.import_service;

    let report = match entity {
        ImportEntity::Employees => service.import_employees(rows).await,
        ImportEntity::Devices => service.import_devices(rows).await,
        ImportEntity::Brands => service.import_brands(rows).await,
        ImportEntity::GmailAccounts => service.import_gmail_accounts(rows).await,
        ImportEntity::Movements => service.import_movements(rows).await,
    };

    tracing::info!(
        "Importação {:?}: {} linhas, {} ok, {} com erro",
        entity,
        total,
        report.succeeded,
        report.failed
    );

    Ok((StatusCode::OK, Json(report)))
}

// GET /api/export/{entity}
#[utoipa::path(
    get,
    path = "/api/export/{entity}",
    tag = "Transfer",
    params(("entity" = ExportEntity, Path, description = "employees ou devices")),
    responses(
        (status = 200, description = "Linhas da planilha: colaboradores com setor ou aparelhos com responsável atual")
    ),
    security(("api_jwt" = []))
)]
pub async fn export_rows(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(entity): Path<ExportEntity>,
) -> Result<impl IntoResponse, ApiError> {
    let response = match entity {
        ExportEntity::Employees => {
            let rows = app_state
                .employee_service
                .export_employees()
                .await
                .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;
            (StatusCode::OK, Json(rows)).into_response()
        }
        ExportEntity::Devices => {
            let rows = app_state
                .device_service
                .export_devices()
                .await
                .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;
            (StatusCode::OK, Json(rows)).into_response()
        }
    };

    Ok(response)
}
