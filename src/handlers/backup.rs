// src/handlers/backup.rs

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use chrono::Local;

use crate::{
    common::error::ApiError,
    config::AppState,
    middleware::{
        i18n::Locale,
        rbac::{RequireRole, RoleAdmin},
    },
};

// GET /api/backup
#[utoipa::path(
    get,
    path = "/api/backup",
    tag = "Backup",
    responses(
        (status = 200, description = "Script SQL completo (esquema + dados)", content_type = "application/sql", body = String),
        (status = 403, description = "Apenas administradores")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_backup(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireRole<RoleAdmin>,
) -> Result<Response, ApiError> {
    let script = app_state
        .backup_service
        .create_backup()
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let filename = format!("assetflow_backup_{}.sql", Local::now().format("%Y%m%d_%H%M%S"));
    let headers = [
        (header::CONTENT_TYPE, "application/sql; charset=utf-8".to_string()),
        (header::CONTENT_DISPOSITION, format!("attachment; filename=\"{}\"", filename)),
    ];

    Ok((headers, script).into_response())
}

// POST /api/backup/restore
#[utoipa::path(
    post,
    path = "/api/backup/restore",
    tag = "Backup",
    request_body(content = String, content_type = "application/sql", description = "Script gerado por GET /api/backup"),
    responses(
        (status = 204, description = "Banco restaurado"),
        (status = 400, description = "Script vazio ou inválido; nada foi alterado"),
        (status = 403, description = "Apenas administradores")
    ),
    security(("api_jwt" = []))
)]
pub async fn restore_backup(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireRole<RoleAdmin>,
    script: String,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .backup_service
        .restore(&script)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    tracing::info!("Banco restaurado a partir de backup ({} bytes)", script.len());
    Ok(StatusCode::NO_CONTENT)
}
