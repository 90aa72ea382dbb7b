// src/handlers/maintenance.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{
        i18n::Locale,
        rbac::{RequireRole, RoleEditor},
    },
    models::maintenance::{
        CloseMaintenancePayload, MaintenanceOrder, OpenMaintenanceOrderView, OpenMaintenancePayload,
        UpdateMaintenancePayload,
    },
};

// GET /api/maintenance
#[utoipa::path(
    get,
    path = "/api/maintenance",
    tag = "Maintenance",
    responses(
        (status = 200, description = "Ordens de serviço em andamento", body = Vec<OpenMaintenanceOrderView>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_open_orders(
    State(app_state): State<AppState>,
    locale: Locale,
) -> Result<impl IntoResponse, ApiError> {
    let orders = app_state
        .maintenance_service
        .list_open()
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(orders)))
}

// POST /api/maintenance
#[utoipa::path(
    post,
    path = "/api/maintenance",
    tag = "Maintenance",
    request_body = OpenMaintenancePayload,
    responses(
        (status = 201, description = "O.S. aberta e aparelho movido para manutenção", body = MaintenanceOrder),
        (status = 409, description = "Aparelho já possui O.S. em andamento"),
        (status = 422, description = "Aparelho em manutenção ou baixado")
    ),
    security(("api_jwt" = []))
)]
pub async fn open_order(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireRole<RoleEditor>,
    Json(payload): Json<OpenMaintenancePayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let order = app_state
        .maintenance_service
        .open_order(&app_state.db_pool, payload.device_id, &payload.vendor, &payload.defect)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(order)))
}

// PUT /api/maintenance/{id}
#[utoipa::path(
    put,
    path = "/api/maintenance/{id}",
    tag = "Maintenance",
    request_body = UpdateMaintenancePayload,
    params(("id" = i64, Path, description = "ID da O.S.")),
    responses(
        (status = 200, description = "Fornecedor e defeito atualizados", body = MaintenanceOrder),
        (status = 404, description = "O.S. não encontrada"),
        (status = 422, description = "O.S. não está em andamento")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_order(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireRole<RoleEditor>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateMaintenancePayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let order = app_state
        .maintenance_service
        .update_order(&app_state.db_pool, id, &payload.vendor, &payload.defect)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(order)))
}

// POST /api/maintenance/{id}/close
#[utoipa::path(
    post,
    path = "/api/maintenance/{id}/close",
    tag = "Maintenance",
    request_body = CloseMaintenancePayload,
    params(("id" = i64, Path, description = "ID da O.S.")),
    responses(
        (status = 200, description = "O.S. encerrada e retorno registrado no histórico", body = MaintenanceOrder),
        (status = 404, description = "O.S. não encontrada"),
        (status = 422, description = "O.S. não está em andamento")
    ),
    security(("api_jwt" = []))
)]
pub async fn close_order(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireRole<RoleEditor>,
    Path(id): Path<i64>,
    Json(payload): Json<CloseMaintenancePayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let order = app_state
        .maintenance_service
        .close_order(
            &app_state.db_pool,
            id,
            payload.resolution_notes.as_deref(),
            payload.cost,
            payload.outcome_status,
        )
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(order)))
}
