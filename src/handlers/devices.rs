// src/handlers/devices.rs

use axum::{
    extract::{Path, Query, State},
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
    models::{
        device::{CreateDevicePayload, Device, DeviceSearchQuery, DeviceView, UpdateDevicePayload},
        ledger::{CurrentState, MovementEntry, RecordMovementPayload, ReturnDevicePayload},
        maintenance::MaintenanceOrder,
    },
    services::ledger_service::MovementOutcome,
};

// ---
// Cadastro
// ---

// POST /api/devices
#[utoipa::path(
    post,
    path = "/api/devices",
    tag = "Devices",
    request_body = CreateDevicePayload,
    responses(
        (status = 201, description = "Aparelho cadastrado com a entrada inicial no histórico", body = Device),
        (status = 409, description = "Número de série já existe"),
        (status = 422, description = "Status inicial não permitido")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_device(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireRole<RoleEditor>,
    Json(payload): Json<CreateDevicePayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let device = app_state
        .device_service
        .create_device(&app_state.db_pool, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(device)))
}

// GET /api/devices
#[utoipa::path(
    get,
    path = "/api/devices",
    tag = "Devices",
    params(DeviceSearchQuery),
    responses(
        (status = 200, description = "Inventário com responsável e localização atuais", body = Vec<DeviceView>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_devices(
    State(app_state): State<AppState>,
    locale: Locale,
    Query(query): Query<DeviceSearchQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let devices = app_state
        .device_service
        .list_devices(query.q.as_deref(), query.status)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(devices)))
}

// GET /api/devices/{id}
#[utoipa::path(
    get,
    path = "/api/devices/{id}",
    tag = "Devices",
    params(("id" = i64, Path, description = "ID do aparelho")),
    responses(
        (status = 200, description = "Aparelho", body = Device),
        (status = 404, description = "Aparelho não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_device(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let device = app_state
        .device_service
        .get_device(id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(device)))
}

// PUT /api/devices/{id}
#[utoipa::path(
    put,
    path = "/api/devices/{id}",
    tag = "Devices",
    request_body = UpdateDevicePayload,
    params(("id" = i64, Path, description = "ID do aparelho")),
    responses(
        (status = 200, description = "Dados cadastrais atualizados (o status não muda)", body = Device),
        (status = 404, description = "Aparelho não encontrado"),
        (status = 409, description = "Número de série já existe")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_device(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireRole<RoleEditor>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateDevicePayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let device = app_state
        .device_service
        .update_device(&app_state.db_pool, id, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(device)))
}

// DELETE /api/devices/{id}
#[utoipa::path(
    delete,
    path = "/api/devices/{id}",
    tag = "Devices",
    params(("id" = i64, Path, description = "ID do aparelho")),
    responses(
        (status = 204, description = "Aparelho excluído"),
        (status = 404, description = "Aparelho não encontrado"),
        (status = 409, description = "Aparelho possui histórico de movimentações")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_device(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireRole<RoleEditor>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .device_service
        .delete_device(&app_state.db_pool, id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}

// ---
// Estado e histórico
// ---

// GET /api/devices/{id}/state
#[utoipa::path(
    get,
    path = "/api/devices/{id}/state",
    tag = "Devices",
    params(("id" = i64, Path, description = "ID do aparelho")),
    responses(
        (status = 200, description = "Estado atual derivado do histórico", body = CurrentState),
        (status = 404, description = "Aparelho não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_current_state(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let state = app_state
        .ledger_service
        .get_current_state(&app_state.db_pool, id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(state)))
}

// GET /api/devices/{id}/history
#[utoipa::path(
    get,
    path = "/api/devices/{id}/history",
    tag = "Devices",
    params(("id" = i64, Path, description = "ID do aparelho")),
    responses(
        (status = 200, description = "Histórico completo, mais recente primeiro", body = Vec<MovementEntry>)
    ),
    security(("api_jwt" = []))
)]
pub async fn device_history(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let entries = app_state
        .ledger_service
        .device_history(&app_state.db_pool, id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(entries)))
}

// GET /api/devices/{id}/maintenance
#[utoipa::path(
    get,
    path = "/api/devices/{id}/maintenance",
    tag = "Devices",
    params(("id" = i64, Path, description = "ID do aparelho")),
    responses(
        (status = 200, description = "Ordens de serviço do aparelho", body = Vec<MaintenanceOrder>)
    ),
    security(("api_jwt" = []))
)]
pub async fn device_maintenance_orders(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let orders = app_state
        .maintenance_service
        .list_for_device(id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(orders)))
}

// ---
// Movimentações
// ---

// POST /api/devices/{id}/movements
#[utoipa::path(
    post,
    path = "/api/devices/{id}/movements",
    tag = "Devices",
    request_body = RecordMovementPayload,
    params(("id" = i64, Path, description = "ID do aparelho")),
    responses(
        (status = 201, description = "Movimentação registrada", body = MovementEntry),
        (status = 400, description = "Colaborador desconhecido ou ausente"),
        (status = 404, description = "Aparelho não encontrado"),
        (status = 422, description = "Transição de status não permitida")
    ),
    security(("api_jwt" = []))
)]
pub async fn record_movement(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireRole<RoleEditor>,
    Path(id): Path<i64>,
    Json(payload): Json<RecordMovementPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let entry = app_state
        .ledger_service
        .record_movement(
            &app_state.db_pool,
            id,
            payload.status,
            payload.employee_id,
            payload.location.as_deref(),
            payload.notes.as_deref(),
        )
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(entry)))
}

// POST /api/devices/{id}/return
#[utoipa::path(
    post,
    path = "/api/devices/{id}/return",
    tag = "Devices",
    request_body = ReturnDevicePayload,
    params(("id" = i64, Path, description = "ID do aparelho")),
    responses(
        (status = 201, description = "Devolução registrada com o checklist", body = MovementOutcome),
        (status = 400, description = "Checklist incompleto"),
        (status = 422, description = "Aparelho não está com o colaborador informado")
    ),
    security(("api_jwt" = []))
)]
pub async fn return_device(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireRole<RoleEditor>,
    Path(id): Path<i64>,
    Json(payload): Json<ReturnDevicePayload>,
) -> Result<impl IntoResponse, ApiError> {
    let outcome = app_state
        .ledger_service
        .return_device(&app_state.db_pool, id, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(outcome)))
}
