// src/handlers/catalog.rs
//
// Cadastros gerais: setores, marcas e modelos.

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
    models::catalog::{Brand, CatalogNamePayload, CreateModelPayload, DeviceModel, Sector},
};

// ---
// Setores
// ---

#[utoipa::path(
    post,
    path = "/api/catalog/sectors",
    tag = "Catalog",
    request_body = CatalogNamePayload,
    responses(
        (status = 201, description = "Setor criado", body = Sector),
        (status = 409, description = "Setor já existe")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_sector(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireRole<RoleEditor>,
    Json(payload): Json<CatalogNamePayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let sector = app_state
        .catalog_service
        .create_sector(payload.name.trim())
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(sector)))
}

#[utoipa::path(
    get,
    path = "/api/catalog/sectors",
    tag = "Catalog",
    responses((status = 200, description = "Setores", body = Vec<Sector>)),
    security(("api_jwt" = []))
)]
pub async fn list_sectors(
    State(app_state): State<AppState>,
    locale: Locale,
) -> Result<impl IntoResponse, ApiError> {
    let sectors = app_state
        .catalog_service
        .list_sectors()
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(sectors)))
}

#[utoipa::path(
    put,
    path = "/api/catalog/sectors/{id}",
    tag = "Catalog",
    request_body = CatalogNamePayload,
    params(("id" = i64, Path, description = "ID do setor")),
    responses(
        (status = 200, description = "Setor renomeado", body = Sector),
        (status = 409, description = "Setor já existe")
    ),
    security(("api_jwt" = []))
)]
pub async fn rename_sector(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireRole<RoleEditor>,
    Path(id): Path<i64>,
    Json(payload): Json<CatalogNamePayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let sector = app_state
        .catalog_service
        .rename_sector(id, payload.name.trim())
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(sector)))
}

// ---
// Marcas
// ---

#[utoipa::path(
    post,
    path = "/api/catalog/brands",
    tag = "Catalog",
    request_body = CatalogNamePayload,
    responses(
        (status = 201, description = "Marca criada", body = Brand),
        (status = 409, description = "Marca já existe")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_brand(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireRole<RoleEditor>,
    Json(payload): Json<CatalogNamePayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let brand = app_state
        .catalog_service
        .create_brand(payload.name.trim())
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(brand)))
}

#[utoipa::path(
    get,
    path = "/api/catalog/brands",
    tag = "Catalog",
    responses((status = 200, description = "Marcas", body = Vec<Brand>)),
    security(("api_jwt" = []))
)]
pub async fn list_brands(
    State(app_state): State<AppState>,
    locale: Locale,
) -> Result<impl IntoResponse, ApiError> {
    let brands = app_state
        .catalog_service
        .list_brands()
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(brands)))
}

#[utoipa::path(
    put,
    path = "/api/catalog/brands/{id}",
    tag = "Catalog",
    request_body = CatalogNamePayload,
    params(("id" = i64, Path, description = "ID da marca")),
    responses(
        (status = 200, description = "Marca renomeada", body = Brand),
        (status = 409, description = "Marca já existe")
    ),
    security(("api_jwt" = []))
)]
pub async fn rename_brand(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireRole<RoleEditor>,
    Path(id): Path<i64>,
    Json(payload): Json<CatalogNamePayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let brand = app_state
        .catalog_service
        .rename_brand(id, payload.name.trim())
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(brand)))
}

// ---
// Modelos
// ---

#[utoipa::path(
    post,
    path = "/api/catalog/models",
    tag = "Catalog",
    request_body = CreateModelPayload,
    responses(
        (status = 201, description = "Modelo criado", body = DeviceModel),
        (status = 400, description = "Marca desconhecida"),
        (status = 409, description = "Modelo já existe para a marca")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_model(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireRole<RoleEditor>,
    Json(payload): Json<CreateModelPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let model = app_state
        .catalog_service
        .create_model(payload.brand_id, payload.name.trim())
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(model)))
}

#[utoipa::path(
    get,
    path = "/api/catalog/models",
    tag = "Catalog",
    responses((status = 200, description = "Modelos com o nome da marca", body = Vec<DeviceModel>)),
    security(("api_jwt" = []))
)]
pub async fn list_models(
    State(app_state): State<AppState>,
    locale: Locale,
) -> Result<impl IntoResponse, ApiError> {
    let models = app_state
        .catalog_service
        .list_models()
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(models)))
}

#[utoipa::path(
    put,
    path = "/api/catalog/models/{id}",
    tag = "Catalog",
    request_body = CatalogNamePayload,
    params(("id" = i64, Path, description = "ID do modelo")),
    responses(
        (status = 200, description = "Modelo renomeado", body = DeviceModel),
        (status = 409, description = "Modelo já existe para a marca")
    ),
    security(("api_jwt" = []))
)]
pub async fn rename_model(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireRole<RoleEditor>,
    Path(id): Path<i64>,
    Json(payload): Json<CatalogNamePayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let model = app_state
        .catalog_service
        .rename_model(id, payload.name.trim())
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(model)))
}
