// src/handlers/gmail.rs

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
    models::gmail::{GmailAccount, GmailAccountPayload},
};

// POST /api/gmail-accounts
#[utoipa::path(
    post,
    path = "/api/gmail-accounts",
    tag = "Gmail",
    request_body = GmailAccountPayload,
    responses(
        (status = 201, description = "Conta cadastrada (a senha nunca é devolvida)", body = GmailAccount),
        (status = 409, description = "E-mail já existe")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_account(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireRole<RoleEditor>,
    Json(payload): Json<GmailAccountPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let account = app_state
        .gmail_service
        .create_account(&app_state.db_pool, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(account)))
}

// GET /api/gmail-accounts
#[utoipa::path(
    get,
    path = "/api/gmail-accounts",
    tag = "Gmail",
    responses((status = 200, description = "Contas com setor e colaborador", body = Vec<GmailAccount>)),
    security(("api_jwt" = []))
)]
pub async fn list_accounts(
    State(app_state): State<AppState>,
    locale: Locale,
) -> Result<impl IntoResponse, ApiError> {
    let accounts = app_state
        .gmail_service
        .list_accounts()
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(accounts)))
}

// PUT /api/gmail-accounts/{id}
#[utoipa::path(
    put,
    path = "/api/gmail-accounts/{id}",
    tag = "Gmail",
    request_body = GmailAccountPayload,
    params(("id" = i64, Path, description = "ID da conta")),
    responses(
        (status = 200, description = "Conta atualizada; senha omitida mantém a atual", body = GmailAccount),
        (status = 404, description = "Conta não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_account(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireRole<RoleEditor>,
    Path(id): Path<i64>,
    Json(payload): Json<GmailAccountPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let account = app_state
        .gmail_service
        .update_account(id, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(account)))
}
