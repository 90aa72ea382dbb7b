// src/handlers/movements.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::{
    common::error::ApiError,
    config::AppState,
    middleware::i18n::Locale,
    models::ledger::{HistoryFilter, MovementEntry, MovementHistoryRow},
};

// GET /api/movements
#[utoipa::path(
    get,
    path = "/api/movements",
    tag = "Movements",
    params(HistoryFilter),
    responses(
        (status = 200, description = "Movimentações filtradas, mais recentes primeiro", body = Vec<MovementHistoryRow>)
    ),
    security(("api_jwt" = []))
)]
pub async fn search_movements(
    State(app_state): State<AppState>,
    locale: Locale,
    Query(filter): Query<HistoryFilter>,
) -> Result<impl IntoResponse, ApiError> {
    let rows = app_state
        .ledger_service
        .search_history(&filter)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(rows)))
}

// GET /api/movements/{id}
#[utoipa::path(
    get,
    path = "/api/movements/{id}",
    tag = "Movements",
    params(("id" = i64, Path, description = "ID da movimentação")),
    responses(
        (status = 200, description = "Entrada do histórico", body = MovementEntry),
        (status = 404, description = "Movimentação não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_movement(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let entry = app_state
        .ledger_service
        .find_entry(id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(entry)))
}
