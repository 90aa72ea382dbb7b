// src/handlers/chat.rs
//
// Assistente conversacional. O contexto da conversa vive no cliente:
// cada requisição envia o contexto atual e recebe o próximo.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{
        i18n::Locale,
        rbac::{RequireRole, RoleEditor},
    },
    models::chat::{ChatReply, IntentRequest, MessageRequest},
};

// POST /api/chat/intent
#[utoipa::path(
    post,
    path = "/api/chat/intent",
    tag = "Chat",
    request_body = IntentRequest,
    responses(
        (status = 200, description = "Resposta do assistente e o novo contexto", body = ChatReply)
    ),
    security(("api_jwt" = []))
)]
pub async fn handle_intent(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireRole<RoleEditor>,
    Json(payload): Json<IntentRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let reply = app_state
        .chat_service
        .handle_intent(payload.intent, payload.context, &locale, &app_state.i18n_store)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(reply)))
}

// POST /api/chat/message
#[utoipa::path(
    post,
    path = "/api/chat/message",
    tag = "Chat",
    request_body = MessageRequest,
    responses(
        (status = 200, description = "Resposta do assistente; falha do NLU devolve um pedido de desculpas", body = ChatReply)
    ),
    security(("api_jwt" = []))
)]
pub async fn handle_message(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireRole<RoleEditor>,
    Json(payload): Json<MessageRequest>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let reply = app_state
        .chat_service
        .handle_message(&payload.message, payload.context, &locale, &app_state.i18n_store)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(reply)))
}
