use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::{json, Value};
use thiserror::Error;

use crate::common::i18n::I18nStore;
use crate::middleware::i18n::Locale;
use crate::models::device::DeviceStatus;

/// Classificação usada para respostas HTTP, relatórios de importação e
/// mensagens do assistente.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    Validation,
    Conflict,
    ReferentialSafety,
    NotFound,
    Transient,
    Auth,
    Internal,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("Dados inválidos: {0}")]
    InvalidInput(String),

    #[error("Referência desconhecida: {0}")]
    UnknownReference(String),

    #[error("Transição inválida: {from} -> {to}")]
    InvalidTransition { from: DeviceStatus, to: DeviceStatus },

    #[error("O aparelho {device_id} não está com o colaborador {employee_id}")]
    DeviceNotHeldBy { device_id: i64, employee_id: i64 },

    #[error("A O.S. {0} não está em andamento")]
    MaintenanceOrderNotOpen(i64),

    // --- Conflitos de unicidade ---
    #[error("O aparelho com número de série '{0}' já existe")]
    SerialNumberAlreadyExists(String),

    #[error("O CPF '{0}' já existe")]
    CpfAlreadyExists(String),

    #[error("O código de colaborador '{0}' já existe")]
    EmployeeCodeAlreadyExists(String),

    #[error("O e-mail '{0}' já existe")]
    GmailAlreadyExists(String),

    #[error("O login '{0}' já existe")]
    LoginAlreadyExists(String),

    #[error("'{0}' já existe")]
    CatalogNameAlreadyExists(String),

    #[error("O aparelho {0} já possui uma O.S. em andamento")]
    MaintenanceOrderAlreadyOpen(i64),

    // --- Segurança referencial ---
    #[error("Não é possível excluir {entity} {id}: existem {references} registros no histórico")]
    ReferencedByHistory { entity: &'static str, id: i64, references: i64 },

    // --- Não encontrados ---
    #[error("Aparelho {0} não encontrado")]
    DeviceNotFound(String),

    #[error("Colaborador {0} não encontrado")]
    EmployeeNotFound(String),

    #[error("O.S. {0} não encontrada")]
    MaintenanceOrderNotFound(i64),

    #[error("Movimentação {0} não encontrada")]
    MovementNotFound(i64),

    #[error("Conta Gmail {0} não encontrada")]
    GmailAccountNotFound(i64),

    #[error("Usuário não encontrado")]
    UserNotFound,

    // --- Autenticação ---
    #[error("Credenciais inválidas")]
    InvalidCredentials,

    #[error("Token inválido")]
    InvalidToken,

    #[error("Permissão insuficiente: requer {0}")]
    Forbidden(&'static str),

    // --- Transitórios ---
    #[error("Falha de comunicação com o assistente: {0}")]
    NluUnavailable(String),

    // --- Backup / documentos ---
    #[error("Falha na restauração: {0}")]
    RestoreFailed(String),

    #[error("Fonte não encontrada: {0}")]
    FontNotFound(String),

    #[error("Erro de banco de dados")]
    DatabaseError(#[from] sqlx::Error),

    // `anyhow::Error` guarda o contexto do erro.
    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

impl AppError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::ValidationError(_)
            | AppError::InvalidInput(_)
            | AppError::UnknownReference(_)
            | AppError::InvalidTransition { .. }
            | AppError::DeviceNotHeldBy { .. }
            | AppError::MaintenanceOrderNotOpen(_)
            | AppError::RestoreFailed(_) => ErrorKind::Validation,

            AppError::SerialNumberAlreadyExists(_)
            | AppError::CpfAlreadyExists(_)
            | AppError::EmployeeCodeAlreadyExists(_)
            | AppError::GmailAlreadyExists(_)
            | AppError::LoginAlreadyExists(_)
            | AppError::CatalogNameAlreadyExists(_)
            | AppError::MaintenanceOrderAlreadyOpen(_) => ErrorKind::Conflict,

            AppError::ReferencedByHistory { .. } => ErrorKind::ReferentialSafety,

            AppError::DeviceNotFound(_)
            | AppError::EmployeeNotFound(_)
            | AppError::MaintenanceOrderNotFound(_)
            | AppError::MovementNotFound(_)
            | AppError::GmailAccountNotFound(_)
            | AppError::UserNotFound => ErrorKind::NotFound,

            AppError::InvalidCredentials
            | AppError::InvalidToken
            | AppError::Forbidden(_) => ErrorKind::Auth,

            AppError::NluUnavailable(_) => ErrorKind::Transient,

            AppError::FontNotFound(_)
            | AppError::DatabaseError(_)
            | AppError::InternalServerError(_)
            | AppError::BcryptError(_)
            | AppError::JwtError(_) => ErrorKind::Internal,
        }
    }

    /// Chave usada pelo `I18nStore` para traduzir a mensagem.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::ValidationError(_) => "validation_error",
            AppError::InvalidInput(_) => "invalid_input",
            AppError::UnknownReference(_) => "unknown_reference",
            AppError::InvalidTransition { .. } => "invalid_transition",
            AppError::DeviceNotHeldBy { .. } => "device_not_held_by",
            AppError::MaintenanceOrderNotOpen(_) => "maintenance_order_not_open",
            AppError::SerialNumberAlreadyExists(_) => "serial_number_already_exists",
            AppError::CpfAlreadyExists(_) => "cpf_already_exists",
            AppError::EmployeeCodeAlreadyExists(_) => "employee_code_already_exists",
            AppError::GmailAlreadyExists(_) => "gmail_already_exists",
            AppError::LoginAlreadyExists(_) => "login_already_exists",
            AppError::CatalogNameAlreadyExists(_) => "catalog_name_already_exists",
            AppError::MaintenanceOrderAlreadyOpen(_) => "maintenance_order_already_open",
            AppError::ReferencedByHistory { .. } => "referenced_by_history",
            AppError::DeviceNotFound(_) => "device_not_found",
            AppError::EmployeeNotFound(_) => "employee_not_found",
            AppError::MaintenanceOrderNotFound(_) => "maintenance_order_not_found",
            AppError::MovementNotFound(_) => "movement_not_found",
            AppError::GmailAccountNotFound(_) => "gmail_account_not_found",
            AppError::UserNotFound => "user_not_found",
            AppError::InvalidCredentials => "invalid_credentials",
            AppError::InvalidToken => "invalid_token",
            AppError::Forbidden(_) => "forbidden",
            AppError::NluUnavailable(_) => "nlu_unavailable",
            AppError::RestoreFailed(_) => "restore_failed",
            _ => "internal_error",
        }
    }

    /// Argumento interpolado em `{0}` nas mensagens traduzidas.
    fn message_arg(&self) -> Option<String> {
        match self {
            AppError::InvalidInput(v)
            | AppError::UnknownReference(v)
            | AppError::SerialNumberAlreadyExists(v)
            | AppError::CpfAlreadyExists(v)
            | AppError::EmployeeCodeAlreadyExists(v)
            | AppError::GmailAlreadyExists(v)
            | AppError::LoginAlreadyExists(v)
            | AppError::CatalogNameAlreadyExists(v)
            | AppError::DeviceNotFound(v)
            | AppError::EmployeeNotFound(v)
            | AppError::NluUnavailable(v)
            | AppError::RestoreFailed(v) => Some(v.clone()),
            AppError::MaintenanceOrderNotOpen(id)
            | AppError::MaintenanceOrderAlreadyOpen(id)
            | AppError::MaintenanceOrderNotFound(id)
            | AppError::MovementNotFound(id)
            | AppError::GmailAccountNotFound(id) => Some(id.to_string()),
            AppError::ReferencedByHistory { id, .. } => Some(id.to_string()),
            AppError::InvalidTransition { from, to } => Some(format!("{from} -> {to}")),
            AppError::DeviceNotHeldBy { device_id, .. } => Some(device_id.to_string()),
            AppError::Forbidden(role) => Some(role.to_string()),
            _ => None,
        }
    }

    fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidCredentials | AppError::InvalidToken => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::InvalidTransition { .. }
            | AppError::DeviceNotHeldBy { .. }
            | AppError::MaintenanceOrderNotOpen(_) => StatusCode::UNPROCESSABLE_ENTITY,
            _ => match self.kind() {
                ErrorKind::Validation => StatusCode::BAD_REQUEST,
                ErrorKind::Conflict | ErrorKind::ReferentialSafety => StatusCode::CONFLICT,
                ErrorKind::NotFound => StatusCode::NOT_FOUND,
                ErrorKind::Transient => StatusCode::SERVICE_UNAVAILABLE,
                ErrorKind::Auth => StatusCode::UNAUTHORIZED,
                ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }

    /// Mensagem voltada ao usuário. Erros internos nunca expõem detalhes.
    pub fn user_message(&self, locale: &Locale, store: &I18nStore) -> String {
        if self.kind() == ErrorKind::Internal {
            tracing::error!("Erro Interno do Servidor: {:?}", self);
            return store.translate(&locale.0, "internal_error", None);
        }
        let translated = store.translate(&locale.0, self.code(), self.message_arg().as_deref());
        if translated.is_empty() { self.to_string() } else { translated }
    }

    pub fn to_api_error(self, locale: &Locale, store: &I18nStore) -> ApiError {
        let status = self.status_code();

        if let AppError::ValidationError(errors) = &self {
            let mut details = serde_json::Map::new();
            for (field, field_errors) in errors.field_errors() {
                let messages: Vec<String> = field_errors
                    .iter()
                    .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                    .collect();
                details.insert(field.to_string(), json!(messages));
            }
            return ApiError {
                status,
                error: store.translate(&locale.0, "validation_error", None),
                details: Some(Value::Object(details)),
            };
        }

        let details = match &self {
            AppError::ReferencedByHistory { entity, references, .. } => {
                Some(json!({ "entity": entity, "references": references }))
            }
            _ => None,
        };

        ApiError {
            status,
            error: self.user_message(locale, store),
            details,
        }
    }
}

/// Corpo de erro devolvido pela API.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub error: String,
    pub details: Option<Value>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = match self.details {
            Some(details) => json!({ "error": self.error, "details": details }),
            None => json!({ "error": self.error }),
        };
        (self.status, Json(body)).into_response()
    }
}

// Para extratores e middlewares, que não têm o idioma em mãos.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        ApiError::from(self).into_response()
    }
}

// Rejeições de extratores, sem acesso ao idioma da requisição
impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        err.to_api_error(&Locale::default(), &I18nStore::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conflicts_and_referential_errors_are_classified() {
        assert_eq!(AppError::CpfAlreadyExists("1".into()).kind(), ErrorKind::Conflict);
        assert_eq!(
            AppError::ReferencedByHistory { entity: "colaborador", id: 42, references: 3 }.kind(),
            ErrorKind::ReferentialSafety
        );
        assert_eq!(AppError::NluUnavailable("timeout".into()).kind(), ErrorKind::Transient);
    }

    #[test]
    fn referential_violation_maps_to_conflict_with_details() {
        let err = AppError::ReferencedByHistory { entity: "colaborador", id: 42, references: 3 };
        let api = err.to_api_error(&Locale::default(), &I18nStore::default());
        assert_eq!(api.status, StatusCode::CONFLICT);
        assert_eq!(api.details, Some(json!({ "entity": "colaborador", "references": 3 })));
    }

    #[test]
    fn referential_message_uses_brazilian_portuguese() {
        let err = AppError::ReferencedByHistory { entity: "aparelho", id: 7, references: 2 };
        assert_eq!(
            err.to_string(),
            "Não é possível excluir aparelho 7: existem 2 registros no histórico"
        );
    }

    #[test]
    fn internal_errors_hide_their_cause() {
        let err = AppError::InternalServerError(anyhow::anyhow!("segredo do banco"));
        let api = err.to_api_error(&Locale::default(), &I18nStore::default());
        assert_eq!(api.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!api.error.contains("segredo"));
    }

    #[test]
    fn invalid_transition_is_unprocessable() {
        let err = AppError::InvalidTransition {
            from: DeviceStatus::Decommissioned,
            to: DeviceStatus::InUse,
        };
        let api = err.to_api_error(&Locale("en".into()), &I18nStore::default());
        assert_eq!(api.status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(api.error.contains("Baixado/Inutilizado -> Em uso"));
    }
}
