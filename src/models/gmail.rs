// src/models/gmail.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GmailAccount {
    pub id: i64,
    pub email: String,

    #[serde(skip_serializing)] // Nunca sai na resposta
    #[schema(ignore)]
    pub password: Option<String>,

    pub recovery_phone: Option<String>,
    pub recovery_email: Option<String>,
    pub sector_id: Option<i64>,
    pub sector_name: Option<String>,
    pub employee_id: Option<i64>,
    pub employee_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GmailAccountPayload {
    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: String,
    pub password: Option<String>,
    pub recovery_phone: Option<String>,
    #[validate(email(message = "O e-mail de recuperação é inválido."))]
    pub recovery_email: Option<String>,
    pub sector_id: Option<i64>,
    pub employee_id: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_is_never_serialized() {
        let account = GmailAccount {
            id: 1,
            email: "setor@gmail.com".into(),
            password: Some("segredo".into()),
            recovery_phone: None,
            recovery_email: None,
            sector_id: None,
            sector_name: None,
            employee_id: None,
            employee_name: None,
        };
        let json = serde_json::to_string(&account).unwrap();
        assert!(!json.contains("segredo"));
        assert!(!json.contains("password"));
    }
}
