// src/models/auth.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

// Perfis de acesso, do mais para o menos privilegiado
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "user_role")]
pub enum UserRole {
    #[sqlx(rename = "Leitor")]
    #[serde(rename = "Leitor")]
    Reader,
    #[sqlx(rename = "Editor")]
    #[serde(rename = "Editor")]
    Editor,
    #[sqlx(rename = "Administrador")]
    #[serde(rename = "Administrador")]
    Admin,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Reader => "Leitor",
            UserRole::Editor => "Editor",
            UserRole::Admin => "Administrador",
        }
    }

    /// `Administrador` pode tudo que `Editor` pode, e assim por diante.
    pub fn allows(&self, required: UserRole) -> bool {
        *self >= required
    }
}

// Representa um usuário (operador do sistema) vindo do banco de dados
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub login: String,
    pub name: String,

    #[serde(skip_serializing)] // IMPORTANTE para segurança
    #[schema(ignore)]
    pub password_hash: String,

    pub role: UserRole,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Dados para login
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginUserPayload {
    #[validate(length(min = 1, message = "O login é obrigatório."))]
    pub login: String,
    #[validate(length(min = 6, message = "A senha deve ter no mínimo 6 caracteres."))]
    pub password: String,
}

// Cadastro de usuário (somente administradores)
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateUserPayload {
    #[validate(length(min = 3, message = "O login deve ter no mínimo 3 caracteres."))]
    pub login: String,
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub name: String,
    #[validate(length(min = 6, message = "A senha deve ter no mínimo 6 caracteres."))]
    pub password: String,
    pub role: UserRole,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateUserPayload {
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub name: String,
    pub role: UserRole,
}

// Resposta de autenticação com o token
#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponse {
    pub token: String,
}

// Estrutura de dados ("claims") dentro do JWT
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,  // Subject (ID do usuário)
    pub exp: usize, // Expiration time (quando o token expira)
    pub iat: usize, // Issued At (quando o token foi criado)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roles_are_ordered_by_privilege() {
        assert!(UserRole::Admin.allows(UserRole::Editor));
        assert!(UserRole::Editor.allows(UserRole::Editor));
        assert!(!UserRole::Reader.allows(UserRole::Editor));
        assert!(!UserRole::Editor.allows(UserRole::Admin));
    }
}
