// src/services/user_service.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::UserRepository,
    models::auth::{User, UserRole},
    services::auth::hash_password,
};

#[derive(Clone)]
pub struct UserService {
    user_repo: UserRepository,
    pool: PgPool,
}

impl UserService {
    pub fn new(user_repo: UserRepository, pool: PgPool) -> Self {
        Self { user_repo, pool }
    }

    pub async fn create_user(&self, login: &str, name: &str, password: &str, role: UserRole) -> Result<User, AppError> {
        // Hashing fora da transação, pois não toca no banco
        let hashed_password = hash_password(password).await?;
        let user = self
            .user_repo
            .create_user(&self.pool, login, name, &hashed_password, role)
            .await?;
        tracing::info!("🔑 Usuário '{}' criado com perfil {}", user.login, role.as_str());
        Ok(user)
    }

    pub async fn list_users(&self) -> Result<Vec<User>, AppError> {
        self.user_repo.list().await
    }

    pub async fn update_user(&self, id: Uuid, name: &str, role: UserRole) -> Result<User, AppError> {
        self.user_repo
            .update_user(id, name, role)
            .await?
            .ok_or(AppError::UserNotFound)
    }

    /// Cria o administrador inicial quando a tabela de usuários está vazia.
    /// Devolve `true` se criou.
    pub async fn bootstrap_admin(&self, login: &str, password: &str) -> Result<bool, AppError> {
        if self.user_repo.count(&self.pool).await? > 0 {
            return Ok(false);
        }
        let hashed_password = hash_password(password).await?;

        let mut tx = self.pool.begin().await?;
        // Evita dois processos criando o admin ao mesmo tempo
        sqlx::query("LOCK TABLE users IN SHARE ROW EXCLUSIVE MODE")
            .execute(&mut *tx)
            .await?;

        if self.user_repo.count(&mut *tx).await? > 0 {
            return Ok(false);
        }

        self.user_repo
            .create_user(&mut *tx, login, "Administrador", &hashed_password, UserRole::Admin)
            .await?;
        tx.commit().await?;

        tracing::info!("🔑 Administrador inicial '{}' criado", login);
        Ok(true)
    }
}
