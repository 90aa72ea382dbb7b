// src/db/user_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::{db_utils::unique_violation, error::AppError},
    models::auth::{User, UserRole},
};

const USER_COLUMNS: &str = "id, login, name, password_hash, role, created_at, updated_at";

// O repositório de usuários, responsável por todas as interações com a tabela 'users'
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // Busca um usuário pelo login
    pub async fn find_by_login(&self, login: &str) -> Result<Option<User>, AppError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE login = $1");
        let maybe_user = sqlx::query_as::<_, User>(&sql)
            .bind(login.trim())
            .fetch_optional(&self.pool)
            .await?;
        Ok(maybe_user)
    }

    // Busca um usuário pelo seu ID
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        let maybe_user = sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(maybe_user)
    }

    pub async fn list(&self) -> Result<Vec<User>, AppError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users ORDER BY name");
        let users = sqlx::query_as::<_, User>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(users)
    }

    pub async fn count<'e, E>(&self, executor: E) -> Result<i64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
            .fetch_one(executor)
            .await?;
        Ok(total)
    }

    // Cria um novo usuário, com tratamento de erro específico para login duplicado.
    pub async fn create_user<'e, E>(
        &self,
        executor: E,
        login: &str,
        name: &str,
        password_hash: &str,
        role: UserRole,
    ) -> Result<User, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            "INSERT INTO users (id, login, name, password_hash, role)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {USER_COLUMNS}"
        );
        sqlx::query_as::<_, User>(&sql)
            .bind(Uuid::new_v4())
            .bind(login.trim())
            .bind(name.trim())
            .bind(password_hash)
            .bind(role)
            .fetch_one(executor)
            .await
            .map_err(|e| {
                // O nome padrão que o Postgres cria para "UNIQUE" na coluna login
                if unique_violation(&e) == Some("users_login_key") {
                    return AppError::LoginAlreadyExists(login.trim().to_string());
                }
                e.into()
            })
    }

    pub async fn update_user(&self, id: Uuid, name: &str, role: UserRole) -> Result<Option<User>, AppError> {
        let sql = format!(
            "UPDATE users SET name = $2, role = $3, updated_at = NOW()
             WHERE id = $1
             RETURNING {USER_COLUMNS}"
        );
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .bind(name.trim())
            .bind(role)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }
}
