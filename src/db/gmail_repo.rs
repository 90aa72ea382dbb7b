// src/db/gmail_repo.rs

use sqlx::{Executor, PgPool, Postgres};

use crate::{
    common::{db_utils::unique_violation, error::AppError},
    models::gmail::{GmailAccount, GmailAccountPayload},
};

// Sempre devolve a conta com os nomes de setor e colaborador resolvidos
const SELECT_ACCOUNT: &str = r#"
    SELECT
        g.id, g.email, g.password, g.recovery_phone, g.recovery_email,
        g.sector_id, s.name AS sector_name,
        g.employee_id, e.full_name AS employee_name
    FROM saved g
    LEFT JOIN sectors s ON s.id = g.sector_id
    LEFT JOIN employees e ON e.id = g.employee_id
"#;

fn map_gmail_error(e: sqlx::Error, email: &str) -> AppError {
    if unique_violation(&e) == Some("gmail_accounts_email_key") {
        return AppError::GmailAlreadyExists(email.to_string());
    }
    if let sqlx::Error::Database(db_err) = &e {
        if db_err.is_foreign_key_violation() {
            return AppError::UnknownReference("setor ou colaborador".to_string());
        }
    }
    e.into()
}

#[derive(Clone)]
pub struct GmailRepository {
    pool: PgPool,
}

impl GmailRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create<'e, E>(&self, executor: E, payload: &GmailAccountPayload) -> Result<GmailAccount, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            "WITH saved AS (
                 INSERT INTO gmail_accounts
                     (email, password, recovery_phone, recovery_email, sector_id, employee_id)
                 VALUES ($1, $2, $3, $4, $5, $6)
                 RETURNING *
             )
             {SELECT_ACCOUNT}"
        );
        sqlx::query_as::<_, GmailAccount>(&sql)
            .bind(payload.email.trim())
            .bind(payload.password.as_deref())
            .bind(payload.recovery_phone.as_deref())
            .bind(payload.recovery_email.as_deref())
            .bind(payload.sector_id)
            .bind(payload.employee_id)
            .fetch_one(executor)
            .await
            .map_err(|e| map_gmail_error(e, &payload.email))
    }

    pub async fn update(&self, id: i64, payload: &GmailAccountPayload) -> Result<Option<GmailAccount>, AppError> {
        let sql = format!(
            "WITH saved AS (
                 UPDATE gmail_accounts
                 SET email = $2, password = COALESCE($3, password), recovery_phone = $4,
                     recovery_email = $5, sector_id = $6, employee_id = $7
                 WHERE id = $1
                 RETURNING *
             )
             {SELECT_ACCOUNT}"
        );
        sqlx::query_as::<_, GmailAccount>(&sql)
            .bind(id)
            .bind(payload.email.trim())
            .bind(payload.password.as_deref())
            .bind(payload.recovery_phone.as_deref())
            .bind(payload.recovery_email.as_deref())
            .bind(payload.sector_id)
            .bind(payload.employee_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_gmail_error(e, &payload.email))
    }

    pub async fn list(&self) -> Result<Vec<GmailAccount>, AppError> {
        let sql = format!(
            "WITH saved AS (SELECT * FROM gmail_accounts)
             {SELECT_ACCOUNT}
             ORDER BY g.email"
        );
        let accounts = sqlx::query_as::<_, GmailAccount>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(accounts)
    }
}
