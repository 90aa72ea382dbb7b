// src/services/gmail_service.rs

use sqlx::{Acquire, Postgres};

use crate::{
    common::error::AppError,
    db::GmailRepository,
    models::gmail::{GmailAccount, GmailAccountPayload},
};

#[derive(Clone)]
pub struct GmailService {
    gmail_repo: GmailRepository,
}

impl GmailService {
    pub fn new(gmail_repo: GmailRepository) -> Self {
        Self { gmail_repo }
    }

    pub async fn create_account<'e, E>(&self, executor: E, payload: &GmailAccountPayload) -> Result<GmailAccount, AppError>
    where
        E: Acquire<'e, Database = Postgres>,
    {
        let mut conn = executor.acquire().await?;
        self.gmail_repo.create(&mut *conn, payload).await
    }

    /// Senha omitida no payload mantém a senha atual.
    pub async fn update_account(&self, id: i64, payload: &GmailAccountPayload) -> Result<GmailAccount, AppError> {
        self.gmail_repo
            .update(id, payload)
            .await?
            .ok_or(AppError::GmailAccountNotFound(id))
    }

    pub async fn list_accounts(&self) -> Result<Vec<GmailAccount>, AppError> {
        self.gmail_repo.list().await
    }
}
