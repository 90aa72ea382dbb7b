// src/db/backup_repo.rs

use sqlx::{Executor, PgConnection, PgPool, Postgres, Transaction};

use crate::common::error::AppError;

/// Tabelas de entidade na ordem em que podem ser recriadas (pais antes dos filhos).
pub const BACKUP_TABLES: [&str; 9] = [
    "users",
    "sectors",
    "brands",
    "models",
    "employees",
    "devices",
    "movement_history",
    "maintenance_orders",
    "gmail_accounts",
];

/// Estrutura interna que a restauração nunca apaga.
const INTERNAL_TABLES: [&str; 1] = ["_sqlx_migrations"];

// Chave do advisory lock que serializa backup e restauração
const BACKUP_LOCK_KEY: i64 = 0x4153_5345_5446_4c57;

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

#[derive(Clone)]
pub struct BackupRepository {
    pool: PgPool,
}

impl BackupRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Linhas de cada tabela como JSON, lidas de um mesmo snapshot.
    pub async fn dump_rows(&self) -> Result<Vec<(&'static str, Vec<String>)>, AppError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ, READ ONLY")
            .execute(&mut *tx)
            .await?;
        sqlx::query("SELECT pg_advisory_xact_lock_shared($1)")
            .bind(BACKUP_LOCK_KEY)
            .execute(&mut *tx)
            .await?;

        let mut tables = Vec::with_capacity(BACKUP_TABLES.len());
        for table in BACKUP_TABLES {
            let sql = format!("SELECT row_to_json(t)::text FROM {} t ORDER BY t.id", quote_ident(table));
            let rows = sqlx::query_scalar::<_, String>(&sql)
                .fetch_all(&mut *tx)
                .await?;
            tables.push((table, rows));
        }

        tx.commit().await?;
        Ok(tables)
    }

    pub async fn begin_restore(&self) -> Result<ExclusiveRestore, AppError> {
        ExclusiveRestore::acquire(&self.pool).await
    }
}

/// Acesso exclusivo ao banco durante a restauração.
///
/// Tudo acontece numa única transação: se o guarda for descartado sem
/// `commit`, a transação sofre rollback e os locks são liberados.
pub struct ExclusiveRestore {
    tx: Transaction<'static, Postgres>,
}

impl ExclusiveRestore {
    async fn acquire(pool: &PgPool) -> Result<Self, AppError> {
        let mut tx = pool.begin().await?;

        sqlx::query("SELECT pg_advisory_xact_lock($1)")
            .bind(BACKUP_LOCK_KEY)
            .execute(&mut *tx)
            .await?;

        let tables = Self::entity_tables(&mut tx).await?;
        if !tables.is_empty() {
            let list = tables.iter().map(|t| quote_ident(t)).collect::<Vec<_>>().join(", ");
            sqlx::query(&format!("LOCK TABLE {} IN ACCESS EXCLUSIVE MODE", list))
                .execute(&mut *tx)
                .await?;
        }

        tracing::warn!("🔒 Acesso exclusivo adquirido para restauração ({} tabelas)", tables.len());
        Ok(Self { tx })
    }

    async fn entity_tables(tx: &mut Transaction<'static, Postgres>) -> Result<Vec<String>, AppError> {
        let tables = sqlx::query_scalar::<_, String>(
            "SELECT tablename::text FROM pg_tables WHERE schemaname = 'public' AND tablename <> ALL($1)",
        )
        .bind(&INTERNAL_TABLES[..])
        .fetch_all(&mut **tx)
        .await?;
        Ok(tables)
    }

    /// Apaga todas as tabelas de entidade e os tipos enum do esquema público.
    pub async fn drop_entity_tables(&mut self) -> Result<usize, AppError> {
        let tables = Self::entity_tables(&mut self.tx).await?;
        for table in &tables {
            sqlx::query(&format!("DROP TABLE IF EXISTS {} CASCADE", quote_ident(table)))
                .execute(&mut *self.tx)
                .await?;
        }

        let enum_types = sqlx::query_scalar::<_, String>(
            r#"
            SELECT t.typname::text
            FROM pg_type t
            JOIN pg_namespace n ON n.oid = t.typnamespace
            WHERE n.nspname = 'public' AND t.typtype = 'e'
            "#,
        )
        .fetch_all(&mut *self.tx)
        .await?;
        for enum_type in &enum_types {
            sqlx::query(&format!("DROP TYPE IF EXISTS {} CASCADE", quote_ident(enum_type)))
                .execute(&mut *self.tx)
                .await?;
        }

        Ok(tables.len())
    }

    /// Executa o script completo (esquema + dados).
    pub async fn replay(&mut self, script: &str) -> Result<(), AppError> {
        // Conexão concreta: o future do raw_sql precisa ser Send para o handler
        let conn: &mut PgConnection = &mut self.tx;
        conn.execute(sqlx::raw_sql(script))
            .await
            .map_err(|e| AppError::RestoreFailed(e.to_string()))?;
        Ok(())
    }

    pub async fn commit(self) -> Result<(), AppError> {
        self.tx.commit().await?;
        tracing::info!("🔓 Restauração concluída, acesso exclusivo liberado");
        Ok(())
    }
}
