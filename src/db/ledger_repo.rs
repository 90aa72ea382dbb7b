// src/db/ledger_repo.rs

use sqlx::{Executor, PgPool, Postgres};

use crate::{
    common::{db_utils::{like_pattern, map_foreign_key}, error::AppError},
    models::{
        device::DeviceStatus,
        document::HandoverSource,
        ledger::{CurrentState, HistoryFilter, MovementEntry, MovementHistoryRow},
    },
};

/// Única definição de "estado atual": a entrada mais recente de cada aparelho,
/// com empate de horário resolvido pelo maior id. Quem precisar do responsável
/// ou da localização atual faz `WITH {CURRENT_STATE_CTE}` e junta por `device_id`.
pub(crate) const CURRENT_STATE_CTE: &str = r#"
    current_state AS (
        SELECT DISTINCT ON (device_id)
            device_id,
            id AS entry_id,
            status,
            employee_id AS holder_id,
            location,
            moved_at
        FROM movement_history
        ORDER BY device_id, moved_at DESC, id DESC
    )
"#;

const MOVEMENT_COLUMNS: &str =
    "id, moved_at, device_id, employee_id, status, location, notes, checklist";

/// Nova entrada a ser gravada no histórico.
#[derive(Debug, Clone)]
pub struct NewMovement<'a> {
    pub device_id: i64,
    pub employee_id: Option<i64>,
    pub status: DeviceStatus,
    pub location: Option<&'a str>,
    pub notes: Option<&'a str>,
    pub checklist: Option<serde_json::Value>,
}

// O repositório do histórico de movimentações. Só faz INSERT e SELECT.
#[derive(Clone)]
pub struct LedgerRepository {
    pool: PgPool,
}

impl LedgerRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn current_state<'e, E>(
        &self,
        executor: E,
        device_id: i64,
    ) -> Result<Option<CurrentState>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            "WITH {CURRENT_STATE_CTE}
             SELECT device_id, entry_id, status, holder_id, location, moved_at
             FROM current_state
             WHERE device_id = $1"
        );
        let state = sqlx::query_as::<_, CurrentState>(&sql)
            .bind(device_id)
            .fetch_optional(executor)
            .await?;
        Ok(state)
    }

    /// Último colaborador não nulo registrado para o aparelho.
    pub async fn last_known_holder<'e, E>(
        &self,
        executor: E,
        device_id: i64,
    ) -> Result<Option<i64>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let holder = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT employee_id
            FROM movement_history
            WHERE device_id = $1 AND employee_id IS NOT NULL
            ORDER BY moved_at DESC, id DESC
            LIMIT 1
            "#,
        )
        .bind(device_id)
        .fetch_optional(executor)
        .await?;
        Ok(holder)
    }

    pub async fn append<'e, E>(
        &self,
        executor: E,
        movement: NewMovement<'_>,
    ) -> Result<MovementEntry, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            "INSERT INTO movement_history (device_id, employee_id, status, location, notes, checklist, moved_at)
             VALUES ($1, $2, $3, $4, $5, $6, clock_timestamp())
             RETURNING {MOVEMENT_COLUMNS}"
        );
        let reference = match movement.employee_id {
            Some(id) => format!("colaborador {}", id),
            None => format!("aparelho {}", movement.device_id),
        };
        sqlx::query_as::<_, MovementEntry>(&sql)
            .bind(movement.device_id)
            .bind(movement.employee_id)
            .bind(movement.status)
            .bind(movement.location)
            .bind(movement.notes)
            .bind(movement.checklist)
            .fetch_one(executor)
            .await
            .map_err(|e| map_foreign_key(e, &reference))
    }

    pub async fn find_entry(&self, entry_id: i64) -> Result<Option<MovementEntry>, AppError> {
        let sql = format!("SELECT {MOVEMENT_COLUMNS} FROM movement_history WHERE id = $1");
        let entry = sqlx::query_as::<_, MovementEntry>(&sql)
            .bind(entry_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(entry)
    }

    /// Histórico completo do aparelho, do mais recente para o mais antigo.
    pub async fn entries_for_device<'e, E>(
        &self,
        executor: E,
        device_id: i64,
    ) -> Result<Vec<MovementEntry>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            "SELECT {MOVEMENT_COLUMNS} FROM movement_history
             WHERE device_id = $1
             ORDER BY moved_at DESC, id DESC"
        );
        let entries = sqlx::query_as::<_, MovementEntry>(&sql)
            .bind(device_id)
            .fetch_all(executor)
            .await?;
        Ok(entries)
    }

    pub async fn search(&self, filter: &HistoryFilter) -> Result<Vec<MovementHistoryRow>, AppError> {
        let serial = filter.serial_number.as_deref().filter(|s| !s.trim().is_empty()).map(like_pattern);
        let employee = filter.employee_name.as_deref().filter(|s| !s.trim().is_empty()).map(like_pattern);

        let rows = sqlx::query_as::<_, MovementHistoryRow>(
            r#"
            SELECT
                m.id, m.moved_at, m.device_id, d.serial_number,
                m.employee_id, e.full_name AS employee_name,
                m.status, m.location, m.notes
            FROM movement_history m
            JOIN devices d ON d.id = m.device_id
            LEFT JOIN employees e ON e.id = m.employee_id
            WHERE ($1::device_status IS NULL OR m.status = $1)
              AND ($2::date IS NULL OR m.moved_at::date >= $2)
              AND ($3::date IS NULL OR m.moved_at::date <= $3)
              AND ($4::text IS NULL OR d.serial_number ILIKE $4)
              AND ($5::text IS NULL OR e.full_name ILIKE $5)
            ORDER BY m.moved_at DESC, m.id DESC
            LIMIT 1000
            "#,
        )
        .bind(filter.status)
        .bind(filter.from)
        .bind(filter.to)
        .bind(serial)
        .bind(employee)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn count_for_employee<'e, E>(&self, executor: E, employee_id: i64) -> Result<i64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let total = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM movement_history WHERE employee_id = $1",
        )
        .bind(employee_id)
        .fetch_one(executor)
        .await?;
        Ok(total)
    }

    pub async fn count_for_device<'e, E>(&self, executor: E, device_id: i64) -> Result<i64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let total = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM movement_history WHERE device_id = $1",
        )
        .bind(device_id)
        .fetch_one(executor)
        .await?;
        Ok(total)
    }

    /// Dados para o termo de responsabilidade. Só entregas ("Em uso" com colaborador).
    pub async fn handover_source(&self, entry_id: i64) -> Result<Option<HandoverSource>, AppError> {
        let source = sqlx::query_as::<_, HandoverSource>(
            r#"
            SELECT
                m.id AS entry_id,
                m.moved_at::date AS moved_on,
                e.full_name AS employee_name,
                e.cpf AS employee_cpf,
                s.name AS employee_sector,
                e.gmail AS employee_email,
                b.name AS brand_name,
                md.name AS model_name,
                d.serial_number,
                d.imei1,
                d.imei2
            FROM movement_history m
            JOIN employees e ON e.id = m.employee_id
            LEFT JOIN sectors s ON s.id = e.sector_id
            JOIN devices d ON d.id = m.device_id
            JOIN models md ON md.id = d.model_id
            JOIN brands b ON b.id = md.brand_id
            WHERE m.id = $1 AND m.status = 'Em uso'
            "#,
        )
        .bind(entry_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(source)
    }
}
