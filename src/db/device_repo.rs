// src/db/device_repo.rs

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};

use crate::{
    common::{
        db_utils::{like_pattern, unique_violation},
        error::AppError,
    },
    db::ledger_repo::CURRENT_STATE_CTE,
    models::{
        device::{Device, DeviceStatus, DeviceView},
        import::DeviceExportRow,
    },
};

const DEVICE_COLUMNS: &str =
    "id, serial_number, model_id, imei1, imei2, value, acquired_on, status";

/// Campos editáveis de um aparelho. O status nunca é editado por aqui.
#[derive(Debug, Clone)]
pub struct DeviceFields<'a> {
    pub serial_number: &'a str,
    pub model_id: i64,
    pub imei1: Option<&'a str>,
    pub imei2: Option<&'a str>,
    pub value: Decimal,
}

fn map_device_error(e: sqlx::Error, serial_number: &str, model_id: i64) -> AppError {
    if unique_violation(&e) == Some("devices_serial_number_key") {
        return AppError::SerialNumberAlreadyExists(serial_number.to_string());
    }
    if let sqlx::Error::Database(db_err) = &e {
        if db_err.is_foreign_key_violation() {
            return AppError::UnknownReference(format!("modelo {}", model_id));
        }
    }
    e.into()
}

#[derive(Clone)]
pub struct DeviceRepository {
    pool: PgPool,
}

impl DeviceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create<'e, E>(
        &self,
        executor: E,
        fields: &DeviceFields<'_>,
        acquired_on: NaiveDate,
        status: DeviceStatus,
    ) -> Result<Device, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            "INSERT INTO devices (serial_number, model_id, imei1, imei2, value, acquired_on, status)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {DEVICE_COLUMNS}"
        );
        sqlx::query_as::<_, Device>(&sql)
            .bind(fields.serial_number)
            .bind(fields.model_id)
            .bind(fields.imei1)
            .bind(fields.imei2)
            .bind(fields.value)
            .bind(acquired_on)
            .bind(status)
            .fetch_one(executor)
            .await
            .map_err(|e| map_device_error(e, fields.serial_number, fields.model_id))
    }

    pub async fn update<'e, E>(
        &self,
        executor: E,
        id: i64,
        fields: &DeviceFields<'_>,
    ) -> Result<Option<Device>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            "UPDATE devices
             SET serial_number = $2, model_id = $3, imei1 = $4, imei2 = $5, value = $6
             WHERE id = $1
             RETURNING {DEVICE_COLUMNS}"
        );
        sqlx::query_as::<_, Device>(&sql)
            .bind(id)
            .bind(fields.serial_number)
            .bind(fields.model_id)
            .bind(fields.imei1)
            .bind(fields.imei2)
            .bind(fields.value)
            .fetch_optional(executor)
            .await
            .map_err(|e| map_device_error(e, fields.serial_number, fields.model_id))
    }

    /// Trava a linha do aparelho até o fim da transação.
    pub async fn find_for_update<'e, E>(&self, executor: E, id: i64) -> Result<Option<Device>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!("SELECT {DEVICE_COLUMNS} FROM devices WHERE id = $1 FOR UPDATE");
        let device = sqlx::query_as::<_, Device>(&sql)
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(device)
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<Device>, AppError> {
        let sql = format!("SELECT {DEVICE_COLUMNS} FROM devices WHERE id = $1");
        let device = sqlx::query_as::<_, Device>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(device)
    }

    pub async fn find_by_serial<'e, E>(&self, executor: E, serial_number: &str) -> Result<Option<Device>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!("SELECT {DEVICE_COLUMNS} FROM devices WHERE serial_number = $1");
        let device = sqlx::query_as::<_, Device>(&sql)
            .bind(serial_number.trim())
            .fetch_optional(executor)
            .await?;
        Ok(device)
    }

    /// Mantém a coluna `status` igual ao status da última movimentação.
    pub async fn set_status<'e, E>(&self, executor: E, id: i64, status: DeviceStatus) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("UPDATE devices SET status = $2 WHERE id = $1")
            .bind(id)
            .bind(status)
            .execute(executor)
            .await?;
        Ok(())
    }

    pub async fn delete<'e, E>(&self, executor: E, id: i64) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM devices WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected())
    }

    /// Inventário com o responsável e a localização atuais.
    /// `search` filtra por número de série ou nome do responsável.
    pub async fn list_inventory(
        &self,
        search: Option<&str>,
        status: Option<DeviceStatus>,
    ) -> Result<Vec<DeviceView>, AppError> {
        let pattern = search.filter(|s| !s.trim().is_empty()).map(like_pattern);
        let sql = format!(
            "WITH {CURRENT_STATE_CTE}
             SELECT
                 d.id, d.serial_number, b.name AS brand_name, m.name AS model_name,
                 d.imei1, d.imei2, d.value, d.acquired_on, d.status,
                 cs.holder_id, e.full_name AS holder_name, cs.location,
                 cs.moved_at AS last_moved_at
             FROM devices d
             JOIN models m ON m.id = d.model_id
             JOIN brands b ON b.id = m.brand_id
             LEFT JOIN current_state cs ON cs.device_id = d.id
             LEFT JOIN employees e ON e.id = cs.holder_id
             WHERE ($1::text IS NULL OR d.serial_number ILIKE $1 OR e.full_name ILIKE $1)
               AND ($2::device_status IS NULL OR d.status = $2)
             ORDER BY d.serial_number"
        );
        let devices = sqlx::query_as::<_, DeviceView>(&sql)
            .bind(pattern)
            .bind(status)
            .fetch_all(&self.pool)
            .await?;
        Ok(devices)
    }

    pub async fn export_rows(&self) -> Result<Vec<DeviceExportRow>, AppError> {
        let sql = format!(
            "WITH {CURRENT_STATE_CTE}
             SELECT
                 d.serial_number AS numero_serie,
                 d.imei1, d.imei2,
                 d.value AS valor,
                 b.name || ' - ' || m.name AS modelo_completo,
                 d.status::text AS status,
                 e.full_name AS responsavel_atual
             FROM devices d
             JOIN models m ON m.id = d.model_id
             JOIN brands b ON b.id = m.brand_id
             LEFT JOIN current_state cs ON cs.device_id = d.id
             LEFT JOIN employees e ON e.id = cs.holder_id
             ORDER BY d.serial_number"
        );
        let rows = sqlx::query_as::<_, DeviceExportRow>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }
}
