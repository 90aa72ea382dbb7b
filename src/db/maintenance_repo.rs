// src/db/maintenance_repo.rs

use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};

use crate::{
    common::{db_utils::unique_violation, error::AppError},
    models::maintenance::{MaintenanceOrder, MaintenanceStatus, OpenMaintenanceOrderView},
};

const ORDER_COLUMNS: &str = "id, device_id, employee_id_at_send, vendor, reported_defect, \
     sent_on, returned_on, applied_fix, repair_cost, status";

#[derive(Clone)]
pub struct MaintenanceRepository {
    pool: PgPool,
}

impl MaintenanceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Abre uma O.S. `Em Andamento`. O índice parcial garante uma aberta por aparelho.
    pub async fn open<'e, E>(
        &self,
        executor: E,
        device_id: i64,
        employee_id_at_send: Option<i64>,
        vendor: Option<&str>,
        defect: Option<&str>,
    ) -> Result<MaintenanceOrder, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            "INSERT INTO maintenance_orders (device_id, employee_id_at_send, vendor, reported_defect)
             VALUES ($1, $2, $3, $4)
             RETURNING {ORDER_COLUMNS}"
        );
        sqlx::query_as::<_, MaintenanceOrder>(&sql)
            .bind(device_id)
            .bind(employee_id_at_send)
            .bind(vendor)
            .bind(defect)
            .fetch_one(executor)
            .await
            .map_err(|e| {
                if unique_violation(&e) == Some("maintenance_orders_one_open_per_device") {
                    return AppError::MaintenanceOrderAlreadyOpen(device_id);
                }
                e.into()
            })
    }

    pub async fn find_for_update<'e, E>(&self, executor: E, id: i64) -> Result<Option<MaintenanceOrder>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!("SELECT {ORDER_COLUMNS} FROM maintenance_orders WHERE id = $1 FOR UPDATE");
        let order = sqlx::query_as::<_, MaintenanceOrder>(&sql)
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(order)
    }

    pub async fn find_open_for_device<'e, E>(
        &self,
        executor: E,
        device_id: i64,
    ) -> Result<Option<MaintenanceOrder>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            "SELECT {ORDER_COLUMNS} FROM maintenance_orders
             WHERE device_id = $1 AND status = 'Em Andamento'
             FOR UPDATE"
        );
        let order = sqlx::query_as::<_, MaintenanceOrder>(&sql)
            .bind(device_id)
            .fetch_optional(executor)
            .await?;
        Ok(order)
    }

    pub async fn close<'e, E>(
        &self,
        executor: E,
        id: i64,
        applied_fix: Option<&str>,
        repair_cost: Decimal,
        status: MaintenanceStatus,
    ) -> Result<MaintenanceOrder, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            "UPDATE maintenance_orders
             SET returned_on = CURRENT_DATE, applied_fix = $2, repair_cost = $3, status = $4
             WHERE id = $1 AND status = 'Em Andamento'
             RETURNING {ORDER_COLUMNS}"
        );
        sqlx::query_as::<_, MaintenanceOrder>(&sql)
            .bind(id)
            .bind(applied_fix)
            .bind(repair_cost)
            .bind(status)
            .fetch_optional(executor)
            .await?
            .ok_or(AppError::MaintenanceOrderNotOpen(id))
    }

    pub async fn update_details<'e, E>(
        &self,
        executor: E,
        id: i64,
        vendor: &str,
        defect: &str,
    ) -> Result<Option<MaintenanceOrder>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            "UPDATE maintenance_orders
             SET vendor = $2, reported_defect = $3
             WHERE id = $1 AND status = 'Em Andamento'
             RETURNING {ORDER_COLUMNS}"
        );
        let order = sqlx::query_as::<_, MaintenanceOrder>(&sql)
            .bind(id)
            .bind(vendor)
            .bind(defect)
            .fetch_optional(executor)
            .await?;
        Ok(order)
    }

    pub async fn list_open(&self) -> Result<Vec<OpenMaintenanceOrderView>, AppError> {
        let orders = sqlx::query_as::<_, OpenMaintenanceOrderView>(
            r#"
            SELECT
                o.id, o.device_id, d.serial_number,
                b.name AS brand_name, m.name AS model_name,
                o.employee_id_at_send, e.full_name AS employee_name_at_send,
                o.vendor, o.reported_defect, o.sent_on
            FROM maintenance_orders o
            JOIN devices d ON d.id = o.device_id
            JOIN models m ON m.id = d.model_id
            JOIN brands b ON b.id = m.brand_id
            LEFT JOIN employees e ON e.id = o.employee_id_at_send
            WHERE o.status = 'Em Andamento'
            ORDER BY o.sent_on, o.id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(orders)
    }

    pub async fn list_for_device(&self, device_id: i64) -> Result<Vec<MaintenanceOrder>, AppError> {
        let sql = format!(
            "SELECT {ORDER_COLUMNS} FROM maintenance_orders
             WHERE device_id = $1
             ORDER BY sent_on DESC, id DESC"
        );
        let orders = sqlx::query_as::<_, MaintenanceOrder>(&sql)
            .bind(device_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(orders)
    }
}
