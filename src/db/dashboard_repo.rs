// src/db/dashboard_repo.rs

use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::{
    common::error::AppError,
    models::dashboard::{DashboardSummary, StatusCount},
};

#[derive(Clone)]
pub struct DashboardRepository {
    pool: PgPool,
}

impl DashboardRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn get_summary(&self) -> Result<DashboardSummary, AppError> {
        // Todas as contagens lidas do mesmo snapshot
        let mut tx = self.pool.begin().await?;
        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ, READ ONLY")
            .execute(&mut *tx)
            .await?;

        // A. Aparelhos e valor do inventário
        let (total_devices, total_value) = sqlx::query_as::<_, (i64, Decimal)>(
            "SELECT COUNT(*), COALESCE(SUM(value), 0) FROM devices",
        )
        .fetch_one(&mut *tx)
        .await?;

        // B. Colaboradores
        let total_employees = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM employees")
            .fetch_one(&mut *tx)
            .await?;

        // C. Aparelhos por status (os quatro sempre aparecem)
        let devices_by_status = sqlx::query_as::<_, StatusCount>(
            r#"
            SELECT s.status, COUNT(d.id) AS total
            FROM unnest(enum_range(NULL::device_status)) AS s(status)
            LEFT JOIN devices d ON d.status = s.status
            GROUP BY s.status
            ORDER BY s.status
            "#,
        )
        .fetch_all(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(DashboardSummary {
            total_devices,
            total_value,
            total_employees,
            devices_by_status,
        })
    }
}
