// src/models/dashboard.rs

use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::models::device::DeviceStatus;

// Os cards do topo
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub total_devices: i64,
    pub total_value: Decimal, // Soma do valor de todos os aparelhos
    pub total_employees: i64,
    pub devices_by_status: Vec<StatusCount>,
}

// Gráfico de aparelhos por status
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatusCount {
    pub status: DeviceStatus,
    pub total: i64,
}
