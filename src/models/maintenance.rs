// src/models/maintenance.rs

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::models::device::{validate_not_negative, DeviceStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "maintenance_status")]
pub enum MaintenanceStatus {
    #[sqlx(rename = "Em Andamento")]
    #[serde(rename = "Em Andamento")]
    InProgress,
    #[sqlx(rename = "Concluída")]
    #[serde(rename = "Concluída")]
    Completed,
    #[sqlx(rename = "Sem Reparo")]
    #[serde(rename = "Sem Reparo")]
    Unrepaired,
}

impl MaintenanceStatus {
    /// Resultado da O.S. conforme o destino do aparelho no fechamento.
    pub fn outcome_for(status: DeviceStatus) -> Self {
        if status == DeviceStatus::InStock {
            MaintenanceStatus::Completed
        } else {
            MaintenanceStatus::Unrepaired
        }
    }
}

// Ordem de serviço (O.S.)
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MaintenanceOrder {
    pub id: i64,
    pub device_id: i64,
    pub employee_id_at_send: Option<i64>,
    pub vendor: Option<String>,
    pub reported_defect: Option<String>,
    pub sent_on: NaiveDate,
    pub returned_on: Option<NaiveDate>,
    pub applied_fix: Option<String>,
    pub repair_cost: Option<Decimal>,
    pub status: MaintenanceStatus,
}

// O.S. em andamento, com os dados do aparelho para a listagem
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OpenMaintenanceOrderView {
    pub id: i64,
    pub device_id: i64,
    pub serial_number: String,
    pub brand_name: String,
    pub model_name: String,
    pub employee_id_at_send: Option<i64>,
    pub employee_name_at_send: Option<String>,
    pub vendor: Option<String>,
    pub reported_defect: Option<String>,
    pub sent_on: NaiveDate,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OpenMaintenancePayload {
    pub device_id: i64,
    #[validate(length(min = 1, message = "O fornecedor é obrigatório."))]
    pub vendor: String,
    #[validate(length(min = 1, message = "O defeito é obrigatório."))]
    pub defect: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CloseMaintenancePayload {
    pub resolution_notes: Option<String>,
    #[validate(custom(function = "validate_not_negative"))]
    #[serde(default)]
    pub cost: Decimal,
    pub outcome_status: DeviceStatus,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMaintenancePayload {
    #[validate(length(min = 1, message = "O fornecedor é obrigatório."))]
    pub vendor: String,
    #[validate(length(min = 1, message = "O defeito é obrigatório."))]
    pub defect: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcome_depends_on_destination() {
        assert_eq!(MaintenanceStatus::outcome_for(DeviceStatus::InStock), MaintenanceStatus::Completed);
        assert_eq!(
            MaintenanceStatus::outcome_for(DeviceStatus::Decommissioned),
            MaintenanceStatus::Unrepaired
        );
    }
}
