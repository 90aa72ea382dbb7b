// src/models/device.rs

use std::{fmt, str::FromStr};

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError};

use crate::common::error::AppError;

// Os quatro status possíveis de um aparelho (enum `device_status` no banco)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "device_status")]
pub enum DeviceStatus {
    #[sqlx(rename = "Em estoque")]
    #[serde(rename = "Em estoque")]
    InStock,
    #[sqlx(rename = "Em uso")]
    #[serde(rename = "Em uso")]
    InUse,
    #[sqlx(rename = "Em manutenção")]
    #[serde(rename = "Em manutenção")]
    InMaintenance,
    #[sqlx(rename = "Baixado/Inutilizado")]
    #[serde(rename = "Baixado/Inutilizado")]
    Decommissioned,
}

impl DeviceStatus {
    pub const ALL: [DeviceStatus; 4] = [
        DeviceStatus::InStock,
        DeviceStatus::InUse,
        DeviceStatus::InMaintenance,
        DeviceStatus::Decommissioned,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceStatus::InStock => "Em estoque",
            DeviceStatus::InUse => "Em uso",
            DeviceStatus::InMaintenance => "Em manutenção",
            DeviceStatus::Decommissioned => "Baixado/Inutilizado",
        }
    }
}

impl fmt::Display for DeviceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// Aceita o nome exato, ignorando caixa e espaços nas pontas (planilhas e chat)
impl FromStr for DeviceStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        DeviceStatus::ALL
            .into_iter()
            .find(|status| status.as_str().to_lowercase() == wanted)
            .ok_or_else(|| AppError::InvalidInput(format!("status desconhecido '{}'", s.trim())))
    }
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    pub id: i64,
    pub serial_number: String,
    pub model_id: i64,
    pub imei1: Option<String>,
    pub imei2: Option<String>,
    pub value: Decimal,
    pub acquired_on: NaiveDate,
    pub status: DeviceStatus,
}

// Linha do inventário: aparelho + estado atual derivado do histórico
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeviceView {
    pub id: i64,
    pub serial_number: String,
    pub brand_name: String,
    pub model_name: String,
    pub imei1: Option<String>,
    pub imei2: Option<String>,
    pub value: Decimal,
    pub acquired_on: NaiveDate,
    pub status: DeviceStatus,
    pub holder_id: Option<i64>,
    pub holder_name: Option<String>,
    pub location: Option<String>,
    pub last_moved_at: Option<DateTime<Utc>>,
}

pub(crate) fn validate_not_negative(val: &Decimal) -> Result<(), ValidationError> {
    if val.is_sign_negative() {
        let mut err = ValidationError::new("range");
        err.message = Some("O valor não pode ser negativo.".into());
        return Err(err);
    }
    Ok(())
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateDevicePayload {
    #[validate(length(min = 1, message = "O número de série é obrigatório."))]
    pub serial_number: String,

    pub model_id: i64,

    pub imei1: Option<String>,
    pub imei2: Option<String>,

    #[validate(custom(function = "validate_not_negative"))]
    #[serde(default)]
    pub value: Decimal,

    // Hoje, se omitido
    pub acquired_on: Option<NaiveDate>,

    // Em estoque, se omitido
    pub initial_status: Option<DeviceStatus>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDevicePayload {
    #[validate(length(min = 1, message = "O número de série é obrigatório."))]
    pub serial_number: String,
    pub model_id: i64,
    pub imei1: Option<String>,
    pub imei2: Option<String>,
    #[validate(custom(function = "validate_not_negative"))]
    pub value: Decimal,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct DeviceSearchQuery {
    /// Número de série ou nome do responsável (busca parcial)
    pub q: Option<String>,
    pub status: Option<DeviceStatus>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_status_names_loosely() {
        assert_eq!(" em uso ".parse::<DeviceStatus>().unwrap(), DeviceStatus::InUse);
        assert_eq!(
            "BAIXADO/INUTILIZADO".parse::<DeviceStatus>().unwrap(),
            DeviceStatus::Decommissioned
        );
        assert!("Emprestado".parse::<DeviceStatus>().is_err());
    }

    #[test]
    fn serializes_with_literal_names() {
        let json = serde_json::to_string(&DeviceStatus::InMaintenance).unwrap();
        assert_eq!(json, "\"Em manutenção\"");
        let back: DeviceStatus = serde_json::from_str("\"Em estoque\"").unwrap();
        assert_eq!(back, DeviceStatus::InStock);
        assert!(serde_json::from_str::<DeviceStatus>("\"Perdido\"").is_err());
    }
}
