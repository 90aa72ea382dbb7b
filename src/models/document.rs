// src/models/document.rs

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::models::ledger::Checklist;

// Estado do item na entrega do aparelho
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum HandoverCondition {
    #[serde(rename = "NOVO NA CAIXA")]
    NewInBox,
    #[serde(rename = "BOM")]
    Good,
    #[serde(rename = "REGULAR")]
    Regular,
    #[serde(rename = "AVARIADO")]
    Damaged,
}

impl HandoverCondition {
    pub fn label(&self) -> &'static str {
        match self {
            HandoverCondition::NewInBox => "NOVO NA CAIXA",
            HandoverCondition::Good => "BOM",
            HandoverCondition::Regular => "REGULAR",
            HandoverCondition::Damaged => "AVARIADO",
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HandoverPayload {
    #[schema(value_type = Object)]
    pub checklist: Checklist<HandoverCondition>,
}

// Dados da entrega, lidos do histórico
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HandoverSource {
    pub entry_id: i64,
    pub moved_on: NaiveDate,
    pub employee_name: String,
    pub employee_cpf: String,
    pub employee_sector: Option<String>,
    pub employee_email: Option<String>,
    pub brand_name: String,
    pub model_name: String,
    pub serial_number: String,
    pub imei1: Option<String>,
    pub imei2: Option<String>,
}

/// Termo de responsabilidade pronto para impressão.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HandoverDocument {
    /// Número do protocolo (id da movimentação de entrega)
    pub protocol: i64,
    pub issued_on: NaiveDate,
    pub source: HandoverSource,
    #[schema(value_type = Object)]
    pub checklist: Checklist<HandoverCondition>,
    pub declaration: String,
}
