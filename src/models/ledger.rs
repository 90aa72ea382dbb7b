// src/models/ledger.rs

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::{common::error::AppError, models::device::DeviceStatus};

/// Itens conferidos na entrega e na devolução de um aparelho.
pub const CHECKLIST_ITEMS: [&str; 10] = [
    "Tela",
    "Carcaça",
    "Bateria",
    "Botões",
    "USB",
    "Chip",
    "Carregador",
    "Cabo USB",
    "Capa",
    "Película",
];

pub const STOCK_LOCATION: &str = "Estoque Interno";
pub const MAINTENANCE_TRIAGE_LOCATION: &str = "Triagem Manutenção";
pub const DISPOSAL_LOCATION: &str = "Descarte";

// Entrada do histórico. Nunca é alterada depois de gravada.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MovementEntry {
    pub id: i64,
    pub moved_at: DateTime<Utc>,
    pub device_id: i64,
    pub employee_id: Option<i64>,
    pub status: DeviceStatus,
    pub location: Option<String>,
    pub notes: Option<String>,
    #[schema(value_type = Option<Object>)]
    pub checklist: Option<serde_json::Value>,
}

/// Estado atual de um aparelho: a entrada mais recente do histórico.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CurrentState {
    pub device_id: i64,
    pub entry_id: i64,
    pub status: DeviceStatus,
    pub holder_id: Option<i64>,
    pub location: Option<String>,
    pub moved_at: DateTime<Utc>,
}

impl CurrentState {
    /// Mesma regra da consulta no banco: maior `moved_at`, empate pelo maior `id`.
    pub fn from_entries<'a, I>(entries: I) -> Option<CurrentState>
    where
        I: IntoIterator<Item = &'a MovementEntry>,
    {
        entries
            .into_iter()
            .max_by_key(|e| (e.moved_at, e.id))
            .map(|e| CurrentState {
                device_id: e.device_id,
                entry_id: e.id,
                status: e.status,
                holder_id: e.employee_id,
                location: e.location.clone(),
                moved_at: e.moved_at,
            })
    }
}

/// Último responsável não nulo, usado ao enviar para manutenção sem colaborador.
pub fn last_known_holder<'a, I>(entries: I) -> Option<i64>
where
    I: IntoIterator<Item = &'a MovementEntry>,
{
    entries
        .into_iter()
        .filter(|e| e.employee_id.is_some())
        .max_by_key(|e| (e.moved_at, e.id))
        .and_then(|e| e.employee_id)
}

// Linha da consulta de histórico (com nomes resolvidos)
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MovementHistoryRow {
    pub id: i64,
    pub moved_at: DateTime<Utc>,
    pub device_id: i64,
    pub serial_number: String,
    pub employee_id: Option<i64>,
    pub employee_name: Option<String>,
    pub status: DeviceStatus,
    pub location: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct HistoryFilter {
    pub status: Option<DeviceStatus>,
    /// Data inicial (inclusiva)
    pub from: Option<NaiveDate>,
    /// Data final (inclusiva)
    pub to: Option<NaiveDate>,
    pub serial_number: Option<String>,
    pub employee_name: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecordMovementPayload {
    pub status: DeviceStatus,
    pub employee_id: Option<i64>,
    #[validate(length(max = 200, message = "Localização muito longa."))]
    pub location: Option<String>,
    pub notes: Option<String>,
}

// ---
// Devolução
// ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum ReturnDestination {
    ReturnToStock,
    SendToMaintenance,
    Decommission,
}

impl ReturnDestination {
    pub fn target_status(&self) -> DeviceStatus {
        match self {
            ReturnDestination::ReturnToStock => DeviceStatus::InStock,
            ReturnDestination::SendToMaintenance => DeviceStatus::InMaintenance,
            ReturnDestination::Decommission => DeviceStatus::Decommissioned,
        }
    }

    pub fn location(&self) -> &'static str {
        match self {
            ReturnDestination::ReturnToStock => STOCK_LOCATION,
            ReturnDestination::SendToMaintenance => MAINTENANCE_TRIAGE_LOCATION,
            ReturnDestination::Decommission => DISPOSAL_LOCATION,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum ReturnCondition {
    Bom,
    Riscado,
    Quebrado,
    Faltando,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChecklistItem<C> {
    pub delivered: bool,
    pub condition: C,
}

pub type Checklist<C> = BTreeMap<String, ChecklistItem<C>>;

/// Exige exatamente os dez itens conhecidos.
pub fn validate_checklist<C>(checklist: &Checklist<C>) -> Result<(), AppError> {
    let missing: Vec<&str> = CHECKLIST_ITEMS
        .iter()
        .copied()
        .filter(|item| !checklist.contains_key(*item))
        .collect();
    if !missing.is_empty() {
        return Err(AppError::InvalidInput(format!(
            "itens ausentes no checklist: {}",
            missing.join(", ")
        )));
    }
    if let Some(extra) = checklist.keys().find(|k| !CHECKLIST_ITEMS.contains(&k.as_str())) {
        return Err(AppError::InvalidInput(format!("item desconhecido no checklist: {}", extra)));
    }
    Ok(())
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReturnDevicePayload {
    pub employee_id: i64,
    #[schema(value_type = Object)]
    pub checklist: Checklist<ReturnCondition>,
    pub destination: ReturnDestination,
    pub notes: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn entry(id: i64, secs: i64, status: DeviceStatus, employee_id: Option<i64>) -> MovementEntry {
        MovementEntry {
            id,
            moved_at: Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap(),
            device_id: 7,
            employee_id,
            status,
            location: None,
            notes: None,
            checklist: None,
        }
    }

    #[test]
    fn current_state_is_latest_entry() {
        let entries = vec![
            entry(1, 0, DeviceStatus::InStock, None),
            entry(2, 10, DeviceStatus::InUse, Some(42)),
        ];
        let state = CurrentState::from_entries(&entries).unwrap();
        assert_eq!(state.status, DeviceStatus::InUse);
        assert_eq!(state.holder_id, Some(42));
        assert_eq!(state.entry_id, 2);
    }

    #[test]
    fn timestamp_tie_is_broken_by_highest_id() {
        let entries = vec![
            entry(5, 10, DeviceStatus::InStock, None),
            entry(4, 10, DeviceStatus::InUse, Some(1)),
        ];
        let state = CurrentState::from_entries(&entries).unwrap();
        assert_eq!(state.entry_id, 5);
        assert_eq!(state.status, DeviceStatus::InStock);
    }

    #[test]
    fn no_entries_means_no_state() {
        assert!(CurrentState::from_entries(&Vec::<MovementEntry>::new()).is_none());
    }

    #[test]
    fn last_known_holder_skips_cleared_entries() {
        let entries = vec![
            entry(1, 0, DeviceStatus::InUse, Some(42)),
            entry(2, 5, DeviceStatus::InStock, None),
        ];
        assert_eq!(last_known_holder(&entries), Some(42));
    }

    fn full_checklist() -> Checklist<ReturnCondition> {
        CHECKLIST_ITEMS
            .iter()
            .map(|item| {
                (item.to_string(), ChecklistItem { delivered: true, condition: ReturnCondition::Bom })
            })
            .collect()
    }

    #[test]
    fn checklist_requires_all_items() {
        let mut checklist = full_checklist();
        assert!(validate_checklist(&checklist).is_ok());

        checklist.remove("Bateria");
        let err = validate_checklist(&checklist).unwrap_err();
        assert!(err.to_string().contains("Bateria"));
    }

    #[test]
    fn checklist_rejects_unknown_items() {
        let mut checklist = full_checklist();
        checklist.insert(
            "Fone".into(),
            ChecklistItem { delivered: false, condition: ReturnCondition::Faltando },
        );
        assert!(validate_checklist(&checklist).is_err());
    }

    #[test]
    fn return_destinations_map_to_status_and_location() {
        assert_eq!(ReturnDestination::ReturnToStock.target_status(), DeviceStatus::InStock);
        assert_eq!(ReturnDestination::SendToMaintenance.location(), "Triagem Manutenção");
        assert_eq!(ReturnDestination::Decommission.location(), "Descarte");
    }
}
