// src/services/ledger_service.rs

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::{Acquire, Executor, PgConnection, Postgres};
use utoipa::ToSchema;

use crate::{
    common::error::AppError,
    db::{
        device_repo::DeviceFields,
        ledger_repo::NewMovement,
        DeviceRepository, EmployeeRepository, LedgerRepository, MaintenanceRepository,
    },
    models::{
        device::{Device, DeviceStatus},
        ledger::{
            validate_checklist, CurrentState, HistoryFilter, MovementEntry, MovementHistoryRow,
            ReturnDevicePayload, ReturnDestination, DISPOSAL_LOCATION, STOCK_LOCATION,
        },
        maintenance::{MaintenanceOrder, MaintenanceStatus},
    },
    services::lifecycle::{self, HolderRule, MovementSource},
};

pub const INTAKE_NOTES: &str = "Entrada inicial no sistema.";

/// Fornecedor e defeito da O.S. aberta pela transição, se houver.
#[derive(Debug, Clone, Copy, Default)]
pub struct OrderDetails<'a> {
    pub vendor: Option<&'a str>,
    pub defect: Option<&'a str>,
}

/// Solução e custo da O.S. fechada pela transição, se houver.
#[derive(Debug, Clone, Copy, Default)]
pub struct OrderClosing<'a> {
    pub applied_fix: Option<&'a str>,
    pub cost: Decimal,
}

#[derive(Debug, Clone)]
pub struct MovementRequest<'a> {
    pub device_id: i64,
    pub status: DeviceStatus,
    pub employee_id: Option<i64>,
    pub location: Option<&'a str>,
    pub notes: Option<&'a str>,
    pub checklist: Option<serde_json::Value>,
    pub source: MovementSource,
    pub order_details: OrderDetails<'a>,
    pub closing: OrderClosing<'a>,
}

impl<'a> MovementRequest<'a> {
    pub fn manual(
        device_id: i64,
        status: DeviceStatus,
        employee_id: Option<i64>,
        location: Option<&'a str>,
        notes: Option<&'a str>,
    ) -> Self {
        Self {
            device_id,
            status,
            employee_id,
            location,
            notes,
            checklist: None,
            source: MovementSource::Manual,
            order_details: OrderDetails::default(),
            closing: OrderClosing::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MovementOutcome {
    pub entry: MovementEntry,
    pub opened_order: Option<MaintenanceOrder>,
    pub closed_order: Option<MaintenanceOrder>,
}

#[derive(Clone)]
pub struct LedgerService {
    ledger_repo: LedgerRepository,
    device_repo: DeviceRepository,
    employee_repo: EmployeeRepository,
    maintenance_repo: MaintenanceRepository,
}

impl LedgerService {
    pub fn new(
        ledger_repo: LedgerRepository,
        device_repo: DeviceRepository,
        employee_repo: EmployeeRepository,
        maintenance_repo: MaintenanceRepository,
    ) -> Self {
        Self { ledger_repo, device_repo, employee_repo, maintenance_repo }
    }

    // --- RECORD MOVEMENT ---
    pub async fn record_movement<'e, E>(
        &self,
        executor: E,
        device_id: i64,
        status: DeviceStatus,
        employee_id: Option<i64>,
        location: Option<&str>,
        notes: Option<&str>,
    ) -> Result<MovementEntry, AppError>
    where
        E: Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let outcome = self
            .apply_movement(
                &mut tx,
                MovementRequest::manual(device_id, status, employee_id, location, notes),
            )
            .await?; // Se falhar aqui, o tx sofre rollback ao sair do escopo

        tx.commit().await?;
        Ok(outcome.entry)
    }

    /// Aplica uma transição dentro da transação do chamador:
    /// grava a entrada, sincroniza `devices.status` e abre/fecha a O.S.
    pub(crate) async fn apply_movement(
        &self,
        conn: &mut PgConnection,
        request: MovementRequest<'_>,
    ) -> Result<MovementOutcome, AppError> {
        let device = self
            .device_repo
            .find_for_update(&mut *conn, request.device_id)
            .await?
            .ok_or_else(|| AppError::DeviceNotFound(request.device_id.to_string()))?;

        let from = self
            .ledger_repo
            .current_state(&mut *conn, device.id)
            .await?
            .map(|state| state.status)
            .unwrap_or(device.status);

        let transition = lifecycle::transition(from, request.status, request.source)?;

        let carried = if transition.holder == HolderRule::CarryForward && request.employee_id.is_none() {
            self.ledger_repo.last_known_holder(&mut *conn, device.id).await?
        } else {
            None
        };
        let holder = lifecycle::resolve_holder(&transition, request.status, request.employee_id, carried)?;

        if let Some(employee_id) = request.employee_id.filter(|_| holder.is_some()) {
            self.employee_repo
                .find_by_id(&mut *conn, employee_id)
                .await?
                .ok_or_else(|| AppError::EmployeeNotFound(employee_id.to_string()))?;
        }

        let entry = self
            .ledger_repo
            .append(
                &mut *conn,
                NewMovement {
                    device_id: device.id,
                    employee_id: holder,
                    status: request.status,
                    location: request.location,
                    notes: request.notes,
                    checklist: request.checklist,
                },
            )
            .await?;

        self.device_repo.set_status(&mut *conn, device.id, request.status).await?;

        let opened_order = if transition.opens_order {
            // Sem defeito informado, as observações da movimentação viram o defeito
            let defect = request.order_details.defect.or(request.notes);
            let order = self
                .maintenance_repo
                .open(&mut *conn, device.id, holder, request.order_details.vendor, defect)
                .await?;
            tracing::info!("🔧 O.S. {} aberta para o aparelho {}", order.id, device.serial_number);
            Some(order)
        } else {
            None
        };

        let closed_order = if transition.closes_order {
            match self.maintenance_repo.find_open_for_device(&mut *conn, device.id).await? {
                Some(order) => {
                    let closed = self
                        .maintenance_repo
                        .close(
                            &mut *conn,
                            order.id,
                            request.closing.applied_fix,
                            request.closing.cost,
                            MaintenanceStatus::outcome_for(request.status),
                        )
                        .await?;
                    Some(closed)
                }
                None => {
                    tracing::warn!(
                        "Aparelho {} saiu da manutenção sem O.S. em andamento",
                        device.serial_number
                    );
                    None
                }
            }
        } else {
            None
        };

        tracing::debug!(
            "Movimentação {}: aparelho {} {} -> {}",
            entry.id,
            device.serial_number,
            from,
            request.status
        );

        Ok(MovementOutcome { entry, opened_order, closed_order })
    }

    // --- GET CURRENT STATE ---
    pub async fn get_current_state<'e, E>(&self, executor: E, device_id: i64) -> Result<CurrentState, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.ledger_repo
            .current_state(executor, device_id)
            .await?
            .ok_or_else(|| AppError::DeviceNotFound(device_id.to_string()))
    }

    // --- RETURN DEVICE ---
    pub async fn return_device<'e, E>(
        &self,
        executor: E,
        device_id: i64,
        payload: &ReturnDevicePayload,
    ) -> Result<MovementOutcome, AppError>
    where
        E: Acquire<'e, Database = Postgres>,
    {
        validate_checklist(&payload.checklist)?;
        let checklist = serde_json::to_value(&payload.checklist)
            .map_err(|e| anyhow::anyhow!("Falha ao serializar checklist: {}", e))?;

        let mut tx = executor.begin().await?;

        // Trava o aparelho antes de conferir quem está com ele
        self.device_repo
            .find_for_update(&mut *tx, device_id)
            .await?
            .ok_or_else(|| AppError::DeviceNotFound(device_id.to_string()))?;

        let state = self.get_current_state(&mut *tx, device_id).await?;
        if state.holder_id != Some(payload.employee_id) {
            return Err(AppError::DeviceNotHeldBy { device_id, employee_id: payload.employee_id });
        }

        let destination = payload.destination;
        let notes = payload.notes.as_deref().filter(|n| !n.trim().is_empty());
        let employee_id = match destination {
            ReturnDestination::SendToMaintenance => Some(payload.employee_id),
            ReturnDestination::ReturnToStock | ReturnDestination::Decommission => None,
        };

        let outcome = self
            .apply_movement(
                &mut tx,
                MovementRequest {
                    device_id,
                    status: destination.target_status(),
                    employee_id,
                    location: Some(destination.location()),
                    notes,
                    checklist: Some(checklist),
                    source: MovementSource::Return,
                    order_details: OrderDetails { vendor: None, defect: notes },
                    closing: OrderClosing { applied_fix: notes, cost: Decimal::ZERO },
                },
            )
            .await?;

        tx.commit().await?;

        tracing::info!(
            "↩️ Aparelho {} devolvido pelo colaborador {} ({:?})",
            device_id,
            payload.employee_id,
            destination
        );
        Ok(outcome)
    }

    // --- INTAKE ---
    pub async fn intake_device<'e, E>(
        &self,
        executor: E,
        fields: &DeviceFields<'_>,
        acquired_on: NaiveDate,
        status: DeviceStatus,
    ) -> Result<Device, AppError>
    where
        E: Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;
        let device = self.intake_in(&mut tx, fields, acquired_on, status, INTAKE_NOTES).await?;
        tx.commit().await?;
        Ok(device)
    }

    /// Cria o aparelho e a primeira entrada do histórico na transação do chamador.
    pub(crate) async fn intake_in(
        &self,
        conn: &mut PgConnection,
        fields: &DeviceFields<'_>,
        acquired_on: NaiveDate,
        status: DeviceStatus,
        notes: &str,
    ) -> Result<Device, AppError> {
        lifecycle::check_intake(status)?;

        let device = self.device_repo.create(&mut *conn, fields, acquired_on, status).await?;

        let location = match status {
            DeviceStatus::Decommissioned => DISPOSAL_LOCATION,
            _ => STOCK_LOCATION,
        };
        self.ledger_repo
            .append(
                &mut *conn,
                NewMovement {
                    device_id: device.id,
                    employee_id: None,
                    status,
                    location: Some(location),
                    notes: Some(notes),
                    checklist: None,
                },
            )
            .await?;

        Ok(device)
    }

    // --- CONSULTAS ---
    pub async fn device_history<'e, E>(&self, executor: E, device_id: i64) -> Result<Vec<MovementEntry>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.ledger_repo.entries_for_device(executor, device_id).await
    }

    pub async fn search_history(&self, filter: &HistoryFilter) -> Result<Vec<MovementHistoryRow>, AppError> {
        self.ledger_repo.search(filter).await
    }

    pub async fn find_entry(&self, entry_id: i64) -> Result<MovementEntry, AppError> {
        self.ledger_repo
            .find_entry(entry_id)
            .await?
            .ok_or(AppError::MovementNotFound(entry_id))
    }
}
