// src/services/maintenance_service.rs

use rust_decimal::Decimal;
use sqlx::{Acquire, Postgres};

use crate::{
    common::error::AppError,
    db::MaintenanceRepository,
    models::{
        device::DeviceStatus,
        ledger::{DISPOSAL_LOCATION, STOCK_LOCATION},
        maintenance::{MaintenanceOrder, MaintenanceStatus, OpenMaintenanceOrderView},
    },
    services::{
        ledger_service::{LedgerService, MovementRequest, OrderClosing, OrderDetails},
        lifecycle::MovementSource,
    },
};

/// Observação gravada no histórico quando o aparelho volta da assistência.
pub fn return_notes(applied_fix: Option<&str>, cost: Decimal) -> String {
    format!(
        "Retorno da manutenção. Solução: {}. Custo: R${:.2}",
        applied_fix.unwrap_or("-"),
        cost.round_dp(2)
    )
}

#[derive(Clone)]
pub struct MaintenanceService {
    maintenance_repo: MaintenanceRepository,
    ledger_service: LedgerService,
}

impl MaintenanceService {
    pub fn new(maintenance_repo: MaintenanceRepository, ledger_service: LedgerService) -> Self {
        Self { maintenance_repo, ledger_service }
    }

    // --- ABRIR O.S. ---
    pub async fn open_order<'e, E>(
        &self,
        executor: E,
        device_id: i64,
        vendor: &str,
        defect: &str,
    ) -> Result<MaintenanceOrder, AppError>
    where
        E: Acquire<'e, Database = Postgres>,
    {
        let vendor = vendor.trim();
        let defect = defect.trim();
        let location = format!("Assistência: {}", vendor);
        let notes = format!("Defeito: {}", defect);

        let mut tx = executor.begin().await?;

        // A tabela de transições rejeita aparelho já em manutenção ou baixado
        let outcome = self
            .ledger_service
            .apply_movement(
                &mut tx,
                MovementRequest {
                    order_details: OrderDetails { vendor: Some(vendor), defect: Some(defect) },
                    ..MovementRequest::manual(
                        device_id,
                        DeviceStatus::InMaintenance,
                        None,
                        Some(&location),
                        Some(&notes),
                    )
                },
            )
            .await?;

        let order = outcome
            .opened_order
            .ok_or_else(|| anyhow::anyhow!("Transição para manutenção não abriu O.S."))?;

        tx.commit().await?;
        Ok(order)
    }

    // --- FECHAR O.S. ---
    pub async fn close_order<'e, E>(
        &self,
        executor: E,
        order_id: i64,
        resolution_notes: Option<&str>,
        cost: Decimal,
        outcome_status: DeviceStatus,
    ) -> Result<MaintenanceOrder, AppError>
    where
        E: Acquire<'e, Database = Postgres>,
    {
        let location = match outcome_status {
            DeviceStatus::InStock => STOCK_LOCATION,
            DeviceStatus::Decommissioned => DISPOSAL_LOCATION,
            other => {
                return Err(AppError::InvalidInput(format!(
                    "o aparelho não pode sair da manutenção como '{}'",
                    other
                )))
            }
        };
        if cost.is_sign_negative() {
            return Err(AppError::InvalidInput("o custo não pode ser negativo".into()));
        }
        let applied_fix = resolution_notes.map(str::trim).filter(|s| !s.is_empty());
        let notes = return_notes(applied_fix, cost);

        let mut tx = executor.begin().await?;

        let order = self
            .maintenance_repo
            .find_for_update(&mut *tx, order_id)
            .await?
            .ok_or(AppError::MaintenanceOrderNotFound(order_id))?;
        if order.status != MaintenanceStatus::InProgress {
            return Err(AppError::MaintenanceOrderNotOpen(order_id));
        }

        // O responsável é sempre limpo ao sair da manutenção
        let outcome = self
            .ledger_service
            .apply_movement(
                &mut tx,
                MovementRequest {
                    source: MovementSource::MaintenanceClose,
                    closing: OrderClosing { applied_fix, cost },
                    ..MovementRequest::manual(
                        order.device_id,
                        outcome_status,
                        None,
                        Some(location),
                        Some(&notes),
                    )
                },
            )
            .await?;

        let closed = outcome
            .closed_order
            .filter(|closed| closed.id == order_id)
            .ok_or(AppError::MaintenanceOrderNotOpen(order_id))?;

        tx.commit().await?;

        tracing::info!("✅ O.S. {} encerrada como {:?}", closed.id, closed.status);
        Ok(closed)
    }

    // --- EDITAR O.S. ---
    pub async fn update_order<'e, E>(
        &self,
        executor: E,
        order_id: i64,
        vendor: &str,
        defect: &str,
    ) -> Result<MaintenanceOrder, AppError>
    where
        E: Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let order = self
            .maintenance_repo
            .find_for_update(&mut *tx, order_id)
            .await?
            .ok_or(AppError::MaintenanceOrderNotFound(order_id))?;
        if order.status != MaintenanceStatus::InProgress {
            return Err(AppError::MaintenanceOrderNotOpen(order_id));
        }

        let updated = self
            .maintenance_repo
            .update_details(&mut *tx, order_id, vendor.trim(), defect.trim())
            .await?
            .ok_or(AppError::MaintenanceOrderNotOpen(order_id))?;

        tx.commit().await?;
        Ok(updated)
    }

    pub async fn list_open(&self) -> Result<Vec<OpenMaintenanceOrderView>, AppError> {
        self.maintenance_repo.list_open().await
    }

    pub async fn list_for_device(&self, device_id: i64) -> Result<Vec<MaintenanceOrder>, AppError> {
        self.maintenance_repo.list_for_device(device_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn return_notes_include_fix_and_cost() {
        let cost = Decimal::from_str("150.5").unwrap();
        assert_eq!(
            return_notes(Some("Troca de tela"), cost),
            "Retorno da manutenção. Solução: Troca de tela. Custo: R$150.50"
        );
        assert_eq!(
            return_notes(None, Decimal::ZERO),
            "Retorno da manutenção. Solução: -. Custo: R$0.00"
        );
    }
}
