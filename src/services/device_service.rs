// src/services/device_service.rs

use chrono::Utc;
use sqlx::{Acquire, Postgres};

use crate::{
    common::error::AppError,
    db::{device_repo::DeviceFields, DeviceRepository, LedgerRepository},
    models::{
        device::{CreateDevicePayload, Device, DeviceStatus, DeviceView, UpdateDevicePayload},
        import::DeviceExportRow,
    },
    services::ledger_service::LedgerService,
};

fn blank_to_none(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

#[derive(Clone)]
pub struct DeviceService {
    device_repo: DeviceRepository,
    ledger_repo: LedgerRepository,
    ledger_service: LedgerService,
}

impl DeviceService {
    pub fn new(device_repo: DeviceRepository, ledger_repo: LedgerRepository, ledger_service: LedgerService) -> Self {
        Self { device_repo, ledger_repo, ledger_service }
    }

    // --- CREATE (entrada do aparelho) ---
    pub async fn create_device<'e, E>(&self, executor: E, payload: &CreateDevicePayload) -> Result<Device, AppError>
    where
        E: Acquire<'e, Database = Postgres>,
    {
        let fields = DeviceFields {
            serial_number: payload.serial_number.trim(),
            model_id: payload.model_id,
            imei1: blank_to_none(&payload.imei1),
            imei2: blank_to_none(&payload.imei2),
            value: payload.value,
        };
        let acquired_on = payload.acquired_on.unwrap_or_else(|| Utc::now().date_naive());
        let status = payload.initial_status.unwrap_or(DeviceStatus::InStock);

        let device = self
            .ledger_service
            .intake_device(executor, &fields, acquired_on, status)
            .await?;

        tracing::info!("📱 Aparelho {} cadastrado ({})", device.serial_number, device.status);
        Ok(device)
    }

    pub async fn list_devices(
        &self,
        search: Option<&str>,
        status: Option<DeviceStatus>,
    ) -> Result<Vec<DeviceView>, AppError> {
        self.device_repo.list_inventory(search, status).await
    }

    pub async fn get_device(&self, id: i64) -> Result<Device, AppError> {
        self.device_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::DeviceNotFound(id.to_string()))
    }

    /// Edita os dados cadastrais. O status só muda por movimentação.
    pub async fn update_device<'e, E>(
        &self,
        executor: E,
        id: i64,
        payload: &UpdateDevicePayload,
    ) -> Result<Device, AppError>
    where
        E: Acquire<'e, Database = Postgres>,
    {
        let fields = DeviceFields {
            serial_number: payload.serial_number.trim(),
            model_id: payload.model_id,
            imei1: blank_to_none(&payload.imei1),
            imei2: blank_to_none(&payload.imei2),
            value: payload.value,
        };

        let mut conn = executor.acquire().await?;
        self.device_repo
            .update(&mut *conn, id, &fields)
            .await?
            .ok_or_else(|| AppError::DeviceNotFound(id.to_string()))
    }

    /// Exclui o aparelho, recusando se houver qualquer entrada no histórico.
    pub async fn delete_device<'e, E>(&self, executor: E, id: i64) -> Result<(), AppError>
    where
        E: Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        self.device_repo
            .find_for_update(&mut *tx, id)
            .await?
            .ok_or_else(|| AppError::DeviceNotFound(id.to_string()))?;

        let references = self.ledger_repo.count_for_device(&mut *tx, id).await?;
        if references > 0 {
            return Err(AppError::ReferencedByHistory { entity: "aparelho", id, references });
        }

        self.device_repo.delete(&mut *tx, id).await?;
        tx.commit().await?;

        tracing::info!("🗑️ Aparelho {} excluído", id);
        Ok(())
    }

    pub async fn export_devices(&self) -> Result<Vec<DeviceExportRow>, AppError> {
        self.device_repo.export_rows().await
    }
}
