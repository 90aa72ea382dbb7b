// src/services/import_service.rs
//
// Importação em lote: cada linha roda na sua própria transação. Uma linha com
// erro é registrada no relatório e não desfaz as linhas já gravadas.

use std::future::Future;

use chrono::Utc;
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde_json::Value;
use sqlx::PgPool;
use validator::Validate;

use crate::{
    common::error::AppError,
    db::{
        device_repo::DeviceFields, CatalogRepository, DeviceRepository, EmployeeRepository,
        GmailRepository,
    },
    models::{
        catalog::split_full_model_name,
        device::DeviceStatus,
        employee::EmployeePayload,
        gmail::GmailAccountPayload,
        import::{BrandRow, DeviceRow, EmployeeRow, GmailAccountRow, ImportReport, MovementRow},
    },
    services::ledger_service::{LedgerService, MovementRequest},
};

pub const IMPORT_NOTES: &str = "Entrada via importação.";

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// Percorre as linhas, convertendo cada uma e aplicando `apply`.
/// Nunca aborta: erros viram entradas do relatório.
pub async fn run_rows<T, F, Fut>(rows: Vec<Value>, mut apply: F) -> ImportReport
where
    T: DeserializeOwned,
    F: FnMut(T) -> Fut,
    Fut: Future<Output = Result<(), AppError>>,
{
    let mut report = ImportReport::default();
    for (index, raw) in rows.into_iter().enumerate() {
        let result = match serde_json::from_value::<T>(raw) {
            Ok(row) => apply(row).await,
            Err(e) => Err(AppError::InvalidInput(format!("linha inválida: {}", e))),
        };
        match result {
            Ok(()) => report.record_success(),
            Err(err) => {
                tracing::warn!("Importação: linha {} rejeitada: {}", index + 2, err);
                report.record_failure(index, &err);
            }
        }
    }
    report
}

#[derive(Clone)]
pub struct ImportService {
    pool: PgPool,
    catalog_repo: CatalogRepository,
    employee_repo: EmployeeRepository,
    device_repo: DeviceRepository,
    gmail_repo: GmailRepository,
    ledger_service: LedgerService,
}

impl ImportService {
    pub fn new(
        pool: PgPool,
        catalog_repo: CatalogRepository,
        employee_repo: EmployeeRepository,
        device_repo: DeviceRepository,
        gmail_repo: GmailRepository,
        ledger_service: LedgerService,
    ) -> Self {
        Self { pool, catalog_repo, employee_repo, device_repo, gmail_repo, ledger_service }
    }

    pub async fn import_employees(&self, rows: Vec<Value>) -> ImportReport {
        run_rows(rows, |row: EmployeeRow| self.import_employee(row)).await
    }

    pub async fn import_devices(&self, rows: Vec<Value>) -> ImportReport {
        run_rows(rows, |row: DeviceRow| self.import_device(row)).await
    }

    pub async fn import_brands(&self, rows: Vec<Value>) -> ImportReport {
        run_rows(rows, |row: BrandRow| self.import_brand(row)).await
    }

    pub async fn import_gmail_accounts(&self, rows: Vec<Value>) -> ImportReport {
        run_rows(rows, |row: GmailAccountRow| self.import_gmail_account(row)).await
    }

    pub async fn import_movements(&self, rows: Vec<Value>) -> ImportReport {
        run_rows(rows, |row: MovementRow| self.import_movement(row)).await
    }

    async fn resolve_sector(&self, conn: &mut sqlx::PgConnection, name: Option<&str>) -> Result<Option<i64>, AppError> {
        let Some(name) = name else { return Ok(None) };
        let sector = self
            .catalog_repo
            .find_sector_by_name(conn, name)
            .await?
            .ok_or_else(|| AppError::UnknownReference(format!("setor '{}'", name)))?;
        Ok(Some(sector.id))
    }

    async fn import_employee(&self, row: EmployeeRow) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        let sector_id = self.resolve_sector(&mut tx, non_blank(&row.nome_setor)).await?;
        let payload = EmployeePayload {
            code: row.codigo.trim().to_string(),
            full_name: row.nome_completo.trim().to_string(),
            cpf: row.cpf.trim().to_string(),
            gmail: non_blank(&row.gmail).map(str::to_string),
            sector_id,
        };
        payload.validate()?;

        self.employee_repo.create(&mut *tx, &payload).await?;
        tx.commit().await?;
        Ok(())
    }

    async fn import_device(&self, row: DeviceRow) -> Result<(), AppError> {
        let (brand, model) = split_full_model_name(&row.modelo_completo).ok_or_else(|| {
            AppError::InvalidInput(format!(
                "modelo_completo '{}' deve estar no formato 'Marca - Modelo'",
                row.modelo_completo
            ))
        })?;
        let status = match non_blank(&row.status_inicial) {
            Some(raw) => raw.parse::<DeviceStatus>()?,
            None => DeviceStatus::InStock,
        };
        let value = row.valor.unwrap_or(Decimal::ZERO);
        if value.is_sign_negative() {
            return Err(AppError::InvalidInput("valor não pode ser negativo".into()));
        }
        if row.numero_serie.trim().is_empty() {
            return Err(AppError::InvalidInput("numero_serie é obrigatório".into()));
        }

        let mut tx = self.pool.begin().await?;

        let model = self
            .catalog_repo
            .find_model(&mut *tx, brand, model)
            .await?
            .ok_or_else(|| AppError::UnknownReference(format!("modelo '{}'", row.modelo_completo.trim())))?;

        let fields = DeviceFields {
            serial_number: row.numero_serie.trim(),
            model_id: model.id,
            imei1: non_blank(&row.imei1),
            imei2: non_blank(&row.imei2),
            value,
        };
        self.ledger_service
            .intake_in(&mut tx, &fields, Utc::now().date_naive(), status, IMPORT_NOTES)
            .await?;

        tx.commit().await?;
        Ok(())
    }

    async fn import_brand(&self, row: BrandRow) -> Result<(), AppError> {
        let name = row.nome_marca.trim();
        if name.is_empty() {
            return Err(AppError::InvalidInput("nome_marca é obrigatório".into()));
        }
        self.catalog_repo.create_brand(&self.pool, name).await?;
        Ok(())
    }

    async fn import_gmail_account(&self, row: GmailAccountRow) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        let sector_id = self.resolve_sector(&mut tx, non_blank(&row.nome_setor)).await?;
        let employee_id = match non_blank(&row.nome_colaborador) {
            Some(name) => Some(
                self.employee_repo
                    .find_by_name(&mut *tx, name)
                    .await?
                    .ok_or_else(|| AppError::UnknownReference(format!("colaborador '{}'", name)))?
                    .id,
            ),
            None => None,
        };
        let payload = GmailAccountPayload {
            email: row.email.trim().to_string(),
            password: non_blank(&row.senha).map(str::to_string),
            recovery_phone: non_blank(&row.telefone_recuperacao).map(str::to_string),
            recovery_email: non_blank(&row.email_recuperacao).map(str::to_string),
            sector_id,
            employee_id,
        };
        payload.validate()?;

        self.gmail_repo.create(&mut *tx, &payload).await?;
        tx.commit().await?;
        Ok(())
    }

    /// Cada linha é uma entrega: o aparelho passa a "Em uso" com o colaborador.
    async fn import_movement(&self, row: MovementRow) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        let serial = row.numero_serie_aparelho.trim();
        let device = self
            .device_repo
            .find_by_serial(&mut *tx, serial)
            .await?
            .ok_or_else(|| AppError::DeviceNotFound(serial.to_string()))?;

        let name = row.nome_colaborador.trim();
        let employee = self
            .employee_repo
            .find_by_name(&mut *tx, name)
            .await?
            .ok_or_else(|| AppError::EmployeeNotFound(name.to_string()))?;

        self.ledger_service
            .apply_movement(
                &mut tx,
                MovementRequest::manual(
                    device.id,
                    DeviceStatus::InUse,
                    Some(employee.id),
                    non_blank(&row.localizacao),
                    non_blank(&row.observacoes),
                ),
            )
            .await?;

        tx.commit().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::error::ErrorKind;
    use serde_json::json;

    fn employee_rows(n: usize) -> Vec<Value> {
        (1..=n)
            .map(|i| {
                json!({
                    "codigo": format!("C{:02}", i),
                    "nome_completo": format!("Colaborador {}", i),
                    "cpf": format!("{:011}", i),
                })
            })
            .collect()
    }

    #[tokio::test]
    async fn one_conflicting_row_does_not_stop_the_batch() {
        // Linha 5 (índice 4) repete um CPF já gravado
        let mut seen = std::collections::HashSet::new();
        let mut rows = employee_rows(10);
        rows[4]["cpf"] = json!(format!("{:011}", 1));

        let report = run_rows(rows, |row: EmployeeRow| {
            let inserted = seen.insert(row.cpf.clone());
            async move {
                if inserted { Ok(()) } else { Err(AppError::CpfAlreadyExists(row.cpf)) }
            }
        })
        .await;

        assert_eq!(report.succeeded, 9);
        assert_eq!(report.failed, 1);
        assert_eq!(report.errors[0].row, 6);
        assert_eq!(report.errors[0].kind, ErrorKind::Conflict);
        assert!(report.errors[0].message.contains("já existe"));
    }

    #[tokio::test]
    async fn malformed_row_is_reported_as_validation() {
        let rows = vec![json!({ "codigo": "C01" }), json!({ "nome_marca": "Samsung" })];
        let report = run_rows(rows, |_row: BrandRow| async { Ok(()) }).await;

        assert_eq!(report.succeeded, 1);
        assert_eq!(report.failed, 1);
        assert_eq!(report.errors[0].row, 2);
        assert_eq!(report.errors[0].kind, ErrorKind::Validation);
    }
}
