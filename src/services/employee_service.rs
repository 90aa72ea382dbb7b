// src/services/employee_service.rs

use sqlx::{Acquire, Postgres};

use crate::{
    common::error::AppError,
    db::{EmployeeRepository, LedgerRepository},
    models::{
        employee::{Employee, EmployeePayload, EmployeeSort, EmployeeView},
        import::EmployeeRow,
    },
};

#[derive(Clone)]
pub struct EmployeeService {
    employee_repo: EmployeeRepository,
    ledger_repo: LedgerRepository,
}

impl EmployeeService {
    pub fn new(employee_repo: EmployeeRepository, ledger_repo: LedgerRepository) -> Self {
        Self { employee_repo, ledger_repo }
    }

    pub async fn create_employee<'e, E>(&self, executor: E, payload: &EmployeePayload) -> Result<Employee, AppError>
    where
        E: Acquire<'e, Database = Postgres>,
    {
        let mut conn = executor.acquire().await?;
        let employee = self.employee_repo.create(&mut *conn, payload).await?;
        tracing::info!("👤 Colaborador {} cadastrado", employee.code);
        Ok(employee)
    }

    pub async fn update_employee<'e, E>(
        &self,
        executor: E,
        id: i64,
        payload: &EmployeePayload,
    ) -> Result<Employee, AppError>
    where
        E: Acquire<'e, Database = Postgres>,
    {
        let mut conn = executor.acquire().await?;
        self.employee_repo
            .update(&mut *conn, id, payload)
            .await?
            .ok_or_else(|| AppError::EmployeeNotFound(id.to_string()))
    }

    /// Exclui o colaborador, recusando se ele aparecer no histórico.
    pub async fn delete_employee<'e, E>(&self, executor: E, id: i64) -> Result<(), AppError>
    where
        E: Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        self.employee_repo
            .find_for_update(&mut *tx, id)
            .await?
            .ok_or_else(|| AppError::EmployeeNotFound(id.to_string()))?;

        let references = self.ledger_repo.count_for_employee(&mut *tx, id).await?;
        if references > 0 {
            return Err(AppError::ReferencedByHistory { entity: "colaborador", id, references });
        }

        self.employee_repo.delete(&mut *tx, id).await?;
        tx.commit().await?;

        tracing::info!("🗑️ Colaborador {} excluído", id);
        Ok(())
    }

    pub async fn get_employee<'e, E>(&self, executor: E, id: i64) -> Result<Employee, AppError>
    where
        E: Acquire<'e, Database = Postgres>,
    {
        let mut conn = executor.acquire().await?;
        self.employee_repo
            .find_by_id(&mut *conn, id)
            .await?
            .ok_or_else(|| AppError::EmployeeNotFound(id.to_string()))
    }

    pub async fn find_by_code<'e, E>(&self, executor: E, code: &str) -> Result<Employee, AppError>
    where
        E: Acquire<'e, Database = Postgres>,
    {
        let mut conn = executor.acquire().await?;
        self.employee_repo
            .find_by_code(&mut *conn, code)
            .await?
            .ok_or_else(|| AppError::EmployeeNotFound(code.trim().to_string()))
    }

    pub async fn list_employees(&self, sort: EmployeeSort, search: Option<&str>) -> Result<Vec<EmployeeView>, AppError> {
        self.employee_repo.list(sort, search).await
    }

    pub async fn export_employees(&self) -> Result<Vec<EmployeeRow>, AppError> {
        self.employee_repo.export_rows().await
    }
}
