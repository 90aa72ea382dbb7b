// src/db/employee_repo.rs

use sqlx::{Executor, PgPool, Postgres};

use crate::{
    common::{
        db_utils::{like_pattern, unique_violation},
        error::AppError,
    },
    models::{
        employee::{Employee, EmployeePayload, EmployeeSort, EmployeeView},
        import::EmployeeRow,
    },
};

const EMPLOYEE_COLUMNS: &str = "id, code, full_name, cpf, gmail, sector_id, created_on";

fn map_employee_error(e: sqlx::Error, payload: &EmployeePayload) -> AppError {
    match unique_violation(&e) {
        Some("employees_code_key") => return AppError::EmployeeCodeAlreadyExists(payload.code.clone()),
        Some("employees_cpf_key") => return AppError::CpfAlreadyExists(payload.cpf.clone()),
        _ => {}
    }
    if let sqlx::Error::Database(db_err) = &e {
        if db_err.is_foreign_key_violation() {
            return AppError::UnknownReference(format!(
                "setor {}",
                payload.sector_id.unwrap_or_default()
            ));
        }
    }
    e.into()
}

#[derive(Clone)]
pub struct EmployeeRepository {
    pool: PgPool,
}

impl EmployeeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create<'e, E>(&self, executor: E, payload: &EmployeePayload) -> Result<Employee, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            "INSERT INTO employees (code, full_name, cpf, gmail, sector_id)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {EMPLOYEE_COLUMNS}"
        );
        sqlx::query_as::<_, Employee>(&sql)
            .bind(payload.code.trim())
            .bind(payload.full_name.trim())
            .bind(payload.cpf.trim())
            .bind(payload.gmail.as_deref())
            .bind(payload.sector_id)
            .fetch_one(executor)
            .await
            .map_err(|e| map_employee_error(e, payload))
    }

    pub async fn update<'e, E>(
        &self,
        executor: E,
        id: i64,
        payload: &EmployeePayload,
    ) -> Result<Option<Employee>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            "UPDATE employees
             SET code = $2, full_name = $3, cpf = $4, gmail = $5, sector_id = $6
             WHERE id = $1
             RETURNING {EMPLOYEE_COLUMNS}"
        );
        sqlx::query_as::<_, Employee>(&sql)
            .bind(id)
            .bind(payload.code.trim())
            .bind(payload.full_name.trim())
            .bind(payload.cpf.trim())
            .bind(payload.gmail.as_deref())
            .bind(payload.sector_id)
            .fetch_optional(executor)
            .await
            .map_err(|e| map_employee_error(e, payload))
    }

    pub async fn delete<'e, E>(&self, executor: E, id: i64) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM employees WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected())
    }

    pub async fn find_by_id<'e, E>(&self, executor: E, id: i64) -> Result<Option<Employee>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!("SELECT {EMPLOYEE_COLUMNS} FROM employees WHERE id = $1");
        let employee = sqlx::query_as::<_, Employee>(&sql)
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(employee)
    }

    /// Trava o colaborador para a checagem de histórico antes da exclusão.
    pub async fn find_for_update<'e, E>(&self, executor: E, id: i64) -> Result<Option<Employee>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!("SELECT {EMPLOYEE_COLUMNS} FROM employees WHERE id = $1 FOR UPDATE");
        let employee = sqlx::query_as::<_, Employee>(&sql)
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(employee)
    }

    pub async fn find_by_code<'e, E>(&self, executor: E, code: &str) -> Result<Option<Employee>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!("SELECT {EMPLOYEE_COLUMNS} FROM employees WHERE code = $1");
        let employee = sqlx::query_as::<_, Employee>(&sql)
            .bind(code.trim())
            .fetch_optional(executor)
            .await?;
        Ok(employee)
    }

    /// Nome completo exato, sem diferenciar maiúsculas (importação e chat).
    pub async fn find_by_name<'e, E>(&self, executor: E, full_name: &str) -> Result<Option<Employee>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            "SELECT {EMPLOYEE_COLUMNS} FROM employees
             WHERE lower(full_name) = lower($1)
             ORDER BY id
             LIMIT 1"
        );
        let employee = sqlx::query_as::<_, Employee>(&sql)
            .bind(full_name.trim())
            .fetch_optional(executor)
            .await?;
        Ok(employee)
    }

    /// `search` casa com código ou CPF exatos, ou parte do nome.
    pub async fn list(&self, sort: EmployeeSort, search: Option<&str>) -> Result<Vec<EmployeeView>, AppError> {
        let term = search.map(str::trim).filter(|s| !s.is_empty());
        let sql = format!(
            "SELECT
                 e.id, e.code, e.full_name, e.cpf, e.gmail, e.sector_id,
                 s.name AS sector_name, e.created_on
             FROM employees e
             LEFT JOIN sectors s ON s.id = e.sector_id
             WHERE ($1::text IS NULL OR e.code = $1 OR e.cpf = $1 OR e.full_name ILIKE $2)
             ORDER BY {}",
            sort.order_by()
        );
        let employees = sqlx::query_as::<_, EmployeeView>(&sql)
            .bind(term)
            .bind(term.map(like_pattern))
            .fetch_all(&self.pool)
            .await?;
        Ok(employees)
    }

    pub async fn export_rows(&self) -> Result<Vec<EmployeeRow>, AppError> {
        let rows = sqlx::query_as::<_, EmployeeRow>(
            r#"
            SELECT
                e.code AS codigo,
                e.full_name AS nome_completo,
                e.cpf,
                e.gmail,
                s.name AS nome_setor
            FROM employees e
            LEFT JOIN sectors s ON s.id = e.sector_id
            ORDER BY e.full_name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
