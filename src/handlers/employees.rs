// src/handlers/employees.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{
        i18n::Locale,
        rbac::{RequireRole, RoleEditor},
    },
    models::employee::{Employee, EmployeeListQuery, EmployeePayload, EmployeeView},
};

// POST /api/employees
#[utoipa::path(
    post,
    path = "/api/employees",
    tag = "Employees",
    request_body = EmployeePayload,
    responses(
        (status = 201, description = "Colaborador cadastrado", body = Employee),
        (status = 409, description = "Código ou CPF já existe")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_employee(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireRole<RoleEditor>,
    Json(payload): Json<EmployeePayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let employee = app_state
        .employee_service
        .create_employee(&app_state.db_pool, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(employee)))
}

// GET /api/employees
#[utoipa::path(
    get,
    path = "/api/employees",
    tag = "Employees",
    params(EmployeeListQuery),
    responses(
        (status = 200, description = "Colaboradores com o nome do setor", body = Vec<EmployeeView>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_employees(
    State(app_state): State<AppState>,
    locale: Locale,
    Query(query): Query<EmployeeListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let employees = app_state
        .employee_service
        .list_employees(query.sort.unwrap_or_default(), query.q.as_deref())
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(employees)))
}

// GET /api/employees/{id}
#[utoipa::path(
    get,
    path = "/api/employees/{id}",
    tag = "Employees",
    params(("id" = i64, Path, description = "ID do colaborador")),
    responses(
        (status = 200, description = "Colaborador", body = Employee),
        (status = 404, description = "Colaborador não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_employee(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let employee = app_state
        .employee_service
        .get_employee(&app_state.db_pool, id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(employee)))
}

// GET /api/employees/by-code/{code}
#[utoipa::path(
    get,
    path = "/api/employees/by-code/{code}",
    tag = "Employees",
    params(("code" = String, Path, description = "Código interno do colaborador")),
    responses(
        (status = 200, description = "Colaborador", body = Employee),
        (status = 404, description = "Colaborador não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_employee_by_code(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(code): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let employee = app_state
        .employee_service
        .find_by_code(&app_state.db_pool, &code)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(employee)))
}

// PUT /api/employees/{id}
#[utoipa::path(
    put,
    path = "/api/employees/{id}",
    tag = "Employees",
    request_body = EmployeePayload,
    params(("id" = i64, Path, description = "ID do colaborador")),
    responses(
        (status = 200, description = "Colaborador atualizado", body = Employee),
        (status = 404, description = "Colaborador não encontrado"),
        (status = 409, description = "Código ou CPF já existe")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_employee(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireRole<RoleEditor>,
    Path(id): Path<i64>,
    Json(payload): Json<EmployeePayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let employee = app_state
        .employee_service
        .update_employee(&app_state.db_pool, id, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(employee)))
}

// DELETE /api/employees/{id}
#[utoipa::path(
    delete,
    path = "/api/employees/{id}",
    tag = "Employees",
    params(("id" = i64, Path, description = "ID do colaborador")),
    responses(
        (status = 204, description = "Colaborador excluído"),
        (status = 404, description = "Colaborador não encontrado"),
        (status = 409, description = "Colaborador possui histórico de movimentações")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_employee(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireRole<RoleEditor>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .employee_service
        .delete_employee(&app_state.db_pool, id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}
