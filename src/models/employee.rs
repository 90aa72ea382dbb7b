// src/models/employee.rs

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: i64,
    pub code: String,
    pub full_name: String,
    pub cpf: String,
    pub gmail: Option<String>,
    pub sector_id: Option<i64>,
    pub created_on: NaiveDate,
}

// Colaborador com o nome do setor resolvido
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeView {
    pub id: i64,
    pub code: String,
    pub full_name: String,
    pub cpf: String,
    pub gmail: Option<String>,
    pub sector_id: Option<i64>,
    pub sector_name: Option<String>,
    pub created_on: NaiveDate,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EmployeePayload {
    #[validate(length(min = 1, message = "O código é obrigatório."))]
    pub code: String,

    #[validate(length(min = 1, message = "O nome completo é obrigatório."))]
    pub full_name: String,

    #[validate(length(min = 11, max = 14, message = "CPF inválido."))]
    pub cpf: String,

    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub gmail: Option<String>,

    pub sector_id: Option<i64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum EmployeeSort {
    #[default]
    Name,
    Code,
    Sector,
}

impl EmployeeSort {
    pub fn order_by(&self) -> &'static str {
        match self {
            EmployeeSort::Name => "e.full_name ASC, e.id ASC",
            EmployeeSort::Code => "e.code ASC, e.id ASC",
            EmployeeSort::Sector => "s.name ASC NULLS LAST, e.full_name ASC, e.id ASC",
        }
    }
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeListQuery {
    pub sort: Option<EmployeeSort>,
    /// Código, CPF ou parte do nome
    pub q: Option<String>,
}
