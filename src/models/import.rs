// src/models/import.rs
//
// Linhas de planilha já convertidas em JSON. As chaves são os cabeçalhos
// fixos das planilhas de importação/exportação.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::common::error::{AppError, ErrorKind};

/// A primeira linha de dados da planilha é a 2 (a 1 é o cabeçalho).
pub const FIRST_DATA_ROW: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum ImportEntity {
    Employees,
    Devices,
    Brands,
    GmailAccounts,
    Movements,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum ExportEntity {
    Employees,
    Devices,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct EmployeeRow {
    pub codigo: String,
    pub nome_completo: String,
    pub cpf: String,
    #[serde(default)]
    pub gmail: Option<String>,
    #[serde(default)]
    pub nome_setor: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DeviceRow {
    pub numero_serie: String,
    #[serde(default)]
    pub imei1: Option<String>,
    #[serde(default)]
    pub imei2: Option<String>,
    #[serde(default)]
    pub valor: Option<Decimal>,
    pub modelo_completo: String,
    #[serde(default)]
    pub status_inicial: Option<String>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct BrandRow {
    pub nome_marca: String,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct GmailAccountRow {
    pub email: String,
    #[serde(default)]
    pub senha: Option<String>,
    #[serde(default)]
    pub telefone_recuperacao: Option<String>,
    #[serde(default)]
    pub email_recuperacao: Option<String>,
    #[serde(default)]
    pub nome_setor: Option<String>,
    #[serde(default)]
    pub nome_colaborador: Option<String>,
}

// Entrega de aparelho importada (vira uma movimentação "Em uso")
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct MovementRow {
    pub numero_serie_aparelho: String,
    pub nome_colaborador: String,
    #[serde(default)]
    pub localizacao: Option<String>,
    #[serde(default)]
    pub observacoes: Option<String>,
}

// Exportação de aparelhos: inclui o responsável atual
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct DeviceExportRow {
    pub numero_serie: String,
    pub imei1: Option<String>,
    pub imei2: Option<String>,
    pub valor: Decimal,
    pub modelo_completo: String,
    pub status: String,
    pub responsavel_atual: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RowError {
    pub row: usize,
    #[schema(value_type = String)]
    pub kind: ErrorKind,
    pub message: String,
}

#[derive(Debug, Clone, Default, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ImportReport {
    pub succeeded: usize,
    pub failed: usize,
    pub errors: Vec<RowError>,
}

impl ImportReport {
    pub fn record_success(&mut self) {
        self.succeeded += 1;
    }

    /// `index` é a posição da linha no array recebido (base zero).
    pub fn record_failure(&mut self, index: usize, err: &AppError) {
        self.failed += 1;
        self.errors.push(RowError {
            row: index + FIRST_DATA_ROW,
            kind: err.kind(),
            message: err.to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_are_numbered_like_the_spreadsheet() {
        let mut report = ImportReport::default();
        report.record_success();
        report.record_failure(4, &AppError::CpfAlreadyExists("111".into()));

        assert_eq!(report.succeeded, 1);
        assert_eq!(report.failed, 1);
        assert_eq!(report.errors[0].row, 6);
        assert_eq!(report.errors[0].kind, ErrorKind::Conflict);
    }

    #[test]
    fn employee_row_reads_fixed_headers() {
        let row: EmployeeRow = serde_json::from_value(serde_json::json!({
            "codigo": "C01",
            "nome_completo": "Ana Souza",
            "cpf": "12345678901",
            "nome_setor": "TI"
        }))
        .unwrap();
        assert_eq!(row.gmail, None);
        assert_eq!(row.nome_setor.as_deref(), Some("TI"));
    }
}
