// src/services/backup_service.rs

use chrono::Utc;

use crate::{
    common::{db_utils::quote_literal, error::AppError},
    db::{backup_repo::BACKUP_TABLES, BackupRepository},
};

/// Esquema completo, o mesmo aplicado pelas migrações.
const SCHEMA_SQL: &str = include_str!("../../migrations/20250601000000_initial_schema.sql");

// Tabelas com chave BIGSERIAL (users usa UUID)
fn has_serial_id(table: &str) -> bool {
    table != "users"
}

/// Monta o script de restauração a partir das linhas em JSON de cada tabela.
pub fn build_script(tables: &[(&str, Vec<String>)]) -> String {
    let mut script = String::new();
    script.push_str(&format!(
        "-- Backup AssetFlow gerado em {}\n\n",
        Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
    ));
    script.push_str(SCHEMA_SQL);
    script.push_str("\n\n-- Dados\n");

    for (table, rows) in tables {
        if rows.is_empty() {
            continue;
        }
        script.push_str(&format!("\n-- {} ({} linhas)\n", table, rows.len()));
        for row in rows {
            script.push_str(&format!(
                "INSERT INTO {table} SELECT * FROM json_populate_record(NULL::{table}, {});\n",
                quote_literal(row),
            ));
        }
    }

    script.push_str("\n-- Sequências\n");
    for table in BACKUP_TABLES.iter().filter(|t| has_serial_id(t)) {
        script.push_str(&format!(
            "SELECT setval(pg_get_serial_sequence('{table}', 'id'), COALESCE((SELECT MAX(id) FROM {table}), 0) + 1, false);\n",
        ));
    }
    script
}

#[derive(Clone)]
pub struct BackupService {
    repo: BackupRepository,
}

impl BackupService {
    pub fn new(repo: BackupRepository) -> Self {
        Self { repo }
    }

    pub async fn create_backup(&self) -> Result<String, AppError> {
        let tables = self.repo.dump_rows().await?;
        let total: usize = tables.iter().map(|(_, rows)| rows.len()).sum();
        tracing::info!("💾 Backup gerado com {} registros", total);
        Ok(build_script(&tables))
    }

    /// Substitui todo o banco pelo conteúdo do script.
    /// Qualquer erro desfaz a operação inteira.
    pub async fn restore(&self, script: &str) -> Result<(), AppError> {
        if script.trim().is_empty() {
            return Err(AppError::InvalidInput("script de restauração vazio".into()));
        }

        let mut restore = self.repo.begin_restore().await?;
        let dropped = restore.drop_entity_tables().await?;
        tracing::warn!("♻️ Restauração: {} tabelas removidas", dropped);

        restore.replay(script).await?;
        restore.commit().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn script_contains_schema_rows_and_sequences() {
        let tables = vec![
            ("brands", vec![r#"{"id":1,"name":"Samsung"}"#.to_string()]),
            ("employees", vec![r#"{"id":7,"full_name":"Ana D'Ávila"}"#.to_string()]),
            ("devices", Vec::new()),
        ];
        let script = build_script(&tables);

        assert!(script.contains("CREATE TABLE movement_history"));
        assert!(script.contains(
            r#"INSERT INTO brands SELECT * FROM json_populate_record(NULL::brands, '{"id":1,"name":"Samsung"}');"#
        ));
        assert!(script.contains("Ana D''Ávila"));
        assert!(!script.contains("-- devices"));
        assert!(script.contains("pg_get_serial_sequence('devices', 'id')"));
        assert!(!script.contains("pg_get_serial_sequence('users'"));
    }

    #[test]
    fn data_comes_after_schema() {
        let tables = vec![("sectors", vec![r#"{"id":1,"name":"TI"}"#.to_string()])];
        let script = build_script(&tables);
        let schema_at = script.find("CREATE TABLE sectors").unwrap();
        let insert_at = script.find("INSERT INTO sectors").unwrap();
        assert!(schema_at < insert_at);
    }
}
