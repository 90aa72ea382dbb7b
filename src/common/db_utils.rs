// src/common/db_utils.rs

use crate::common::error::AppError;

/// Nome da constraint violada, se o erro for de unicidade.
pub(crate) fn unique_violation(e: &sqlx::Error) -> Option<&str> {
    if let sqlx::Error::Database(db_err) = e {
        if db_err.is_unique_violation() {
            return db_err.constraint();
        }
    }
    None
}

/// Converte violações de chave estrangeira em `UnknownReference`.
/// Os demais erros seguem como `DatabaseError`.
pub(crate) fn map_foreign_key(e: sqlx::Error, reference: &str) -> AppError {
    if let sqlx::Error::Database(db_err) = &e {
        if db_err.is_foreign_key_violation() {
            return AppError::UnknownReference(reference.to_string());
        }
    }
    e.into()
}

/// Escapa um literal para uso em scripts SQL gerados (backup).
pub(crate) fn quote_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

/// Escapa curingas de LIKE e envolve o termo em `%`.
pub(crate) fn like_pattern(term: &str) -> String {
    let escaped = term
        .trim()
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quote_literal_doubles_single_quotes() {
        assert_eq!(quote_literal("D'Ávila"), "'D''Ávila'");
    }

    #[test]
    fn like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern(" 50%_off "), "%50\\%\\_off%");
    }
}
