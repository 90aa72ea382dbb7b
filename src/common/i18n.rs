// src/common/i18n.rs

use std::collections::HashMap;

pub const DEFAULT_LANG: &str = "pt";

const PT: &[(&str, &str)] = &[
    ("validation_error", "Um ou mais campos são inválidos."),
    ("invalid_input", "Dados inválidos: {0}"),
    ("unknown_reference", "Referência desconhecida: {0}"),
    ("invalid_transition", "Transição de status não permitida: {0}"),
    ("device_not_held_by", "O aparelho {0} não está com este colaborador."),
    ("maintenance_order_not_open", "A O.S. {0} não está em andamento."),
    ("serial_number_already_exists", "O número de série '{0}' já existe."),
    ("cpf_already_exists", "O CPF '{0}' já existe."),
    ("employee_code_already_exists", "O código '{0}' já existe."),
    ("gmail_already_exists", "O e-mail '{0}' já existe."),
    ("login_already_exists", "O login '{0}' já existe."),
    ("catalog_name_already_exists", "'{0}' já existe."),
    ("maintenance_order_already_open", "Já existe uma O.S. em andamento para o aparelho {0}."),
    ("referenced_by_history", "Registro {0} possui histórico de movimentações e não pode ser excluído."),
    ("device_not_found", "Aparelho {0} não encontrado."),
    ("employee_not_found", "Colaborador {0} não encontrado."),
    ("maintenance_order_not_found", "O.S. {0} não encontrada."),
    ("movement_not_found", "Movimentação {0} não encontrada."),
    ("gmail_account_not_found", "Conta Gmail {0} não encontrada."),
    ("user_not_found", "Usuário não encontrado."),
    ("invalid_credentials", "Login ou senha inválidos."),
    ("invalid_token", "Sessão inválida ou expirada."),
    ("forbidden", "Você precisa do perfil '{0}' para realizar esta ação."),
    ("nlu_unavailable", "Desculpe, o assistente está indisponível no momento."),
    ("restore_failed", "Falha ao restaurar o backup: {0}"),
    ("internal_error", "Ocorreu um erro interno no servidor."),
];

const EN: &[(&str, &str)] = &[
    ("validation_error", "One or more fields are invalid."),
    ("invalid_input", "Invalid data: {0}"),
    ("unknown_reference", "Unknown reference: {0}"),
    ("invalid_transition", "Status transition not allowed: {0}"),
    ("device_not_held_by", "Device {0} is not held by this employee."),
    ("maintenance_order_not_open", "Maintenance order {0} is not open."),
    ("serial_number_already_exists", "Serial number '{0}' already exists."),
    ("cpf_already_exists", "CPF '{0}' already exists."),
    ("employee_code_already_exists", "Employee code '{0}' already exists."),
    ("gmail_already_exists", "E-mail '{0}' already exists."),
    ("login_already_exists", "Login '{0}' already exists."),
    ("catalog_name_already_exists", "'{0}' already exists."),
    ("maintenance_order_already_open", "Device {0} already has an open maintenance order."),
    ("referenced_by_history", "Record {0} has movement history and cannot be deleted."),
    ("device_not_found", "Device {0} not found."),
    ("employee_not_found", "Employee {0} not found."),
    ("maintenance_order_not_found", "Maintenance order {0} not found."),
    ("movement_not_found", "Movement {0} not found."),
    ("gmail_account_not_found", "Gmail account {0} not found."),
    ("user_not_found", "User not found."),
    ("invalid_credentials", "Invalid login or password."),
    ("invalid_token", "Invalid or expired session."),
    ("forbidden", "You need the '{0}' role to perform this action."),
    ("nlu_unavailable", "Sorry, the assistant is unavailable right now."),
    ("restore_failed", "Backup restore failed: {0}"),
    ("internal_error", "An internal server error occurred."),
];

/// Mensagens traduzidas por idioma. Chaves ausentes caem para o português.
#[derive(Debug, Clone)]
pub struct I18nStore {
    messages: HashMap<&'static str, HashMap<&'static str, &'static str>>,
}

impl Default for I18nStore {
    fn default() -> Self {
        let mut messages = HashMap::new();
        messages.insert("pt", PT.iter().copied().collect());
        messages.insert("en", EN.iter().copied().collect());
        Self { messages }
    }
}

impl I18nStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Devolve a mensagem de `key` no idioma pedido, com `{0}` substituído por `arg`.
    /// Retorna string vazia se a chave não existir em nenhum idioma.
    pub fn translate(&self, lang: &str, key: &str, arg: Option<&str>) -> String {
        let template = self
            .messages
            .get(lang)
            .and_then(|m| m.get(key))
            .or_else(|| self.messages.get(DEFAULT_LANG).and_then(|m| m.get(key)));

        match (template, arg) {
            (Some(t), Some(a)) => t.replace("{0}", a),
            (Some(t), None) => t.replace(" {0}", "").replace("{0}", ""),
            (None, _) => String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn falls_back_to_portuguese_for_unknown_language() {
        let store = I18nStore::default();
        assert_eq!(
            store.translate("fr", "cpf_already_exists", Some("123")),
            "O CPF '123' já existe."
        );
    }

    #[test]
    fn translates_to_english() {
        let store = I18nStore::default();
        assert_eq!(
            store.translate("en", "device_not_found", Some("SN-1")),
            "Device SN-1 not found."
        );
    }

    #[test]
    fn unknown_key_is_empty() {
        assert!(I18nStore::default().translate("pt", "nao_existe", None).is_empty());
    }
}
