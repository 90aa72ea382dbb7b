// src/models/chat.rs

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use utoipa::ToSchema;
use validator::Validate;

/// Ações que o assistente sabe executar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ToSchema)]
pub enum ChatAction {
    CreateEmployee,
    CreateDevice,
    SearchDevice,
    EditEmployee,
    DeleteEmployee,
    DeleteDevice,
    SearchMovements,
    ProvideData,
    CorrectField,
    Cancel,
    Unknown,
}

impl ChatAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChatAction::CreateEmployee => "create_employee",
            ChatAction::CreateDevice => "create_device",
            ChatAction::SearchDevice => "search_device",
            ChatAction::EditEmployee => "edit_employee",
            ChatAction::DeleteEmployee => "delete_employee",
            ChatAction::DeleteDevice => "delete_device",
            ChatAction::SearchMovements => "search_movements",
            ChatAction::ProvideData => "provide_data",
            ChatAction::CorrectField => "correct_field",
            ChatAction::Cancel => "cancel",
            ChatAction::Unknown => "unknown",
        }
    }

    /// Aceita os nomes em inglês e os do esquema em português do NLU.
    /// Qualquer outro valor vira `Unknown`.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "create_employee" | "criar_colaborador" => ChatAction::CreateEmployee,
            "create_device" | "criar_aparelho" => ChatAction::CreateDevice,
            "search_device" | "pesquisar_aparelho" => ChatAction::SearchDevice,
            "edit_employee" | "editar_colaborador" => ChatAction::EditEmployee,
            "delete_employee" | "excluir_colaborador" => ChatAction::DeleteEmployee,
            "delete_device" | "excluir_aparelho" => ChatAction::DeleteDevice,
            "search_movements" | "pesquisar_movimentacoes" => ChatAction::SearchMovements,
            "provide_data" | "informar_dado" => ChatAction::ProvideData,
            "correct_field" | "corrigir_campo" => ChatAction::CorrectField,
            "cancel" | "cancelar" => ChatAction::Cancel,
            _ => ChatAction::Unknown,
        }
    }

    /// Campos que precisam ser coletados antes de executar, na ordem em que são pedidos.
    pub fn required_fields(&self) -> &'static [&'static str] {
        match self {
            ChatAction::CreateEmployee => &["codigo", "nome_completo", "cpf"],
            ChatAction::CreateDevice => &["numero_serie", "marca", "modelo"],
            ChatAction::EditEmployee | ChatAction::DeleteEmployee => &["codigo"],
            ChatAction::DeleteDevice => &["numero_serie"],
            _ => &[],
        }
    }

    /// Ações de escrita que passam pela coleta de campos.
    pub fn collects_fields(&self) -> bool {
        !self.required_fields().is_empty()
    }
}

impl Serialize for ChatAction {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ChatAction {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(ChatAction::parse(&raw))
    }
}

/// Intenção estruturada, vinda do NLU ou do próprio cliente.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Intent {
    #[serde(alias = "acao")]
    pub action: ChatAction,
    #[serde(default, alias = "entidade")]
    pub entity: Option<String>,
    #[serde(default, alias = "dados")]
    #[schema(value_type = Object)]
    pub data: Map<String, Value>,
    #[serde(default, alias = "filtros")]
    #[schema(value_type = Object)]
    pub filters: Map<String, Value>,
}

impl Intent {
    pub fn new(action: ChatAction) -> Self {
        Self { action, entity: None, data: Map::new(), filters: Map::new() }
    }
}

/// Estado da conversa, devolvido ao cliente e reenviado a cada turno.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConversationContext {
    pub pending_action: Option<ChatAction>,
    #[serde(default)]
    #[schema(value_type = Object)]
    pub collected_fields: BTreeMap<String, Value>,
    pub correction_target: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChatTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChatReply {
    pub reply: String,
    pub table: Option<ChatTable>,
    pub context: ConversationContext,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct IntentRequest {
    pub intent: Intent,
    #[serde(default)]
    pub context: ConversationContext,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MessageRequest {
    #[validate(length(min = 1, max = 2000, message = "A mensagem não pode ser vazia."))]
    pub message: String,
    #[serde(default)]
    pub context: ConversationContext,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn intent_accepts_portuguese_schema() {
        let intent: Intent = serde_json::from_value(json!({
            "acao": "criar_colaborador",
            "entidade": "colaborador",
            "dados": { "nome_completo": "Ana Souza" }
        }))
        .unwrap();
        assert_eq!(intent.action, ChatAction::CreateEmployee);
        assert_eq!(intent.data["nome_completo"], json!("Ana Souza"));
        assert!(intent.filters.is_empty());
    }

    #[test]
    fn unrecognized_action_becomes_unknown() {
        let intent: Intent = serde_json::from_value(json!({ "action": "dançar" })).unwrap();
        assert_eq!(intent.action, ChatAction::Unknown);
    }
}
