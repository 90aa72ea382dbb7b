// src/services/chat_service.rs
//
// Assistente "Flow": recebe uma intenção estruturada e o contexto da conversa,
// decide o próximo passo (perguntar, executar ou responder) e devolve o novo
// contexto. O servidor não guarda estado entre turnos.

use std::{collections::BTreeMap, sync::Arc, time::Duration};

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::{Map, Value};
use sqlx::PgPool;
use validator::Validate;

use crate::{
    common::{
        error::{AppError, ErrorKind},
        i18n::I18nStore,
    },
    db::{CatalogRepository, DeviceRepository},
    middleware::i18n::Locale,
    models::{
        chat::{ChatAction, ChatReply, ChatTable, ConversationContext, Intent},
        device::{CreateDevicePayload, DeviceStatus},
        employee::EmployeePayload,
        ledger::HistoryFilter,
    },
    services::{device_service::DeviceService, employee_service::EmployeeService, ledger_service::LedgerService},
};

pub const HELP_TEXT: &str = "Sou o Flow, seu assistente. Posso cadastrar colaboradores e aparelhos, \
editar ou excluir colaboradores, excluir aparelhos e pesquisar aparelhos ou movimentações.";

const NLU_APOLOGY: &str = "Desculpe, não consegui falar com o serviço de linguagem agora. Tente novamente em instantes.";

// ---
// Planejamento do turno (sem acesso ao banco)
// ---

#[derive(Debug, Clone, PartialEq)]
pub enum TurnPlan {
    /// Falta um campo: pergunta ao usuário.
    Ask { field: String, prompt: String },
    /// Tudo coletado: executa a ação com os campos (e filtros, nas pesquisas).
    Execute { action: ChatAction, fields: Map<String, Value> },
    Reply(String),
}

fn field_label(field: &str) -> &str {
    match field {
        "codigo" => "o código do colaborador",
        "nome_completo" => "o nome completo",
        "cpf" => "o CPF",
        "numero_serie" => "o número de série",
        "marca" => "a marca",
        "modelo" => "o modelo",
        "gmail" => "o Gmail",
        "valor" => "o valor",
        other => other,
    }
}

fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => !s.trim().is_empty(),
        _ => true,
    }
}

fn merge_present(target: &mut BTreeMap<String, Value>, data: Map<String, Value>) {
    for (key, value) in data {
        if is_present(&value) {
            target.insert(key, value);
        }
    }
}

/// Pergunta o próximo campo obrigatório ou libera a execução.
fn next_step(ctx: ConversationContext) -> (ConversationContext, TurnPlan) {
    let Some(action) = ctx.pending_action else {
        return (ctx, TurnPlan::Reply(HELP_TEXT.to_string()));
    };

    let missing = action
        .required_fields()
        .iter()
        .find(|field| !ctx.collected_fields.get(**field).is_some_and(is_present));

    match missing {
        Some(field) => {
            let prompt = format!("Por favor, informe {}.", field_label(field));
            (ctx, TurnPlan::Ask { field: field.to_string(), prompt })
        }
        None => {
            let fields = ctx.collected_fields.clone().into_iter().collect();
            (ctx, TurnPlan::Execute { action, fields })
        }
    }
}

/// Decide o que fazer com a intenção recebida, dado o contexto atual.
pub fn plan_turn(ctx: ConversationContext, intent: Intent) -> (ConversationContext, TurnPlan) {
    match intent.action {
        ChatAction::Cancel => (
            ConversationContext::default(),
            TurnPlan::Reply("Tudo bem, operação cancelada.".to_string()),
        ),

        ChatAction::Unknown => {
            let reply = match ctx.pending_action {
                Some(action) => format!(
                    "Não entendi. Ainda estamos em '{}'; informe o dado pedido ou diga \"cancelar\".",
                    action.as_str()
                ),
                None => format!("Não entendi o pedido. {}", HELP_TEXT),
            };
            (ctx, TurnPlan::Reply(reply))
        }

        // Pesquisas rodam na hora e não mexem na coleta em andamento
        ChatAction::SearchDevice | ChatAction::SearchMovements => {
            let mut fields = intent.filters;
            for (key, value) in intent.data {
                fields.entry(key).or_insert(value);
            }
            (ctx, TurnPlan::Execute { action: intent.action, fields })
        }

        ChatAction::ProvideData => {
            if ctx.pending_action.is_none() {
                return (
                    ctx,
                    TurnPlan::Reply(format!("Não há nenhuma operação em andamento. {}", HELP_TEXT)),
                );
            }
            let mut ctx = ctx;
            match ctx.correction_target.take() {
                Some(target) => {
                    // Aceita o valor pela chave do campo ou, se vier um único valor, por posição
                    let value = intent.data.get(&target).cloned().or_else(|| {
                        (intent.data.len() == 1).then(|| intent.data.values().next().cloned()).flatten()
                    });
                    match value.filter(is_present) {
                        Some(value) => {
                            ctx.collected_fields.insert(target, value);
                        }
                        None => {
                            let prompt = format!("Qual o novo valor para {}?", field_label(&target));
                            ctx.correction_target = Some(target.clone());
                            return (ctx, TurnPlan::Ask { field: target, prompt });
                        }
                    }
                }
                None => merge_present(&mut ctx.collected_fields, intent.data),
            }
            next_step(ctx)
        }

        ChatAction::CorrectField => {
            if ctx.pending_action.is_none() {
                return (ctx, TurnPlan::Reply("Não há nenhuma operação em andamento para corrigir.".to_string()));
            }
            let mut ctx = ctx;
            if intent.data.values().any(is_present) {
                merge_present(&mut ctx.collected_fields, intent.data);
                ctx.correction_target = None;
                return next_step(ctx);
            }

            let target = intent
                .filters
                .get("campo")
                .and_then(Value::as_str)
                .map(str::to_string)
                .or(intent.entity);
            match target {
                Some(field) => {
                    let prompt = format!("Qual o novo valor para {}?", field_label(&field));
                    ctx.correction_target = Some(field.clone());
                    (ctx, TurnPlan::Ask { field, prompt })
                }
                None => (ctx, TurnPlan::Reply("Qual campo você deseja corrigir?".to_string())),
            }
        }

        // Ações de escrita: começa uma coleta nova
        action => {
            let mut ctx = ConversationContext { pending_action: Some(action), ..Default::default() };
            merge_present(&mut ctx.collected_fields, intent.data);
            next_step(ctx)
        }
    }
}

// ---
// Interpretação de texto livre (serviço externo)
// ---

#[async_trait]
pub trait IntentParser: Send + Sync {
    async fn parse(&self, message: &str, context: &ConversationContext) -> Result<Intent, AppError>;
}

#[derive(Serialize)]
struct NluRequest<'a> {
    message: &'a str,
    context: &'a ConversationContext,
}

/// Cliente HTTP do serviço de NLU. A resposta deve ser a intenção em JSON.
pub struct HttpIntentParser {
    client: reqwest::Client,
    url: String,
    api_key: Option<String>,
    timeout_secs: u64,
}

impl HttpIntentParser {
    pub fn new(url: String, api_key: Option<String>, timeout_secs: u64) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| anyhow::anyhow!("Falha ao criar cliente NLU: {}", e))?;
        Ok(Self { client, url, api_key, timeout_secs })
    }
}

#[async_trait]
impl IntentParser for HttpIntentParser {
    async fn parse(&self, message: &str, context: &ConversationContext) -> Result<Intent, AppError> {
        let mut request = self.client.post(&self.url).json(&NluRequest { message, context });
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                AppError::NluUnavailable(format!("sem resposta em {}s", self.timeout_secs))
            } else {
                AppError::NluUnavailable(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::NluUnavailable(format!("HTTP {}", status)));
        }

        response
            .json::<Intent>()
            .await
            .map_err(|e| AppError::NluUnavailable(format!("resposta inválida: {}", e)))
    }
}

// ---
// Execução
// ---

fn text(fields: &Map<String, Value>, key: &str) -> Option<String> {
    match fields.get(key)? {
        Value::String(s) => Some(s.trim().to_string()).filter(|s| !s.is_empty()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn required_text(fields: &Map<String, Value>, key: &str) -> Result<String, AppError> {
    text(fields, key).ok_or_else(|| AppError::InvalidInput(format!("informe {}", field_label(key))))
}

fn decimal(fields: &Map<String, Value>, key: &str) -> Result<Option<Decimal>, AppError> {
    match text(fields, key) {
        Some(raw) => raw
            .replace(',', ".")
            .parse::<Decimal>()
            .map(Some)
            .map_err(|_| AppError::InvalidInput(format!("valor '{}' não é um número", raw))),
        None => Ok(None),
    }
}

/// Mensagem de erro mostrada dentro da conversa.
fn error_reply(err: &AppError, locale: &Locale, store: &I18nStore) -> String {
    if let AppError::ValidationError(errors) = err {
        let messages: Vec<String> = errors
            .field_errors()
            .values()
            .flat_map(|errs| errs.iter().filter_map(|e| e.message.as_ref().map(|m| m.to_string())))
            .collect();
        return format!("Não foi possível concluir: {}", messages.join(" "));
    }
    format!("Não foi possível concluir: {}", err.user_message(locale, store))
}

struct Outcome {
    reply: String,
    table: Option<ChatTable>,
}

impl Outcome {
    fn text(reply: impl Into<String>) -> Self {
        Self { reply: reply.into(), table: None }
    }
}

#[derive(Clone)]
pub struct ChatService {
    pool: PgPool,
    catalog_repo: CatalogRepository,
    device_repo: DeviceRepository,
    employee_service: EmployeeService,
    device_service: DeviceService,
    ledger_service: LedgerService,
    parser: Option<Arc<dyn IntentParser>>,
}

impl ChatService {
    pub fn new(
        pool: PgPool,
        catalog_repo: CatalogRepository,
        device_repo: DeviceRepository,
        employee_service: EmployeeService,
        device_service: DeviceService,
        ledger_service: LedgerService,
        parser: Option<Arc<dyn IntentParser>>,
    ) -> Self {
        Self { pool, catalog_repo, device_repo, employee_service, device_service, ledger_service, parser }
    }

    /// Texto livre: consulta o NLU e segue como uma intenção.
    /// Falha do NLU vira um pedido de desculpas, sem alterar o contexto.
    pub async fn handle_message(
        &self,
        message: &str,
        context: ConversationContext,
        locale: &Locale,
        store: &I18nStore,
    ) -> Result<ChatReply, AppError> {
        let parsed = match &self.parser {
            Some(parser) => parser.parse(message, &context).await,
            None => Err(AppError::NluUnavailable("serviço de NLU não configurado".into())),
        };

        match parsed {
            Ok(intent) => self.handle_intent(intent, context, locale, store).await,
            Err(err) if err.kind() == ErrorKind::Transient => {
                tracing::warn!("Assistente: {}", err);
                Ok(ChatReply { reply: NLU_APOLOGY.to_string(), table: None, context })
            }
            Err(err) => Err(err),
        }
    }

    pub async fn handle_intent(
        &self,
        intent: Intent,
        context: ConversationContext,
        locale: &Locale,
        store: &I18nStore,
    ) -> Result<ChatReply, AppError> {
        tracing::debug!("Assistente: ação {}", intent.action.as_str());
        let (context, plan) = plan_turn(context, intent);

        match plan {
            TurnPlan::Ask { prompt, .. } => Ok(ChatReply { reply: prompt, table: None, context }),
            TurnPlan::Reply(reply) => Ok(ChatReply { reply, table: None, context }),
            TurnPlan::Execute { action, fields } => match self.execute(action, &fields).await {
                Ok(outcome) => {
                    // Pesquisas não encerram a coleta em andamento
                    let context = if action.collects_fields() { ConversationContext::default() } else { context };
                    Ok(ChatReply { reply: outcome.reply, table: outcome.table, context })
                }
                Err(err) if err.kind() == ErrorKind::Internal => Err(err),
                // Mantém os dados coletados para o usuário corrigir o campo
                Err(err) => Ok(ChatReply { reply: error_reply(&err, locale, store), table: None, context }),
            },
        }
    }

    async fn execute(&self, action: ChatAction, fields: &Map<String, Value>) -> Result<Outcome, AppError> {
        match action {
            ChatAction::CreateEmployee => self.create_employee(fields).await,
            ChatAction::CreateDevice => self.create_device(fields).await,
            ChatAction::SearchDevice => self.search_devices(fields).await,
            ChatAction::EditEmployee => self.edit_employee(fields).await,
            ChatAction::DeleteEmployee => self.delete_employee(fields).await,
            ChatAction::DeleteDevice => self.delete_device(fields).await,
            ChatAction::SearchMovements => self.search_movements(fields).await,
            _ => Ok(Outcome::text(HELP_TEXT)),
        }
    }

    async fn resolve_sector(&self, fields: &Map<String, Value>) -> Result<Option<i64>, AppError> {
        let Some(name) = text(fields, "nome_setor") else { return Ok(None) };
        let sector = self
            .catalog_repo
            .find_sector_by_name(&self.pool, &name)
            .await?
            .ok_or_else(|| AppError::UnknownReference(format!("setor '{}'", name)))?;
        Ok(Some(sector.id))
    }

    async fn create_employee(&self, fields: &Map<String, Value>) -> Result<Outcome, AppError> {
        let payload = EmployeePayload {
            code: required_text(fields, "codigo")?,
            full_name: required_text(fields, "nome_completo")?,
            cpf: required_text(fields, "cpf")?,
            gmail: text(fields, "gmail"),
            sector_id: self.resolve_sector(fields).await?,
        };
        payload.validate()?;

        let employee = self.employee_service.create_employee(&self.pool, &payload).await?;
        Ok(Outcome::text(format!(
            "Colaborador {} (código {}) cadastrado com sucesso.",
            employee.full_name, employee.code
        )))
    }

    async fn create_device(&self, fields: &Map<String, Value>) -> Result<Outcome, AppError> {
        let brand = required_text(fields, "marca")?;
        let model_name = required_text(fields, "modelo")?;
        let model = self
            .catalog_repo
            .find_model(&self.pool, &brand, &model_name)
            .await?
            .ok_or_else(|| AppError::UnknownReference(format!("modelo '{} - {}'", brand, model_name)))?;

        let payload = CreateDevicePayload {
            serial_number: required_text(fields, "numero_serie")?,
            model_id: model.id,
            imei1: text(fields, "imei1"),
            imei2: text(fields, "imei2"),
            value: decimal(fields, "valor")?.unwrap_or(Decimal::ZERO),
            acquired_on: None,
            initial_status: None,
        };
        payload.validate()?;

        let device = self.device_service.create_device(&self.pool, &payload).await?;
        Ok(Outcome::text(format!(
            "Aparelho {} {} (série {}) cadastrado em estoque.",
            brand, model_name, device.serial_number
        )))
    }

    async fn search_devices(&self, fields: &Map<String, Value>) -> Result<Outcome, AppError> {
        let term = text(fields, "numero_serie").or_else(|| text(fields, "nome_colaborador"));
        let status = text(fields, "status").map(|s| s.parse::<DeviceStatus>()).transpose()?;
        let devices = self.device_service.list_devices(term.as_deref(), status).await?;

        if devices.is_empty() {
            return Ok(Outcome::text("Nenhum aparelho encontrado."));
        }
        let table = ChatTable {
            columns: ["Número de série", "Marca", "Modelo", "Status", "Colaborador", "Localização"]
                .map(String::from)
                .to_vec(),
            rows: devices
                .iter()
                .map(|d| {
                    vec![
                        d.serial_number.clone(),
                        d.brand_name.clone(),
                        d.model_name.clone(),
                        d.status.to_string(),
                        d.holder_name.clone().unwrap_or_default(),
                        d.location.clone().unwrap_or_default(),
                    ]
                })
                .collect(),
        };
        Ok(Outcome { reply: format!("Encontrei {} aparelho(s).", devices.len()), table: Some(table) })
    }

    async fn edit_employee(&self, fields: &Map<String, Value>) -> Result<Outcome, AppError> {
        let code = required_text(fields, "codigo")?;
        let current = self.employee_service.find_by_code(&self.pool, &code).await?;

        let changes = ["nome_completo", "cpf", "gmail", "nome_setor"]
            .iter()
            .filter(|key| text(fields, key).is_some())
            .count();
        if changes == 0 {
            return Ok(Outcome::text(format!(
                "Nenhuma alteração informada para o colaborador {}.",
                current.code
            )));
        }

        let sector_id = match self.resolve_sector(fields).await? {
            Some(id) => Some(id),
            None => current.sector_id,
        };
        let payload = EmployeePayload {
            code: current.code.clone(),
            full_name: text(fields, "nome_completo").unwrap_or(current.full_name),
            cpf: text(fields, "cpf").unwrap_or(current.cpf),
            gmail: text(fields, "gmail").or(current.gmail),
            sector_id,
        };
        payload.validate()?;

        let employee = self.employee_service.update_employee(&self.pool, current.id, &payload).await?;
        Ok(Outcome::text(format!("Colaborador {} atualizado.", employee.full_name)))
    }

    async fn delete_employee(&self, fields: &Map<String, Value>) -> Result<Outcome, AppError> {
        let code = required_text(fields, "codigo")?;
        let employee = self.employee_service.find_by_code(&self.pool, &code).await?;
        self.employee_service.delete_employee(&self.pool, employee.id).await?;
        Ok(Outcome::text(format!("Colaborador {} excluído.", employee.full_name)))
    }

    async fn delete_device(&self, fields: &Map<String, Value>) -> Result<Outcome, AppError> {
        let serial = required_text(fields, "numero_serie")?;
        let device = self
            .device_repo
            .find_by_serial(&self.pool, &serial)
            .await?
            .ok_or_else(|| AppError::DeviceNotFound(serial.clone()))?;
        self.device_service.delete_device(&self.pool, device.id).await?;
        Ok(Outcome::text(format!("Aparelho {} excluído.", serial)))
    }

    async fn search_movements(&self, fields: &Map<String, Value>) -> Result<Outcome, AppError> {
        let filter = HistoryFilter {
            status: text(fields, "status").map(|s| s.parse::<DeviceStatus>()).transpose()?,
            from: None,
            to: None,
            serial_number: text(fields, "numero_serie"),
            employee_name: text(fields, "nome_colaborador"),
        };
        let rows = self.ledger_service.search_history(&filter).await?;

        if rows.is_empty() {
            return Ok(Outcome::text("Nenhuma movimentação encontrada."));
        }
        let table = ChatTable {
            columns: ["Data", "Aparelho", "Colaborador", "Status", "Localização"].map(String::from).to_vec(),
            rows: rows
                .iter()
                .map(|r| {
                    vec![
                        r.moved_at.format("%d/%m/%Y %H:%M").to_string(),
                        r.serial_number.clone(),
                        r.employee_name.clone().unwrap_or_default(),
                        r.status.to_string(),
                        r.location.clone().unwrap_or_default(),
                    ]
                })
                .collect(),
        };
        Ok(Outcome { reply: format!("Encontrei {} movimentação(ões).", rows.len()), table: Some(table) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn intent(action: ChatAction, data: Value) -> Intent {
        let mut intent = Intent::new(action);
        if let Value::Object(map) = data {
            intent.data = map;
        }
        intent
    }

    #[test]
    fn collection_asks_missing_fields_one_at_a_time() {
        let (ctx, plan) = plan_turn(
            ConversationContext::default(),
            intent(ChatAction::CreateEmployee, json!({ "nome_completo": "Ana Souza" })),
        );
        assert_eq!(ctx.pending_action, Some(ChatAction::CreateEmployee));
        assert!(matches!(plan, TurnPlan::Ask { ref field, .. } if field == "codigo"));

        let (ctx, plan) = plan_turn(ctx, intent(ChatAction::ProvideData, json!({ "codigo": "C42" })));
        assert!(matches!(plan, TurnPlan::Ask { ref field, .. } if field == "cpf"));

        let (ctx, plan) = plan_turn(ctx, intent(ChatAction::ProvideData, json!({ "cpf": "12345678901" })));
        match plan {
            TurnPlan::Execute { action, fields } => {
                assert_eq!(action, ChatAction::CreateEmployee);
                assert_eq!(fields["codigo"], json!("C42"));
                assert_eq!(fields["nome_completo"], json!("Ana Souza"));
                assert_eq!(fields["cpf"], json!("12345678901"));
            }
            other => panic!("esperava execução, veio {:?}", other),
        }
        assert_eq!(ctx.collected_fields.len(), 3);
    }

    #[test]
    fn blank_values_do_not_count_as_collected() {
        let (_, plan) = plan_turn(
            ConversationContext::default(),
            intent(ChatAction::DeleteDevice, json!({ "numero_serie": "  " })),
        );
        assert!(matches!(plan, TurnPlan::Ask { ref field, .. } if field == "numero_serie"));
    }

    #[test]
    fn correction_targets_the_named_field() {
        let ctx = ConversationContext {
            pending_action: Some(ChatAction::CreateEmployee),
            collected_fields: BTreeMap::from([
                ("codigo".to_string(), json!("C42")),
                ("nome_completo".to_string(), json!("Ana Souza")),
            ]),
            correction_target: None,
        };

        let mut correct = Intent::new(ChatAction::CorrectField);
        correct.filters.insert("campo".into(), json!("nome_completo"));
        let (ctx, plan) = plan_turn(ctx, correct);
        assert_eq!(ctx.correction_target.as_deref(), Some("nome_completo"));
        assert!(matches!(plan, TurnPlan::Ask { ref field, .. } if field == "nome_completo"));

        // Valor vem sem chave: vale para o campo em correção
        let (ctx, plan) = plan_turn(ctx, intent(ChatAction::ProvideData, json!({ "valor": "Ana Souza Lima" })));
        assert_eq!(ctx.correction_target, None);
        assert_eq!(ctx.collected_fields["nome_completo"], json!("Ana Souza Lima"));
        assert!(matches!(plan, TurnPlan::Ask { ref field, .. } if field == "cpf"));
    }

    #[test]
    fn correction_with_data_applies_directly() {
        let ctx = ConversationContext {
            pending_action: Some(ChatAction::DeleteDevice),
            collected_fields: BTreeMap::from([("numero_serie".to_string(), json!("SN-1"))]),
            correction_target: None,
        };
        let (ctx, plan) = plan_turn(ctx, intent(ChatAction::CorrectField, json!({ "numero_serie": "SN-2" })));
        assert_eq!(ctx.collected_fields["numero_serie"], json!("SN-2"));
        assert!(matches!(plan, TurnPlan::Execute { action: ChatAction::DeleteDevice, .. }));
    }

    #[test]
    fn cancel_clears_context() {
        let ctx = ConversationContext {
            pending_action: Some(ChatAction::CreateDevice),
            collected_fields: BTreeMap::from([("marca".to_string(), json!("Samsung"))]),
            correction_target: Some("modelo".into()),
        };
        let (ctx, plan) = plan_turn(ctx, Intent::new(ChatAction::Cancel));
        assert_eq!(ctx, ConversationContext::default());
        assert!(matches!(plan, TurnPlan::Reply(_)));
    }

    #[test]
    fn search_keeps_pending_collection() {
        let ctx = ConversationContext {
            pending_action: Some(ChatAction::CreateDevice),
            collected_fields: BTreeMap::from([("marca".to_string(), json!("Samsung"))]),
            correction_target: None,
        };
        let mut search = Intent::new(ChatAction::SearchDevice);
        search.filters.insert("nome_colaborador".into(), json!("Maria"));

        let (next, plan) = plan_turn(ctx.clone(), search);
        assert_eq!(next, ctx);
        match plan {
            TurnPlan::Execute { action, fields } => {
                assert_eq!(action, ChatAction::SearchDevice);
                assert_eq!(fields["nome_colaborador"], json!("Maria"));
            }
            other => panic!("esperava execução, veio {:?}", other),
        }
    }

    #[test]
    fn provide_data_without_pending_action_explains() {
        let (ctx, plan) = plan_turn(
            ConversationContext::default(),
            intent(ChatAction::ProvideData, json!({ "cpf": "123" })),
        );
        assert_eq!(ctx, ConversationContext::default());
        assert!(matches!(plan, TurnPlan::Reply(ref r) if r.contains("Não há nenhuma operação")));
    }

    #[test]
    fn decimal_accepts_comma_separator() {
        let fields = json!({ "valor": "1299,90" });
        let Value::Object(map) = fields else { unreachable!() };
        assert_eq!(decimal(&map, "valor").unwrap(), Some(Decimal::new(129990, 2)));
    }
}
