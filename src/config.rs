// src/config.rs

use std::{env, path::PathBuf, sync::Arc, time::Duration};

use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::{
    common::i18n::I18nStore,
    db::{
        BackupRepository, CatalogRepository, DashboardRepository, DeviceRepository, EmployeeRepository,
        GmailRepository, LedgerRepository, MaintenanceRepository, UserRepository,
    },
    services::{
        auth::AuthService,
        backup_service::BackupService,
        catalog_service::CatalogService,
        chat_service::{ChatService, HttpIntentParser, IntentParser},
        dashboard_service::DashboardService,
        device_service::DeviceService,
        document_service::DocumentService,
        employee_service::EmployeeService,
        gmail_service::GmailService,
        import_service::ImportService,
        ledger_service::LedgerService,
        maintenance_service::MaintenanceService,
        user_service::UserService,
    },
};

/// Configuração lida do ambiente (.env).
#[derive(Debug, Clone)]
pub struct Settings {
    pub database_url: String,
    pub jwt_secret: String,
    pub bind_addr: String,
    pub db_max_connections: u32,
    pub nlu_api_url: Option<String>,
    pub nlu_api_key: Option<String>,
    pub nlu_timeout_secs: u64,
    pub admin_login: Option<String>,
    pub admin_password: Option<String>,
    pub fonts_dir: PathBuf,
}

fn optional(key: &str) -> Option<String> {
    env::var(key).ok().map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn parsed<T: std::str::FromStr>(key: &str, default: T) -> anyhow::Result<T>
where
    T::Err: std::fmt::Display,
{
    match optional(key) {
        Some(raw) => raw
            .parse::<T>()
            .map_err(|e| anyhow::anyhow!("{} inválido ('{}'): {}", key, raw, e)),
        None => Ok(default),
    }
}

impl Settings {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Self {
            database_url: env::var("DATABASE_URL").context("DATABASE_URL deve ser definida")?,
            jwt_secret: env::var("JWT_SECRET").context("JWT_SECRET deve ser definido")?,
            bind_addr: optional("BIND_ADDR").unwrap_or_else(|| "0.0.0.0:3000".to_string()),
            db_max_connections: parsed("DB_MAX_CONNECTIONS", 5)?,
            nlu_api_url: optional("NLU_API_URL"),
            nlu_api_key: optional("NLU_API_KEY"),
            nlu_timeout_secs: parsed("NLU_TIMEOUT_SECS", 30)?,
            admin_login: optional("ADMIN_LOGIN"),
            admin_password: optional("ADMIN_PASSWORD"),
            fonts_dir: optional("FONTS_DIR").map(PathBuf::from).unwrap_or_else(|| PathBuf::from("./fonts")),
        })
    }
}

// O estado compartilhado que será acessível em toda a aplicação
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub jwt_secret: String,
    pub i18n_store: I18nStore,

    pub auth_service: AuthService,
    pub user_service: UserService,
    pub ledger_service: LedgerService,
    pub maintenance_service: MaintenanceService,
    pub device_service: DeviceService,
    pub employee_service: EmployeeService,
    pub catalog_service: CatalogService,
    pub gmail_service: GmailService,
    pub dashboard_service: DashboardService,
    pub import_service: ImportService,
    pub backup_service: BackupService,
    pub document_service: DocumentService,
    pub chat_service: ChatService,
}

impl AppState {
    pub async fn new(settings: &Settings) -> anyhow::Result<Self> {
        let db_pool = PgPoolOptions::new()
            .max_connections(settings.db_max_connections)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&settings.database_url)
            .await
            .context("Falha ao conectar ao banco de dados")?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        let parser: Option<Arc<dyn IntentParser>> = match &settings.nlu_api_url {
            Some(url) => Some(Arc::new(
                HttpIntentParser::new(url.clone(), settings.nlu_api_key.clone(), settings.nlu_timeout_secs)
                    .map_err(|e| anyhow::anyhow!("{}", e))?,
            )),
            None => {
                tracing::warn!("NLU_API_URL não definida: o assistente só aceitará intenções estruturadas");
                None
            }
        };

        Ok(Self::from_parts(db_pool, settings.jwt_secret.clone(), settings.fonts_dir.clone(), parser))
    }

    /// Monta o gráfico de dependências sobre um pool já aberto.
    pub fn from_parts(
        db_pool: PgPool,
        jwt_secret: String,
        fonts_dir: PathBuf,
        parser: Option<Arc<dyn IntentParser>>,
    ) -> Self {
        let user_repo = UserRepository::new(db_pool.clone());
        let ledger_repo = LedgerRepository::new(db_pool.clone());
        let device_repo = DeviceRepository::new(db_pool.clone());
        let employee_repo = EmployeeRepository::new(db_pool.clone());
        let maintenance_repo = MaintenanceRepository::new(db_pool.clone());
        let catalog_repo = CatalogRepository::new(db_pool.clone());
        let gmail_repo = GmailRepository::new(db_pool.clone());

        let ledger_service = LedgerService::new(
            ledger_repo.clone(),
            device_repo.clone(),
            employee_repo.clone(),
            maintenance_repo.clone(),
        );
        let device_service = DeviceService::new(device_repo.clone(), ledger_repo.clone(), ledger_service.clone());
        let employee_service = EmployeeService::new(employee_repo.clone(), ledger_repo.clone());

        Self {
            auth_service: AuthService::new(user_repo.clone(), jwt_secret.clone()),
            user_service: UserService::new(user_repo, db_pool.clone()),
            maintenance_service: MaintenanceService::new(maintenance_repo, ledger_service.clone()),
            catalog_service: CatalogService::new(catalog_repo.clone(), db_pool.clone()),
            gmail_service: GmailService::new(gmail_repo.clone()),
            dashboard_service: DashboardService::new(DashboardRepository::new(db_pool.clone())),
            import_service: ImportService::new(
                db_pool.clone(),
                catalog_repo.clone(),
                employee_repo,
                device_repo.clone(),
                gmail_repo,
                ledger_service.clone(),
            ),
            backup_service: BackupService::new(BackupRepository::new(db_pool.clone())),
            document_service: DocumentService::new(ledger_repo, fonts_dir),
            chat_service: ChatService::new(
                db_pool.clone(),
                catalog_repo,
                device_repo,
                employee_service.clone(),
                device_service.clone(),
                ledger_service.clone(),
                parser,
            ),
            ledger_service,
            device_service,
            employee_service,
            i18n_store: I18nStore::new(),
            jwt_secret,
            db_pool,
        }
    }
}
