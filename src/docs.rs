// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use crate::handlers;
use crate::models;
use crate::services;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::login,
        handlers::auth::get_me,

        // --- Users ---
        handlers::users::create_user,
        handlers::users::list_users,
        handlers::users::update_user,

        // --- Devices ---
        handlers::devices::create_device,
        handlers::devices::list_devices,
        handlers::devices::get_device,
        handlers::devices::update_device,
        handlers::devices::delete_device,
        handlers::devices::get_current_state,
        handlers::devices::device_history,
        handlers::devices::device_maintenance_orders,
        handlers::devices::record_movement,
        handlers::devices::return_device,

        // --- Movements ---
        handlers::movements::search_movements,
        handlers::movements::get_movement,

        // --- Maintenance ---
        handlers::maintenance::list_open_orders,
        handlers::maintenance::open_order,
        handlers::maintenance::update_order,
        handlers::maintenance::close_order,

        // --- Employees ---
        handlers::employees::create_employee,
        handlers::employees::list_employees,
        handlers::employees::get_employee,
        handlers::employees::get_employee_by_code,
        handlers::employees::update_employee,
        handlers::employees::delete_employee,

        // --- Catalog ---
        handlers::catalog::create_sector,
        handlers::catalog::list_sectors,
        handlers::catalog::rename_sector,
        handlers::catalog::create_brand,
        handlers::catalog::list_brands,
        handlers::catalog::rename_brand,
        handlers::catalog::create_model,
        handlers::catalog::list_models,
        handlers::catalog::rename_model,

        // --- Gmail ---
        handlers::gmail::create_account,
        handlers::gmail::list_accounts,
        handlers::gmail::update_account,

        // --- Dashboard ---
        handlers::dashboard::get_summary,

        // --- Transfer ---
        handlers::transfer::import_rows,
        handlers::transfer::export_rows,

        // --- Backup ---
        handlers::backup::create_backup,
        handlers::backup::restore_backup,

        // --- Documents ---
        handlers::documents::handover_document,
        handlers::documents::handover_pdf,

        // --- Chat ---
        handlers::chat::handle_intent,
        handlers::chat::handle_message,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::UserRole,
            models::auth::User,
            models::auth::LoginUserPayload,
            models::auth::CreateUserPayload,
            models::auth::UpdateUserPayload,
            models::auth::AuthResponse,

            // --- Devices / Ledger ---
            models::device::DeviceStatus,
            models::device::Device,
            models::device::DeviceView,
            models::device::CreateDevicePayload,
            models::device::UpdateDevicePayload,
            models::ledger::MovementEntry,
            models::ledger::CurrentState,
            models::ledger::MovementHistoryRow,
            models::ledger::RecordMovementPayload,
            models::ledger::ReturnDestination,
            models::ledger::ReturnCondition,
            models::ledger::ReturnDevicePayload,
            services::ledger_service::MovementOutcome,

            // --- Maintenance ---
            models::maintenance::MaintenanceStatus,
            models::maintenance::MaintenanceOrder,
            models::maintenance::OpenMaintenanceOrderView,
            models::maintenance::OpenMaintenancePayload,
            models::maintenance::CloseMaintenancePayload,
            models::maintenance::UpdateMaintenancePayload,

            // --- Employees ---
            models::employee::Employee,
            models::employee::EmployeeView,
            models::employee::EmployeePayload,
            models::employee::EmployeeSort,

            // --- Catalog ---
            models::catalog::Sector,
            models::catalog::Brand,
            models::catalog::DeviceModel,
            models::catalog::CatalogNamePayload,
            models::catalog::CreateModelPayload,

            // --- Gmail ---
            models::gmail::GmailAccount,
            models::gmail::GmailAccountPayload,

            // --- Dashboard ---
            models::dashboard::DashboardSummary,
            models::dashboard::StatusCount,

            // --- Transfer ---
            models::import::ImportEntity,
            models::import::ExportEntity,
            models::import::EmployeeRow,
            models::import::DeviceRow,
            models::import::BrandRow,
            models::import::GmailAccountRow,
            models::import::MovementRow,
            models::import::DeviceExportRow,
            models::import::RowError,
            models::import::ImportReport,

            // --- Documents ---
            models::document::HandoverCondition,
            models::document::HandoverPayload,
            models::document::HandoverSource,
            models::document::HandoverDocument,

            // --- Chat ---
            models::chat::ChatAction,
            models::chat::Intent,
            models::chat::ConversationContext,
            models::chat::ChatTable,
            models::chat::ChatReply,
            models::chat::IntentRequest,
            models::chat::MessageRequest,
        )
    ),
    tags(
        (name = "Auth", description = "Autenticação"),
        (name = "Users", description = "Usuários do sistema (apenas administradores)"),
        (name = "Devices", description = "Aparelhos, estado atual e movimentações"),
        (name = "Movements", description = "Consulta ao histórico de movimentações"),
        (name = "Maintenance", description = "Ordens de serviço"),
        (name = "Employees", description = "Colaboradores"),
        (name = "Catalog", description = "Setores, marcas e modelos"),
        (name = "Gmail", description = "Contas Gmail corporativas"),
        (name = "Dashboard", description = "Indicadores do inventário"),
        (name = "Transfer", description = "Importação e exportação de planilhas"),
        (name = "Backup", description = "Backup e restauração do banco"),
        (name = "Documents", description = "Termo de responsabilidade"),
        (name = "Chat", description = "Assistente conversacional")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(
                Http::new(HttpAuthScheme::Bearer)
            ),
        );
    }
}
