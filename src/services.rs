pub mod auth;
pub mod backup_service;
pub mod catalog_service;
pub mod chat_service;
pub mod dashboard_service;
pub mod device_service;
pub mod document_service;
pub mod employee_service;
pub mod gmail_service;
pub mod import_service;
pub mod ledger_service;
pub mod lifecycle;
pub mod maintenance_service;
pub mod user_service;
