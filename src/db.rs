pub mod backup_repo;
pub mod catalog_repo;
pub mod dashboard_repo;
pub mod device_repo;
pub mod employee_repo;
pub mod gmail_repo;
pub mod ledger_repo;
pub mod maintenance_repo;
pub mod user_repo;

pub use backup_repo::{BackupRepository, ExclusiveRestore};
pub use catalog_repo::CatalogRepository;
pub use dashboard_repo::DashboardRepository;
pub use device_repo::DeviceRepository;
pub use employee_repo::EmployeeRepository;
pub use gmail_repo::GmailRepository;
pub use ledger_repo::LedgerRepository;
pub use maintenance_repo::MaintenanceRepository;
pub use user_repo::UserRepository;
