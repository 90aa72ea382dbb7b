pub mod auth;
pub mod catalog;
pub mod chat;
pub mod dashboard;
pub mod device;
pub mod document;
pub mod employee;
pub mod gmail;
pub mod import;
pub mod ledger;
pub mod maintenance;
