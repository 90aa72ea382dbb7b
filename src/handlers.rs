pub mod auth;
pub mod backup;
pub mod catalog;
pub mod chat;
pub mod dashboard;
pub mod devices;
pub mod documents;
pub mod employees;
pub mod gmail;
pub mod maintenance;
pub mod movements;
pub mod transfer;
pub mod users;
