pub mod accounts;
pub mod allocator;
pub mod auth;
pub mod config;
pub mod dashboard;
pub mod desk;
pub mod error;
pub mod export;
pub mod security_log;
pub mod session;
pub mod state;
