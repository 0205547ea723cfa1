pub mod admin;
pub mod booking;
pub mod booking_window;
pub mod error;
pub mod ledger;
pub mod notice;
pub mod opening_hours;
pub mod roles;
pub mod security_event;
pub mod session;
pub mod slots;
pub mod statistics;
pub mod student;
pub mod types;
