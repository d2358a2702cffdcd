pub mod activity;
pub mod chat;
pub mod error;
pub mod log;
