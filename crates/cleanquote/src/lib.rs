pub mod config;
pub mod error;
pub mod mail;
pub mod quotes;
pub mod telemetry;
