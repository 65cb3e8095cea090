pub mod config;
pub mod log;
pub mod monitor;
pub mod telemetry;
