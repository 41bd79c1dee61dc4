pub mod config;
pub mod gateway;
pub mod service;
pub mod telemetry;
pub mod users;
