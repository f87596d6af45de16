//! Application configuration management

pub mod app_config;
pub mod traccar;

pub use app_config::{AppConfig, StoreConfig};
pub use traccar::TraccarConfig;
