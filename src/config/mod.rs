//! Application configuration

mod app_config;

pub use app_config::{
    AdminConfig, AppConfig, CacheConfig, LogFormat, LoggingConfig, NavigationConfig,
    ReportsConfig, ServerConfig, StorageConfig,
};
