use serde::Deserialize;

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub storage: StorageConfig,
    pub cache: CacheConfig,
    pub navigation: NavigationConfig,
    pub reports: ReportsConfig,
    pub admin: AdminConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Backing store for taxonomy documents, file records and the mailbox
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// `memory`, `json` or `postgres`
    #[serde(rename = "type")]
    pub storage_type: String,
    /// Directory used by the `json` backend
    pub data_dir: String,
    pub database_url: Option<String>,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub taxonomy_ttl_secs: u64,
    pub taxonomy_max_entries: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NavigationConfig {
    pub session_idle_secs: u64,
    pub max_sessions: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ReportsConfig {
    pub max_per_window: usize,
    pub window_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AdminConfig {
    pub password: String,
    pub max_failed_logins: usize,
    pub lockout_secs: u64,
    /// Key lockouts on the first `X-Forwarded-For` address; only safe behind
    /// a proxy that overwrites the header
    pub trust_forwarded_for: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            storage_type: "memory".to_string(),
            data_dir: "data".to_string(),
            database_url: None,
            max_connections: 5,
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            taxonomy_ttl_secs: 300,
            taxonomy_max_entries: 100,
        }
    }
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            session_idle_secs: 3600,
            max_sessions: 10_000,
        }
    }
}

impl Default for ReportsConfig {
    fn default() -> Self {
        Self {
            max_per_window: 3,
            window_secs: 3600,
        }
    }
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            password: "admin".to_string(),
            max_failed_logins: 3,
            lockout_secs: 900,
            trust_forwarded_for: false,
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}
