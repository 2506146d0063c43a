use serde::Deserialize;
use std::path::Path;

use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Logging configuration
    #[serde(default)]
    pub log: LogConfig,
    /// Database configuration
    #[serde(default)]
    pub database: DatabaseConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

// The menu owns stdout, so only problems are logged by default.
fn default_log_level() -> String {
    "warn".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database type (postgres or sqlite)
    #[serde(default = "default_db_type", rename = "type")]
    pub db_type: String,
    /// Full connection URL; takes precedence over the individual fields
    #[serde(default)]
    pub url: Option<String>,
    /// Database host
    #[serde(default = "default_db_host")]
    pub host: String,
    /// Database port
    #[serde(default = "default_db_port")]
    pub port: u16,
    /// Database name (file path for sqlite)
    #[serde(default = "default_db_name", rename = "database")]
    pub name: String,
    /// Database user
    #[serde(default = "default_db_user", rename = "username")]
    pub user: String,
    /// Database password
    #[serde(default)]
    pub password: String,
}

fn default_db_type() -> String {
    "postgres".to_string()
}

fn default_db_host() -> String {
    "localhost".to_string()
}

fn default_db_port() -> u16 {
    5432
}

fn default_db_name() -> String {
    "employee_tracker".to_string()
}

fn default_db_user() -> String {
    "postgres".to_string()
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            db_type: default_db_type(),
            url: None,
            host: default_db_host(),
            port: default_db_port(),
            name: default_db_name(),
            user: default_db_user(),
            password: String::new(),
        }
    }
}

impl DatabaseConfig {
    /// Generate database connection URL
    pub fn connection_url(&self) -> AppResult<String> {
        if let Some(url) = &self.url {
            return Ok(url.clone());
        }

        match self.db_type.as_str() {
            "postgres" => Ok(format!(
                "postgres://{}:{}@{}:{}/{}",
                self.user, self.password, self.host, self.port, self.name
            )),
            "sqlite" => Ok(format!("sqlite://{}?mode=rwc", self.name)),
            other => Err(AppError::Config(format!(
                "unsupported database type '{}'",
                other
            ))),
        }
    }

    /// Whether the configured backend is SQLite
    pub fn is_sqlite(&self) -> bool {
        match &self.url {
            Some(url) => url.starts_with("sqlite:"),
            None => self.db_type == "sqlite",
        }
    }

    /// Host/database pair safe to print (never includes the password)
    pub fn describe(&self) -> String {
        if self.is_sqlite() {
            return format!("sqlite:{}", self.name);
        }
        match &self.url {
            Some(url) => url
                .rsplit_once('@')
                .map(|(_, rest)| rest.to_string())
                .unwrap_or_else(|| url.clone()),
            None => format!("{}:{}/{}", self.host, self.port, self.name),
        }
    }
}

impl Config {
    /// Load configuration from TOML file
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }
}
