//! Environment-driven configuration

use crate::error::ConfigError;
use std::env;
use std::str::FromStr;
use std::time::Duration;
use url::Url;

pub const DEFAULT_FRED_BASE_URL: &str = "https://fred.stlouisfed.org";
pub const DEFAULT_YAHOO_BASE_URL: &str = "https://query1.finance.yahoo.com";
pub const DEFAULT_TREASURY_BASE_URL: &str = "https://api.fiscaldata.treasury.gov";

/// Deployment environment (`ENVIRONMENT`), defaults to `sandbox`
pub fn get_environment() -> String {
    env::var("ENVIRONMENT").unwrap_or_else(|_| "sandbox".to_string())
}

/// Postgres connection string.
///
/// `DATABASE_URL` wins when set; otherwise it is assembled from `DB_HOST`,
/// `DB_PORT`, `DB_NAME`, `DB_USER` and `DB_PASS`.
pub fn get_database_url() -> String {
    if let Ok(url) = env::var("DATABASE_URL") {
        return url;
    }

    let host = env::var("DB_HOST").unwrap_or_else(|_| "localhost".to_string());
    let port = env::var("DB_PORT").unwrap_or_else(|_| "5432".to_string());
    let name = env::var("DB_NAME").unwrap_or_else(|_| "aurum_db".to_string());
    let user = env::var("DB_USER").unwrap_or_else(|_| "titan".to_string());
    let pass = env::var("DB_PASS").unwrap_or_else(|_| "titan_secure_password".to_string());

    format!("postgresql://{}:{}@{}:{}/{}", user, pass, host, port, name)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Postgres,
    Memory,
}

impl FromStr for StoreBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(StoreBackend::Postgres),
            "memory" => Ok(StoreBackend::Memory),
            other => Err(ConfigError::UnknownBackend(other.to_string())),
        }
    }
}

/// Provider endpoints and request timeout shared by all source adapters
#[derive(Debug, Clone)]
pub struct SourceConfig {
    pub fred_base_url: Url,
    pub yahoo_base_url: Url,
    pub treasury_base_url: Url,
    pub timeout: Duration,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            fred_base_url: Url::parse(DEFAULT_FRED_BASE_URL).expect("valid default URL"),
            yahoo_base_url: Url::parse(DEFAULT_YAHOO_BASE_URL).expect("valid default URL"),
            treasury_base_url: Url::parse(DEFAULT_TREASURY_BASE_URL).expect("valid default URL"),
            timeout: Duration::from_secs(10),
        }
    }
}

/// Schema initialisation retry policy
#[derive(Debug, Clone, Copy)]
pub struct SchemaRetry {
    /// Total attempts, including the first one
    pub attempts: usize,
    pub delay: Duration,
}

impl Default for SchemaRetry {
    fn default() -> Self {
        Self {
            attempts: 5,
            delay: Duration::from_secs(5),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub refresh_interval_seconds: u64,
    pub history_limit: usize,
    pub port: u16,
    pub store_backend: StoreBackend,
    pub database_url: String,
    /// Bound on each Postgres connection attempt
    pub db_connect_timeout: Duration,
    pub schema_retry: SchemaRetry,
    pub sources: SourceConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            refresh_interval_seconds: 60,
            history_limit: 1440,
            port: 8050,
            store_backend: StoreBackend::Postgres,
            database_url: get_database_url(),
            db_connect_timeout: Duration::from_secs(5),
            schema_retry: SchemaRetry::default(),
            sources: SourceConfig::default(),
        }
    }
}

impl Settings {
    /// Read settings from the process environment, falling back to defaults
    /// for unset variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Settings::default();

        let timeout_secs = parse_var("SOURCE_TIMEOUT_SECONDS", defaults.sources.timeout.as_secs())?;
        let delay_secs = parse_var(
            "SCHEMA_INIT_DELAY_SECONDS",
            defaults.schema_retry.delay.as_secs(),
        )?;

        Ok(Self {
            refresh_interval_seconds: parse_var(
                "REFRESH_INTERVAL_SECONDS",
                defaults.refresh_interval_seconds,
            )?,
            history_limit: parse_var("HISTORY_LIMIT", defaults.history_limit)?,
            port: parse_var("PORT", defaults.port)?,
            store_backend: match env::var("STORE_BACKEND") {
                Ok(v) => v.parse()?,
                Err(_) => defaults.store_backend,
            },
            database_url: defaults.database_url,
            db_connect_timeout: Duration::from_secs(parse_var(
                "DB_CONNECT_TIMEOUT_SECONDS",
                defaults.db_connect_timeout.as_secs(),
            )?
            .max(1)),
            schema_retry: SchemaRetry {
                attempts: parse_var("SCHEMA_INIT_ATTEMPTS", defaults.schema_retry.attempts)?.max(1),
                delay: Duration::from_secs(delay_secs),
            },
            sources: SourceConfig {
                fred_base_url: url_var("FRED_BASE_URL", defaults.sources.fred_base_url)?,
                yahoo_base_url: url_var("YAHOO_BASE_URL", defaults.sources.yahoo_base_url)?,
                treasury_base_url: url_var(
                    "TREASURY_BASE_URL",
                    defaults.sources.treasury_base_url,
                )?,
                timeout: Duration::from_secs(timeout_secs),
            },
        })
    }
}

fn parse_var<T: FromStr>(key: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(key) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidNumber { key, value }),
        Err(_) => Ok(default),
    }
}

fn url_var(key: &'static str, default: Url) -> Result<Url, ConfigError> {
    match env::var(key) {
        Ok(value) => Url::parse(value.trim())
            .map(with_trailing_slash)
            .map_err(|source| ConfigError::InvalidUrl { key, source }),
        Err(_) => Ok(default),
    }
}

/// Base URLs are joined with relative paths, which replaces the last segment
/// unless the path ends in `/`
pub fn with_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}
