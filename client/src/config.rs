//! Configuration management for the Warehouse Retail Management client
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (config/development.toml, config/production.toml)
//! 3. Environment variable overrides with WRM_ prefix

use config::builder::DefaultState;
use config::{ConfigBuilder, ConfigError, Environment, File};
use secrecy::SecretString;
use serde::{Deserialize, Deserializer};

/// Main client configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Backend API configuration
    pub api: ApiConfig,

    /// Barcode scan configuration
    pub scan: ScanConfig,

    /// Logging configuration
    pub logging: LoggingConfig,

    /// Stored credentials for the CLI
    #[serde(default)]
    pub auth: Option<AuthConfig>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ApiConfig {
    /// Base URL of the backend, including the `/api` prefix
    pub base_url: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,

    /// User agent sent with every request
    pub user_agent: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ScanConfig {
    /// Response time a scan lookup should stay under, in milliseconds
    pub budget_ms: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset
    pub filter: String,

    /// Emit JSON lines instead of human-readable output
    pub json: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    pub username: String,

    #[serde(default, deserialize_with = "deserialize_secret")]
    pub password: Option<SecretString>,

    /// `NhanVienKho` or `ThuNgan`
    #[serde(default = "default_account_type")]
    pub account_type: String,
}

fn default_account_type() -> String {
    shared::TYPE_WAREHOUSE_STAFF.to_string()
}

fn deserialize_secret<'de, D>(deserializer: D) -> Result<Option<SecretString>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.map(SecretString::from))
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment = std::env::var("WRM_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let config = Self::defaults(&environment)?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (WRM_ prefix)
            .add_source(
                Environment::with_prefix("WRM")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Builder holding only the built-in defaults
    fn defaults(environment: &str) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        config::Config::builder()
            .set_default("environment", environment)?
            .set_default("api.base_url", "http://localhost:5000/api")?
            .set_default("api.timeout_secs", 30)?
            .set_default(
                "api.user_agent",
                concat!("wrm-client/", env!("CARGO_PKG_VERSION")),
            )?
            .set_default("scan.budget_ms", 1000)?
            .set_default(
                "logging.filter",
                "wrm_cli=info,warehouse_retail_client=info",
            )?
            .set_default("logging.json", false)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000/api".to_string(),
            timeout_secs: 30,
            user_agent: concat!("wrm-client/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self { budget_ms: 1000 }
    }
}
