use serde::Deserialize;
use std::env;
use std::sync::OnceLock;
use thiserror::Error;

/// Default base URL for the Google Drive v3 REST API.
pub const DEFAULT_DRIVE_API_URL: &str = "https://www.googleapis.com/drive/v3";
/// Default base URL for the Google Docs v1 REST API.
pub const DEFAULT_DOCS_API_URL: &str = "https://docs.googleapis.com/v1";

const DEFAULT_FETCH_CONCURRENCY: usize = 4;
const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 30;

/// Errors encountered while loading configuration from environment variables.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Environment variable contained a value that could not be parsed.
    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(String),
}

/// Runtime configuration for the transcript gateway.
#[derive(Debug, Deserialize)]
pub struct Config {
    /// Inline service-account credential JSON (takes precedence over the key file).
    pub service_account_json: Option<String>,
    /// Path to the service-account key file (defaults to `service_account.json`).
    pub service_account_file: Option<String>,
    /// Optional override for the Drive API base URL.
    pub drive_api_url: Option<String>,
    /// Optional override for the Docs API base URL.
    pub docs_api_url: Option<String>,
    /// Optional override for the HTTP server port.
    pub server_port: Option<u16>,
    /// Optional cap on concurrent per-document content reads.
    pub fetch_concurrency: Option<usize>,
    /// Optional per-call timeout for outbound Google API requests, in seconds.
    pub upstream_timeout_secs: Option<u64>,
}

impl Config {
    /// Load configuration from environment variables, performing validation along the way.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            service_account_json: load_env_optional("SERVICE_ACCOUNT_JSON"),
            service_account_file: load_env_optional("SERVICE_ACCOUNT_FILE"),
            drive_api_url: load_env_optional("DRIVE_API_URL"),
            docs_api_url: load_env_optional("DOCS_API_URL"),
            server_port: load_env_optional("SERVER_PORT")
                .map(|value| {
                    value
                        .parse()
                        .map_err(|_| ConfigError::InvalidValue("SERVER_PORT".into()))
                })
                .transpose()?,
            fetch_concurrency: load_env_optional("FETCH_CONCURRENCY")
                .map(|value| {
                    value
                        .parse()
                        .map_err(|_| ConfigError::InvalidValue("FETCH_CONCURRENCY".into()))
                })
                .transpose()?,
            upstream_timeout_secs: load_env_optional("UPSTREAM_TIMEOUT_SECS")
                .map(|value| {
                    value
                        .parse()
                        .map_err(|_| ConfigError::InvalidValue("UPSTREAM_TIMEOUT_SECS".into()))
                })
                .transpose()?,
        })
    }

    /// Effective Drive API base URL.
    pub fn drive_api_url(&self) -> &str {
        self.drive_api_url.as_deref().unwrap_or(DEFAULT_DRIVE_API_URL)
    }

    /// Effective Docs API base URL.
    pub fn docs_api_url(&self) -> &str {
        self.docs_api_url.as_deref().unwrap_or(DEFAULT_DOCS_API_URL)
    }

    /// Effective cap on concurrent per-document reads; always at least one.
    pub fn fetch_concurrency(&self) -> usize {
        self.fetch_concurrency
            .unwrap_or(DEFAULT_FETCH_CONCURRENCY)
            .max(1)
    }

    /// Effective per-call timeout for outbound Google API requests.
    pub fn upstream_timeout_secs(&self) -> u64 {
        self.upstream_timeout_secs
            .unwrap_or(DEFAULT_UPSTREAM_TIMEOUT_SECS)
    }
}

fn load_env_optional(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

/// Global configuration cache populated during process start.
pub static CONFIG: OnceLock<Config> = OnceLock::new();

/// Retrieve the loaded configuration, panicking if initialization has not occurred.
pub fn get_config() -> &'static Config {
    CONFIG.get().expect("Config not initialized")
}

/// Load configuration from the environment and install it in the global cache.
pub fn init_config() {
    dotenvy::dotenv().ok();
    let config = Config::from_env().expect("Failed to load config from environment");
    tracing::debug!(
        drive_api_url = %config.drive_api_url(),
        docs_api_url = %config.docs_api_url(),
        server_port = ?config.server_port,
        fetch_concurrency = config.fetch_concurrency(),
        "Loaded configuration"
    );
    CONFIG.set(config).expect("Failed to set config");
}
