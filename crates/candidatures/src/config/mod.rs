use std::env;
use std::fmt;
use std::time::Duration;

use url::Url;

const DEFAULT_API_BASE_URL: &str = "http://localhost:3000";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Distinguishes runtime behavior for different stages of the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the client.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub api: ApiConfig,
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let base_url = env::var("APP_API_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_API_BASE_URL.to_string());
        let timeout_secs = env::var("APP_API_TIMEOUT_SECS")
            .unwrap_or_else(|_| DEFAULT_TIMEOUT_SECS.to_string())
            .trim()
            .parse::<u64>()
            .ok()
            .filter(|secs| *secs > 0)
            .ok_or(ConfigError::InvalidTimeout)?;

        let mut telemetry = TelemetryConfig::for_environment(environment);
        if let Ok(log_level) = env::var("APP_LOG_LEVEL") {
            telemetry.log_level = log_level;
        }

        Ok(Self {
            environment,
            api: ApiConfig::new(base_url, Duration::from_secs(timeout_secs))?,
            telemetry,
        })
    }
}

/// Settings for reaching the remote candidature API.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl ApiConfig {
    /// Validates that `base_url` is an absolute URL. A trailing slash is dropped so
    /// endpoints such as `/candidatures` concatenate cleanly.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ConfigError> {
        let raw = base_url.into();
        let trimmed = raw.trim().trim_end_matches('/').to_string();

        Url::parse(&trimmed).map_err(|source| ConfigError::InvalidBaseUrl {
            value: raw.clone(),
            source,
        })?;

        Ok(Self {
            base_url: trimmed,
            timeout,
        })
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    pub log_level: String,
    pub ansi: bool,
}

impl TelemetryConfig {
    /// Verbose colored output while developing, warnings only under test.
    pub fn for_environment(environment: AppEnvironment) -> Self {
        let log_level = match environment {
            AppEnvironment::Development => "candidatures=debug,info",
            AppEnvironment::Test => "warn",
            AppEnvironment::Production => "info",
        };
        Self {
            log_level: log_level.to_string(),
            ansi: environment == AppEnvironment::Development,
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidTimeout,
    InvalidBaseUrl {
        value: String,
        source: url::ParseError,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidTimeout => {
                write!(f, "APP_API_TIMEOUT_SECS must be a positive number of seconds")
            }
            ConfigError::InvalidBaseUrl { value, .. } => {
                write!(f, "APP_API_BASE_URL '{value}' is not an absolute URL")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidTimeout => None,
            ConfigError::InvalidBaseUrl { source, .. } => Some(source),
        }
    }
}
