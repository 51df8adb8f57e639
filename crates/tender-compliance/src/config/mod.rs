use crate::compliance::{
    ClassificationThresholds, ReportScope, DASHBOARD_WINDOW_DAYS, DETAIL_WINDOW_DAYS,
};
use chrono::NaiveDate;
use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};

/// Distinguishes runtime behavior for different stages of the service.
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

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub classification: ClassificationConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
        let ansi = read_flag("APP_LOG_ANSI", false)?;

        let classification = ClassificationConfig {
            dashboard_window_days: read_window("APP_DASHBOARD_WINDOW_DAYS", DASHBOARD_WINDOW_DAYS)?,
            detail_window_days: read_window("APP_DETAIL_WINDOW_DAYS", DETAIL_WINDOW_DAYS)?,
            missing_expiry_expired_when_required: read_flag(
                "APP_MISSING_EXPIRY_EXPIRED_WHEN_REQUIRED",
                false,
            )?,
        };

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level, ansi },
            classification,
        })
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Log filter and formatting.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
    pub ansi: bool,
}

/// Expiring-soon horizons per call site and the missing-expiry policy.
///
/// Dashboard and detail windows are separate settings and are never merged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassificationConfig {
    pub dashboard_window_days: i64,
    pub detail_window_days: i64,
    pub missing_expiry_expired_when_required: bool,
}

impl Default for ClassificationConfig {
    fn default() -> Self {
        Self {
            dashboard_window_days: DASHBOARD_WINDOW_DAYS,
            detail_window_days: DETAIL_WINDOW_DAYS,
            missing_expiry_expired_when_required: false,
        }
    }
}

impl ClassificationConfig {
    pub fn window_for(&self, scope: ReportScope) -> i64 {
        match scope {
            ReportScope::Dashboard => self.dashboard_window_days,
            ReportScope::Detail => self.detail_window_days,
        }
    }

    pub fn thresholds_for(
        &self,
        scope: ReportScope,
        reference_date: NaiveDate,
    ) -> ClassificationThresholds {
        ClassificationThresholds::new(reference_date, self.window_for(scope))
            .with_missing_expiry_expired_when_required(self.missing_expiry_expired_when_required)
    }
}

fn read_window(var: &'static str, default: i64) -> Result<i64, ConfigError> {
    let Ok(raw) = env::var(var) else {
        return Ok(default);
    };

    match raw.trim().parse::<i64>() {
        Ok(days) if days >= 0 => Ok(days),
        _ => Err(ConfigError::InvalidWindow { var, value: raw }),
    }
}

fn read_flag(var: &'static str, default: bool) -> Result<bool, ConfigError> {
    let Ok(raw) = env::var(var) else {
        return Ok(default);
    };

    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(ConfigError::InvalidFlag { var, value: raw }),
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidWindow { var: &'static str, value: String },
    InvalidFlag { var: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidWindow { var, value } => {
                write!(f, "{var} must be a non-negative number of days (found '{value}')")
            }
            ConfigError::InvalidFlag { var, value } => {
                write!(f, "{var} must be true or false (found '{value}')")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidWindow { .. }
            | ConfigError::InvalidFlag { .. } => None,
        }
    }
}
