//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::records::EntityKind;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub attendance_log: AttendanceLogConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// REST API configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds; unset means wait for the server indefinitely
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,

    #[serde(default)]
    pub endpoints: EndpointsConfig,
}

fn default_base_url() -> String {
    "http://localhost:5000".to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_secs: None,
            endpoints: EndpointsConfig::default(),
        }
    }
}

impl ApiConfig {
    /// Config pointing at a different server with default endpoints
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Collection URL for an entity, e.g. `http://host/patients`
    pub fn collection_url(&self, kind: EntityKind) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            self.endpoints.path(kind).trim_matches('/')
        )
    }
}

/// Path suffix of each resource collection under the base URL
#[derive(Debug, Clone, Deserialize)]
pub struct EndpointsConfig {
    #[serde(default = "default_patients_path")]
    pub patients: String,

    #[serde(default = "default_staff_path")]
    pub staff: String,

    #[serde(default = "default_financial_path")]
    pub financial: String,

    #[serde(default = "default_attendance_path")]
    pub attendance: String,

    #[serde(default = "default_transactions_path")]
    pub transactions: String,
}

fn default_patients_path() -> String {
    "patients".to_string()
}

fn default_staff_path() -> String {
    "staff".to_string()
}

fn default_financial_path() -> String {
    "financial".to_string()
}

fn default_attendance_path() -> String {
    "attendance".to_string()
}

fn default_transactions_path() -> String {
    "transactions".to_string()
}

impl Default for EndpointsConfig {
    fn default() -> Self {
        Self {
            patients: default_patients_path(),
            staff: default_staff_path(),
            financial: default_financial_path(),
            attendance: default_attendance_path(),
            transactions: default_transactions_path(),
        }
    }
}

impl EndpointsConfig {
    pub fn path(&self, kind: EntityKind) -> &str {
        match kind {
            EntityKind::Patients => &self.patients,
            EntityKind::Staff => &self.staff,
            EntityKind::Financial => &self.financial,
            EntityKind::Attendance => &self.attendance,
            EntityKind::Transactions => &self.transactions,
        }
    }
}

/// Local attendance scratch pad configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AttendanceLogConfig {
    #[serde(default = "default_attendance_log_path")]
    pub path: String,
}

fn default_attendance_log_path() -> String {
    dirs::data_local_dir()
        .map(|p| p.join("infirmary").join("attendance.json").to_string_lossy().to_string())
        .unwrap_or_else(|| "./infirmary_attendance.json".to_string())
}

impl Default for AttendanceLogConfig {
    fn default() -> Self {
        Self {
            path: default_attendance_log_path(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,

    pub file: Option<String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            file: None,
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Self::parse(&content).map_err(|error| ConfigError::Parse {
            path: path.to_path_buf(),
            error,
        })
    }

    /// Parse configuration from TOML text
    pub fn parse(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| e.to_string())
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from default locations or environment
    pub fn load_default() -> Self {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("infirmary").join("config.toml")),
            Some(PathBuf::from("/etc/infirmary/config.toml")),
            Some(PathBuf::from("./config.toml")),
        ];

        for path in config_paths.iter().flatten() {
            if path.exists() {
                match Self::load_with_env(path) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {:?}", path);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path, e);
                    }
                }
            }
        }

        tracing::info!("Using default config with environment overrides");
        Self::from_env()
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        // API overrides
        if let Some(url) = lookup("INFIRMARY_API_URL") {
            self.api.base_url = url;
        }
        if let Some(timeout) = lookup("INFIRMARY_API_TIMEOUT_SECS") {
            if let Ok(secs) = timeout.parse() {
                self.api.request_timeout_secs = Some(secs);
            }
        }

        // Attendance scratch pad
        if let Some(path) = lookup("INFIRMARY_ATTENDANCE_LOG") {
            self.attendance_log.path = path;
        }

        // Logging overrides
        if let Some(level) = lookup("INFIRMARY_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = lookup("INFIRMARY_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# Infirmary Configuration
#
# Environment variables override these settings:
# - INFIRMARY_API_URL
# - INFIRMARY_API_TIMEOUT_SECS
# - INFIRMARY_ATTENDANCE_LOG
# - INFIRMARY_LOG_LEVEL
# - INFIRMARY_LOG_FORMAT

[api]
# Hospital REST API base URL
base_url = "http://localhost:5000"

# Request timeout in seconds (omit to wait indefinitely)
# request_timeout_secs = 30

[api.endpoints]
# Collection paths under the base URL
patients = "patients"
staff = "staff"
financial = "financial"
attendance = "attendance"
transactions = "transactions"

[attendance_log]
# Local attendance scratch pad (not synced with the API)
# Defaults to <local data dir>/infirmary/attendance.json
# path = "/var/lib/infirmary/attendance.json"

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"

# Optional log file path
# file = "/var/log/infirmary/infirmary.log"
"#
    .to_string()
}
