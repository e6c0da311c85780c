//! TOML configuration
//!
//! Every section is optional; omitted keys fall back to the defaults below.
//! A missing config file is not an error and yields `AppConfig::default()`.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{FeeSchedule, DEFAULT_CODE_PREFIX};
use crate::infrastructure::DatabaseConfig;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

impl ConfigError {
    fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            reason: reason.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseSettings,
    pub logging: LoggingConfig,
    pub parking: ParkingConfig,
    pub fees: FeeConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Seconds to wait for in-flight requests on shutdown
    pub shutdown_timeout: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5001,
            shutdown_timeout: 30,
        }
    }
}

impl ServerConfig {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: u32,
    pub connect_timeout_secs: u64,
    pub sqlx_logging: bool,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        let defaults = DatabaseConfig::default();
        Self {
            url: defaults.url,
            max_connections: defaults.max_connections,
            connect_timeout_secs: defaults.connect_timeout_secs,
            sqlx_logging: defaults.sqlx_logging,
        }
    }
}

impl From<&DatabaseSettings> for DatabaseConfig {
    fn from(s: &DatabaseSettings) -> Self {
        Self {
            url: s.url.clone(),
            max_connections: s.max_connections,
            connect_timeout_secs: s.connect_timeout_secs,
            sqlx_logging: s.sqlx_logging,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `RUST_LOG` takes precedence when set
    pub level: String,
    /// `pretty` or `json`
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParkingConfig {
    /// Pool size used when the slot table is first seeded
    pub slot_count: u32,
    pub slot_prefix: String,
    /// Leading tag of scannable codes
    pub code_prefix: String,
    pub issued_code_length: usize,
}

impl Default for ParkingConfig {
    fn default() -> Self {
        Self {
            slot_count: 50,
            slot_prefix: "SLOT".to_string(),
            code_prefix: DEFAULT_CODE_PREFIX.to_string(),
            issued_code_length: 16,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeeConfig {
    pub base_rate: f64,
    pub block_rate: f64,
    pub grace_minutes: i64,
    pub block_minutes: i64,
}

impl Default for FeeConfig {
    fn default() -> Self {
        let schedule = FeeSchedule::default();
        Self {
            base_rate: schedule.base_rate,
            block_rate: schedule.block_rate,
            grace_minutes: schedule.grace_minutes,
            block_minutes: schedule.block_minutes,
        }
    }
}

impl AppConfig {
    /// Load and validate a config file. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::info!("No config file at {}, using defaults", path.display());
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        let config: Self = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.parking.slot_count == 0 {
            return Err(ConfigError::invalid("parking.slot_count", "must be at least 1"));
        }
        if self.parking.code_prefix.is_empty() || self.parking.code_prefix.contains(':') {
            return Err(ConfigError::invalid(
                "parking.code_prefix",
                "must be non-empty and must not contain ':'",
            ));
        }
        if !(8..=64).contains(&self.parking.issued_code_length) {
            return Err(ConfigError::invalid(
                "parking.issued_code_length",
                format!("{} is outside 8..=64", self.parking.issued_code_length),
            ));
        }
        if self.fees.base_rate < 0.0 || self.fees.block_rate < 0.0 {
            return Err(ConfigError::invalid("fees", "rates must not be negative"));
        }
        if self.fees.grace_minutes < 0 {
            return Err(ConfigError::invalid("fees.grace_minutes", "must not be negative"));
        }
        if self.fees.block_minutes <= 0 {
            return Err(ConfigError::invalid("fees.block_minutes", "must be at least 1"));
        }
        Ok(())
    }

    pub fn fee_schedule(&self) -> FeeSchedule {
        FeeSchedule {
            base_rate: self.fees.base_rate,
            block_rate: self.fees.block_rate,
            grace_minutes: self.fees.grace_minutes,
            block_minutes: self.fees.block_minutes,
        }
    }

    pub fn database_config(&self) -> DatabaseConfig {
        DatabaseConfig::from(&self.database)
    }
}

/// `<config_dir>/parking-service/config.toml`, or `./config.toml` when the
/// platform has no config directory.
pub fn default_config_path() -> PathBuf {
    match dirs_next::config_dir() {
        Some(dir) => dir.join("parking-service").join("config.toml"),
        None => PathBuf::from("config.toml"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn defaults_match_documented_values() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.server.address(), "0.0.0.0:5001");
        assert_eq!(cfg.parking.slot_count, 50);
        assert_eq!(cfg.parking.code_prefix, "PARKING");
        assert_eq!(cfg.fee_schedule(), FeeSchedule::default());
        assert_eq!(cfg.database.url, "sqlite://./parking.db?mode=rwc");
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = AppConfig::load(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(cfg, AppConfig::default());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let file = write_config(
            r#"
            [server]
            port = 8080

            [parking]
            slot_count = 12

            [fees]
            block_rate = 15.0
            "#,
        );
        let cfg = AppConfig::load(file.path()).unwrap();
        assert_eq!(cfg.server.port, 8080);
        assert_eq!(cfg.server.host, "0.0.0.0");
        assert_eq!(cfg.parking.slot_count, 12);
        assert_eq!(cfg.parking.slot_prefix, "SLOT");
        assert_eq!(cfg.fees.block_rate, 15.0);
        assert_eq!(cfg.fees.base_rate, 20.0);
        assert_eq!(cfg.logging.format, "pretty");
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let file = write_config("[server\nport = ");
        assert!(matches!(
            AppConfig::load(file.path()),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn invalid_values_are_rejected() {
        let file = write_config("[parking]\nslot_count = 0\n");
        assert!(matches!(
            AppConfig::load(file.path()),
            Err(ConfigError::Invalid { field: "parking.slot_count", .. })
        ));

        let mut cfg = AppConfig::default();
        cfg.fees.block_minutes = 0;
        assert!(cfg.validate().is_err());

        let mut cfg = AppConfig::default();
        cfg.fees.base_rate = -1.0;
        assert!(cfg.validate().is_err());

        let mut cfg = AppConfig::default();
        cfg.parking.issued_code_length = 65;
        assert!(cfg.validate().is_err());

        let mut cfg = AppConfig::default();
        cfg.parking.code_prefix = "A:B".into();
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn default_path_is_a_toml_file() {
        let path = default_config_path();
        assert_eq!(path.file_name().unwrap(), "config.toml");
    }
}
