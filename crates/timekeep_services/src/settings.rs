//! Settings management

use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Environment variable that overrides the configured log level.
pub const LOG_ENV_VAR: &str = "TIMEKEEP_LOG";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("cannot access settings file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid settings file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("unknown report format '{0}', expected 'table' or 'json'")]
    UnknownFormat(String),
}

/// Report settings
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    pub report: ReportSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ReportSettings {
    /// Decimal places printed for times and ratios.
    pub precision: usize,
    pub format: ReportFormat,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingSettings {
    /// `tracing` level name: error, warn, info, debug or trace.
    pub level: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ReportFormat {
    Table,
    Json,
}

impl FromStr for ReportFormat {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "table" => Ok(ReportFormat::Table),
            "json" => Ok(ReportFormat::Json),
            _ => Err(SettingsError::UnknownFormat(s.to_string())),
        }
    }
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            precision: 4,
            format: ReportFormat::Table,
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl Settings {
    /// Read settings from a JSON file. Missing fields take their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = serde_json::from_str(&contents).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), "settings loaded");
        Ok(settings)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SettingsError> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        fs::write(path, json).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Log level from the environment if set, else from the settings.
    pub fn log_level(&self) -> String {
        resolve_level(std::env::var(LOG_ENV_VAR).ok(), &self.logging.level)
    }
}

fn resolve_level(from_env: Option<String>, configured: &str) -> String {
    from_env
        .map(|level| level.trim().to_string())
        .filter(|level| !level.is_empty())
        .unwrap_or_else(|| configured.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let settings = Settings::default();
        assert_eq!(settings.report.precision, 4);
        assert_eq!(settings.report.format, ReportFormat::Table);
        assert_eq!(settings.logging.level, "info");
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("timekeep.json");
        fs::write(&path, r#"{"report": {"format": "json"}}"#).unwrap();

        let settings = Settings::load(&path).unwrap();
        assert_eq!(settings.report.format, ReportFormat::Json);
        assert_eq!(settings.report.precision, 4);
        assert_eq!(settings.logging, LoggingSettings::default());
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("timekeep.json");
        let mut settings = Settings::default();
        settings.report.precision = 2;
        settings.logging.level = "debug".into();
        settings.save(&path).unwrap();

        assert_eq!(Settings::load(&path).unwrap(), settings);
    }

    #[test]
    fn invalid_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("timekeep.json");
        fs::write(&path, r#"{"report": {"precision": "high"}}"#).unwrap();

        assert!(matches!(Settings::load(&path), Err(SettingsError::Parse { .. })));
        assert!(matches!(
            Settings::load(dir.path().join("absent.json")),
            Err(SettingsError::Io { .. })
        ));
    }

    #[test]
    fn environment_overrides_configured_level() {
        assert_eq!(resolve_level(Some("trace".into()), "info"), "trace");
        assert_eq!(resolve_level(None, "warn"), "warn");
        assert_eq!(resolve_level(Some("  ".into()), "warn"), "warn");

        let mut settings = Settings::default();
        settings.logging.level = "error".into();
        if std::env::var_os(LOG_ENV_VAR).is_none() {
            assert_eq!(settings.log_level(), "error");
        }
    }

    #[test]
    fn format_parsing() {
        assert_eq!("JSON".parse::<ReportFormat>().unwrap(), ReportFormat::Json);
        assert_eq!("table".parse::<ReportFormat>().unwrap(), ReportFormat::Table);
        assert!("csv".parse::<ReportFormat>().is_err());
    }
}
