//! Optional TOML configuration file.
//!
//! ```toml
//! [database]
//! backend = "sqlite"
//! connection_string = "taxai.db"
//!
//! [logging]
//! level = "info"
//! file = "taxai.log"
//! ```
//!
//! Missing sections and keys fall back to the defaults. Command-line flags
//! are applied on top with [`AppConfig::apply`].

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tax_core::db::DbConfig;
use thiserror::Error;

pub const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file '{path}': {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config file: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub database: DbConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_string(),
            file: None,
        }
    }
}

/// Values given on the command line. `None` keeps the configured value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub backend: Option<String>,
    pub connection_string: Option<String>,
    pub log_level: Option<String>,
    pub log_file: Option<PathBuf>,
}

impl AppConfig {
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&text)
    }

    /// Reads `path` when given, otherwise starts from the defaults.
    pub fn load_optional(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    pub fn apply(
        &mut self,
        overrides: ConfigOverrides,
    ) {
        if let Some(backend) = overrides.backend {
            self.database.backend = backend;
        }
        if let Some(connection_string) = overrides.connection_string {
            self.database.connection_string = connection_string;
        }
        if let Some(level) = overrides.log_level {
            self.logging.level = level;
        }
        if let Some(file) = overrides.log_file {
            self.logging.file = Some(file);
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn defaults_use_sqlite_file_and_info() {
        let config = AppConfig::default();

        assert_eq!(config.database.backend, "sqlite");
        assert_eq!(config.database.connection_string, "taxai.db");
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.file, None);
    }

    #[test]
    fn full_file_is_read() {
        let config = AppConfig::from_toml(
            r#"
            [database]
            backend = "memory"
            connection_string = "ignored"

            [logging]
            level = "debug"
            file = "/tmp/taxai.log"
            "#,
        )
        .unwrap();

        assert_eq!(config.database.backend, "memory");
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.file, Some(PathBuf::from("/tmp/taxai.log")));
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let config = AppConfig::from_toml("[logging]\nlevel = \"warn\"\n").unwrap();

        assert_eq!(config.database, DbConfig::default());
        assert_eq!(config.logging.level, "warn");
    }

    #[test]
    fn empty_file_is_default() {
        assert_eq!(AppConfig::from_toml("").unwrap(), AppConfig::default());
    }

    #[test]
    fn malformed_file_is_rejected() {
        let result = AppConfig::from_toml("[database\nbackend = 1");

        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = AppConfig::load(Path::new("/nonexistent/taxai.toml")).unwrap_err();

        assert!(err.to_string().starts_with("cannot read config file '/nonexistent/taxai.toml'"));
    }

    #[test]
    fn overrides_win_over_file() {
        let mut config = AppConfig::from_toml("[database]\nbackend = \"memory\"\n").unwrap();

        config.apply(ConfigOverrides {
            backend: Some("sqlite".to_string()),
            connection_string: Some("other.db".to_string()),
            log_level: None,
            log_file: Some(PathBuf::from("run.log")),
        });

        assert_eq!(config.database.backend, "sqlite");
        assert_eq!(config.database.connection_string, "other.db");
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.file, Some(PathBuf::from("run.log")));
    }

    #[test]
    fn no_overrides_keep_file_values() {
        let mut config = AppConfig::from_toml("[logging]\nlevel = \"trace\"\n").unwrap();

        config.apply(ConfigOverrides::default());

        assert_eq!(config.logging.level, "trace");
    }
}
