//! Configuration management for revassign
//!
//! Configuration is loaded with the following priority (highest to lowest):
//! 1. CLI flags
//! 2. Environment variables (REVASSIGN_*)
//! 3. Config file (~/.config/revassign/config.toml)
//! 4. Default values

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Database-related configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DatabaseSettings {
    /// Path to the SQLite database file
    pub path: PathBuf,

    /// Maximum number of pooled connections
    pub max_connections: u32,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            path: Config::default_database_path(),
            max_connections: 5,
        }
    }
}

/// Request handling configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServiceSettings {
    /// Deadline applied to every operation
    #[serde(with = "humantime_serde")]
    pub request_timeout: Duration,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(4),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LogSettings {
    /// `tracing_subscriber::EnvFilter` directive, `RUST_LOG` takes precedence
    pub filter: String,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
        }
    }
}

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub database: DatabaseSettings,
    pub service: ServiceSettings,
    pub log: LogSettings,
}

impl Config {
    /// Load configuration from the default config file location
    ///
    /// Returns default config if file doesn't exist
    pub fn load() -> Result<Self> {
        if let Some(path) = Self::default_config_path() {
            if path.exists() {
                return Self::load_from_file(&path);
            }
        }

        Ok(Self::default())
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        toml::from_str(&contents)
            .map_err(|e| Error::Config(format!("Failed to parse {}: {}", path.display(), e)))
    }

    /// Get the default config file path
    ///
    /// Returns `~/.config/revassign/config.toml` on Unix
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("revassign").join("config.toml"))
    }

    /// Default database location, `~/.local/share/revassign/revassign.db` on Unix
    pub fn default_database_path() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("revassign")
            .join("revassign.db")
    }

    /// Apply environment variable overrides
    ///
    /// Supported variables:
    /// - REVASSIGN_DATABASE_PATH: SQLite database file
    /// - REVASSIGN_REQUEST_TIMEOUT: humantime duration, e.g. `500ms`
    /// - REVASSIGN_LOG: log filter directive
    pub fn with_env_overrides(self) -> Result<Self> {
        self.with_overrides_from(|key| std::env::var(key).ok())
    }

    fn with_overrides_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        if let Some(path) = lookup("REVASSIGN_DATABASE_PATH") {
            self.database.path = PathBuf::from(path);
        }

        if let Some(timeout) = lookup("REVASSIGN_REQUEST_TIMEOUT") {
            self.service.request_timeout = parse_duration(&timeout)?;
        }

        if let Some(filter) = lookup("REVASSIGN_LOG") {
            self.log.filter = filter;
        }

        Ok(self)
    }

    /// Apply CLI flag overrides
    pub fn with_cli_overrides(
        mut self,
        database_path: Option<PathBuf>,
        request_timeout: Option<Duration>,
    ) -> Self {
        if let Some(path) = database_path {
            self.database.path = path;
        }

        if let Some(timeout) = request_timeout {
            self.service.request_timeout = timeout;
        }

        self
    }

    /// Load configuration with all overrides applied
    ///
    /// Priority: CLI > env > config file > defaults
    pub fn load_with_overrides(
        config_file: Option<&Path>,
        database_path: Option<PathBuf>,
        request_timeout: Option<Duration>,
    ) -> Result<Self> {
        let base = match config_file {
            Some(path) => Self::load_from_file(path)?,
            None => Self::load()?,
        };

        Ok(base
            .with_env_overrides()?
            .with_cli_overrides(database_path, request_timeout))
    }
}

/// Parse a humantime duration such as `4s` or `250ms`
pub fn parse_duration(value: &str) -> Result<Duration> {
    humantime_serde::re::humantime::parse_duration(value)
        .map_err(|e| Error::Config(format!("Invalid duration '{}': {}", value, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.service.request_timeout, Duration::from_secs(4));
        assert_eq!(config.database.max_connections, 5);
        assert_eq!(config.log.filter, "info");
        assert!(config.database.path.ends_with("revassign.db"));
    }

    #[test]
    fn test_parse_toml() {
        let toml = r#"
[database]
path = "/var/lib/revassign/prs.db"
max_connections = 8

[service]
request_timeout = "750ms"

[log]
filter = "revassign_core=debug"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.database.path, PathBuf::from("/var/lib/revassign/prs.db"));
        assert_eq!(config.database.max_connections, 8);
        assert_eq!(config.service.request_timeout, Duration::from_millis(750));
        assert_eq!(config.log.filter, "revassign_core=debug");
    }

    #[test]
    fn test_partial_toml() {
        let toml = r#"
[service]
request_timeout = "2s"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        // everything else should use defaults
        assert_eq!(config.service.request_timeout, Duration::from_secs(2));
        assert_eq!(config.database.max_connections, 5);
        assert_eq!(config.log.filter, "info");
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            ("REVASSIGN_DATABASE_PATH", "/tmp/env.db"),
            ("REVASSIGN_REQUEST_TIMEOUT", "1500ms"),
            ("REVASSIGN_LOG", "debug"),
        ]
        .into_iter()
        .collect();

        let config = Config::default()
            .with_overrides_from(|key| env.get(key).map(|v| v.to_string()))
            .unwrap();
        assert_eq!(config.database.path, PathBuf::from("/tmp/env.db"));
        assert_eq!(config.service.request_timeout, Duration::from_millis(1500));
        assert_eq!(config.log.filter, "debug");
    }

    #[test]
    fn test_invalid_env_timeout() {
        let result = Config::default().with_overrides_from(|key| {
            (key == "REVASSIGN_REQUEST_TIMEOUT").then(|| "soon".to_string())
        });
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_cli_overrides() {
        let config = Config::default()
            .with_cli_overrides(Some(PathBuf::from("/custom.db")), Some(Duration::from_secs(9)));

        assert_eq!(config.database.path, PathBuf::from("/custom.db"));
        assert_eq!(config.service.request_timeout, Duration::from_secs(9));
    }

    #[test]
    fn test_load_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[database]\nmax_connections = 2\n").unwrap();

        let config = Config::load_from_file(&path).unwrap();
        assert_eq!(config.database.max_connections, 2);
    }

    #[test]
    fn test_load_from_malformed_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[database\n").unwrap();

        assert!(matches!(Config::load_from_file(&path), Err(Error::Config(_))));
    }
}
