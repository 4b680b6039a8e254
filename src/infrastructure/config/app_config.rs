//! Application configuration.

use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::Url;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::args::CliArgs;

const APP_NAME: &str = "cache-async-image";
const LOG_FILE_NAME: &str = "cache-async-image.log";

/// Configuration loading errors.
#[derive(Debug, Error)]
#[allow(missing_docs)]
pub enum ConfigError {
    #[error("io error reading {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("toml deserialization error: {0}")]
    TomlDe(#[from] toml::de::Error),
    #[error("invalid image URL {url:?}: {message}")]
    InvalidUrl { url: String, message: String },
}

/// Log level configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Trace level.
    Trace,
    /// Debug level.
    Debug,
    /// Info level.
    #[default]
    Info,
    /// Warning level.
    Warn,
    /// Error level.
    Error,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Trace => write!(f, "trace"),
            Self::Debug => write!(f, "debug"),
            Self::Info => write!(f, "info"),
            Self::Warn => write!(f, "warn"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Application configuration from file and CLI.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Configuration file path.
    #[serde(skip)]
    pub config: Option<PathBuf>,

    /// Image URL to display.
    #[serde(skip)]
    pub url: Option<String>,

    /// Directory holding cached image files.
    #[serde(default)]
    pub cache_dir: Option<PathBuf>,

    /// Log file path.
    #[serde(default)]
    pub log_path: Option<PathBuf>,

    /// Log verbosity level.
    #[serde(default)]
    pub log_level: LogLevel,

    /// Request timeout in seconds.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl AppConfig {
    /// Builds the configuration: the file named by `--config` (if any),
    /// overridden by the remaining CLI arguments.
    ///
    /// # Errors
    /// Returns error if the config file cannot be read or parsed.
    pub fn load(args: CliArgs) -> Result<Self, ConfigError> {
        let mut config = match args.config.as_deref() {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.merge_with_args(args);
        Ok(config)
    }

    /// Reads a TOML configuration file.
    ///
    /// # Errors
    /// Returns error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(toml::from_str(&content)?)
    }

    /// Merges CLI arguments into the configuration.
    pub fn merge_with_args(&mut self, args: CliArgs) {
        if let Some(config_path) = args.config {
            self.config = Some(config_path);
        }
        if let Some(url) = args.url {
            self.url = Some(url);
        }
        if let Some(cache_dir) = args.cache_dir {
            self.cache_dir = Some(cache_dir);
        }
        if let Some(log_path) = args.log_path {
            self.log_path = Some(log_path);
        }
        if let Some(log_level) = args.log_level {
            self.log_level = log_level;
        }
        if let Some(timeout) = args.timeout {
            self.timeout_secs = Some(timeout);
        }
    }

    /// Returns the default cache directory under the system temp dir.
    #[must_use]
    pub fn default_cache_dir() -> PathBuf {
        std::env::temp_dir().join(APP_NAME)
    }

    /// Returns default log file path.
    #[must_use]
    pub fn default_log_path() -> PathBuf {
        std::env::temp_dir().join(LOG_FILE_NAME)
    }

    /// Returns effective cache directory.
    #[must_use]
    pub fn effective_cache_dir(&self) -> PathBuf {
        self.cache_dir.clone().unwrap_or_else(Self::default_cache_dir)
    }

    /// Returns effective log path.
    #[must_use]
    pub fn effective_log_path(&self) -> PathBuf {
        self.log_path.clone().unwrap_or_else(Self::default_log_path)
    }

    /// Returns the request timeout, if one is configured.
    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    /// Parses the configured URL.
    ///
    /// # Errors
    /// Returns error if a URL is set but is not a valid absolute URL.
    pub fn image_url(&self) -> Result<Option<Url>, ConfigError> {
        self.url
            .as_deref()
            .map(|raw| {
                Url::parse(raw).map_err(|e| ConfigError::InvalidUrl {
                    url: raw.to_string(),
                    message: e.to_string(),
                })
            })
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_config_file() {
        let toml_content = r#"
            cache_dir = "/var/tmp/images"
            log_level = "debug"
            timeout_secs = 15
        "#;

        let config: AppConfig = toml::from_str(toml_content).expect("Failed to parse config");

        assert_eq!(config.cache_dir, Some(PathBuf::from("/var/tmp/images")));
        assert_eq!(config.log_level, LogLevel::Debug);
        assert_eq!(config.timeout(), Some(Duration::from_secs(15)));
        assert!(config.url.is_none());
    }

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();

        assert_eq!(config.log_level, LogLevel::Info);
        assert_eq!(config.timeout(), None);
        assert_eq!(config.effective_cache_dir(), AppConfig::default_cache_dir());
        assert!(config.effective_cache_dir().starts_with(std::env::temp_dir()));
    }

    #[test]
    fn test_args_override_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "cache_dir = \"/from/file\"\nlog_level = \"warn\"").unwrap();

        let args = CliArgs {
            config: Some(file.path().to_path_buf()),
            cache_dir: Some(PathBuf::from("/from/cli")),
            url: Some("https://example.com/a.png".to_string()),
            ..CliArgs::default()
        };
        let config = AppConfig::load(args).unwrap();

        assert_eq!(config.effective_cache_dir(), PathBuf::from("/from/cli"));
        assert_eq!(config.log_level, LogLevel::Warn);
        assert_eq!(
            config.image_url().unwrap().map(|u| u.path().to_string()),
            Some("/a.png".to_string())
        );
    }

    #[test]
    fn test_missing_config_file_is_an_error() {
        let args = CliArgs {
            config: Some(PathBuf::from("/definitely/not/here.toml")),
            ..CliArgs::default()
        };
        assert!(matches!(AppConfig::load(args), Err(ConfigError::Io { .. })));
    }

    #[test]
    fn test_invalid_url_is_reported() {
        let config = AppConfig {
            url: Some("not a url".to_string()),
            ..AppConfig::default()
        };
        assert!(matches!(
            config.image_url(),
            Err(ConfigError::InvalidUrl { .. })
        ));
    }

    #[test]
    fn test_absent_url_is_none() {
        assert!(AppConfig::default().image_url().unwrap().is_none());
    }
}
