//! Layered configuration
//!
//! Sources, lowest priority first:
//! 1. Built-in defaults
//! 2. A TOML file: the explicit path, else `CAULDRON_CONFIG_PATH`, else
//!    `cauldron.toml` in the working directory if it exists
//! 3. Environment variables `CAULDRON_<SECTION>__<KEY>`, e.g.
//!    `CAULDRON_EDITOR__IDLE_INTERVAL_MS=250` or `CAULDRON_SCRIPT__IMPORTS=math,text`

use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

use ::config::{Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::coordinator::CoordinatorConfig;

/// Environment variable naming the config file
pub const CONFIG_PATH_ENV: &str = "CAULDRON_CONFIG_PATH";

/// File looked up in the working directory when no path is given
pub const DEFAULT_CONFIG_FILE: &str = "cauldron.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Failed to load configuration: {0}")]
    Load(#[from] ::config::ConfigError),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Failed to serialize configuration: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/* ===================== Sections ===================== */

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Quiet time after the last keystroke before a build
    pub idle_interval_ms: u64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            idle_interval_ms: 1000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScriptConfig {
    /// Stdlib modules imported by every build and run
    pub imports: Vec<String>,
}

impl Default for ScriptConfig {
    fn default() -> Self {
        Self {
            imports: vec!["math".to_string(), "text".to_string(), "list".to_string()],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Finished sessions kept by the coordinator
    pub session_history: usize,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            session_history: 16,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `tracing_subscriber::EnvFilter` directive; `RUST_LOG` wins when set
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
        }
    }
}

/* ===================== Config ===================== */

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub editor: EditorConfig,
    pub script: ScriptConfig,
    pub output: OutputConfig,
    pub logging: LoggingConfig,
}

impl Config {
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Load from the default sources
    pub fn load() -> Result<Self, ConfigError> {
        Self::builder().build()
    }

    pub fn idle_interval(&self) -> Duration {
        Duration::from_millis(self.editor.idle_interval_ms)
    }

    pub fn coordinator(&self) -> CoordinatorConfig {
        CoordinatorConfig {
            idle_interval: self.idle_interval(),
            imports: self.script.imports.clone(),
            session_history: self.output.session_history,
        }
    }

    /// Effective configuration as TOML
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.editor.idle_interval_ms == 0 {
            return Err(ConfigError::Invalid(
                "editor.idle_interval_ms must be greater than 0".to_string(),
            ));
        }
        if self.output.session_history == 0 {
            return Err(ConfigError::Invalid(
                "output.session_history must be greater than 0".to_string(),
            ));
        }
        if self.script.imports.iter().any(|i| i.trim().is_empty()) {
            return Err(ConfigError::Invalid(
                "script.imports must not contain empty names".to_string(),
            ));
        }
        Ok(())
    }
}

/// Builder for [`Config`] with explicit overrides
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    config_path: Option<PathBuf>,
    skip_env: bool,
}

impl ConfigBuilder {
    /// Use this file instead of the default search
    pub fn config_path(mut self, path: Option<PathBuf>) -> Self {
        self.config_path = path;
        self
    }

    /// Ignore `CAULDRON_*` environment variables
    pub fn without_env(mut self) -> Self {
        self.skip_env = true;
        self
    }

    fn resolve_path(&self) -> Option<(PathBuf, bool)> {
        if let Some(path) = &self.config_path {
            return Some((path.clone(), true));
        }
        if !self.skip_env {
            if let Ok(path) = env::var(CONFIG_PATH_ENV) {
                return Some((PathBuf::from(path), true));
            }
        }
        let default = Path::new(DEFAULT_CONFIG_FILE);
        default.exists().then(|| (default.to_path_buf(), false))
    }

    pub fn build(self) -> Result<Config, ConfigError> {
        let mut layers = ::config::Config::builder();

        if let Some((path, explicit)) = self.resolve_path() {
            if explicit && !path.exists() {
                return Err(ConfigError::NotFound(path));
            }
            tracing::debug!(path = %path.display(), "loading config file");
            layers = layers.add_source(File::from(path).format(FileFormat::Toml));
        }

        if !self.skip_env {
            layers = layers.add_source(
                Environment::with_prefix("CAULDRON")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("script.imports"),
            );
        }

        let config: Config = layers.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(contents: &str) -> PathBuf {
        let path = env::temp_dir().join(format!("cauldron-{}.toml", uuid::Uuid::new_v4()));
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.editor.idle_interval_ms, 1000);
        assert_eq!(config.script.imports, vec!["math", "text", "list"]);
        assert_eq!(config.output.session_history, 16);
        assert_eq!(config.logging.filter, "info");
        assert_eq!(config.coordinator(), CoordinatorConfig::default());
    }

    #[test]
    fn test_file_overrides_defaults() {
        let path = write_config(
            r#"
[editor]
idle_interval_ms = 250

[script]
imports = ["time"]
"#,
        );

        let config = Config::builder()
            .config_path(Some(path.clone()))
            .without_env()
            .build()
            .unwrap();
        std::fs::remove_file(path).ok();

        assert_eq!(config.idle_interval(), Duration::from_millis(250));
        assert_eq!(config.script.imports, vec!["time"]);
        // Untouched sections keep their defaults
        assert_eq!(config.output.session_history, 16);
    }

    #[test]
    fn test_missing_explicit_file() {
        let err = Config::builder()
            .config_path(Some(PathBuf::from("/nonexistent/cauldron.toml")))
            .without_env()
            .build()
            .unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let path = write_config("[output]\nsession_history = 0\n");
        let err = Config::builder()
            .config_path(Some(path.clone()))
            .without_env()
            .build()
            .unwrap_err();
        std::fs::remove_file(path).ok();

        assert!(matches!(err, ConfigError::Invalid(_)));
        assert!(err.to_string().contains("session_history"));
    }

    #[test]
    fn test_to_toml_round_trip() {
        let config = Config::default();
        let text = config.to_toml().unwrap();
        assert!(text.contains("idle_interval_ms = 1000"));

        let parsed: Config = toml::from_str(&text).unwrap();
        assert_eq!(parsed, config);
    }
}
