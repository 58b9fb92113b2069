//! Configuration management for Stackpost.
//!
//! Parses `stackpost.toml` with serde and provides auto-discovery of the
//! config file in parent directories. CLI settings can be applied during
//! load via [`CliSettings`].
//!
//! ```toml
//! [store]
//! backend = "file"          # or "memory"
//! data_dir = "${STACKPOST_DATA:-.stackpost}"
//!
//! [editor]
//! strict = false
//! ```
//!
//! ## Environment Variable Expansion
//!
//! `store.data_dir` supports `${VAR}` (errors if unset) and
//! `${VAR:-default}`. Expansion happens before the path is resolved
//! against the config file's directory.

mod expand;

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "stackpost.toml";

/// Default data directory, relative to the config directory.
const DEFAULT_DATA_DIR: &str = ".stackpost";

/// CLI settings that override configuration file values.
///
/// Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override store backend.
    pub backend: Option<Backend>,
    /// Override data directory of the file backend.
    pub data_dir: Option<PathBuf>,
    /// Override strict element lookups.
    pub strict: Option<bool>,
}

/// Storage backend selection.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// One file per record under `data_dir`.
    #[default]
    File,
    /// Process-local map; nothing survives the process.
    Memory,
}

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Store section as parsed from TOML.
    store: StoreConfigRaw,
    /// Editor behaviour.
    pub editor: EditorConfig,

    /// Resolved store configuration (set after loading).
    #[serde(skip)]
    pub store_resolved: StoreConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Raw store configuration (path as string).
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct StoreConfigRaw {
    backend: Option<Backend>,
    data_dir: Option<String>,
}

/// Resolved store configuration with an absolute data directory.
#[derive(Debug, Default)]
pub struct StoreConfig {
    pub backend: Backend,
    pub data_dir: PathBuf,
}

/// Editor configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Report missing element ids as errors instead of no-ops.
    pub strict: bool,
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`store.data_dir`").
        field: String,
        /// Error message (e.g., "${`STACKPOST_DATA`} not set").
        message: String,
    },
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file. Otherwise,
    /// searches for `stackpost.toml` in the current directory and parents,
    /// falling back to defaults rooted at the current directory.
    ///
    /// CLI settings are applied last and take precedence.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist or parsing fails.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let cwd = std::env::current_dir()?;
        Self::load_from(&cwd, config_path, cli_settings)
    }

    /// [`load`](Self::load) with discovery starting at `start_dir`.
    pub fn load_from(
        start_dir: &Path,
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config(start_dir) {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_base(start_dir)
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(backend) = settings.backend {
            self.store_resolved.backend = backend;
        }
        if let Some(data_dir) = &settings.data_dir {
            self.store_resolved.data_dir.clone_from(data_dir);
        }
        if let Some(strict) = settings.strict {
            self.editor.strict = strict;
        }
    }

    /// Search for the config file in `start` and its parents.
    fn discover_config(start: &Path) -> Option<PathBuf> {
        start
            .ancestors()
            .map(|dir| dir.join(CONFIG_FILENAME))
            .find(|candidate| candidate.is_file())
    }

    /// Create default config with the data directory under `base`.
    fn default_with_base(base: &Path) -> Self {
        Self {
            store: StoreConfigRaw::default(),
            editor: EditorConfig::default(),
            store_resolved: StoreConfig {
                backend: Backend::default(),
                data_dir: base.join(DEFAULT_DATA_DIR),
            },
            config_path: None,
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(data_dir) = &self.store.data_dir
            && data_dir.trim().is_empty()
        {
            return Err(ConfigError::Validation(
                "store.data_dir cannot be empty".to_owned(),
            ));
        }
        if self.store_resolved.backend == Backend::Memory && self.store.data_dir.is_some() {
            return Err(ConfigError::Validation(
                "store.data_dir is only valid with the file backend".to_owned(),
            ));
        }
        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        if let Some(ref data_dir) = self.store.data_dir {
            self.store.data_dir = Some(expand::expand_env(data_dir, "store.data_dir")?);
        }
        Ok(())
    }

    /// Resolve the data directory against the config directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        self.store_resolved = StoreConfig {
            backend: self.store.backend.unwrap_or_default(),
            data_dir: config_dir.join(self.store.data_dir.as_deref().unwrap_or(DEFAULT_DATA_DIR)),
        };
    }
}
