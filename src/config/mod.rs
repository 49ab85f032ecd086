//! Configuration module for the pipeline builder
//!
//! This module handles application configuration:
//! - Editor behaviour (id remapping, control warnings, template directory)
//! - Logging (filter directives, optional log directory)
//!
//! # Locations
//!
//! Configuration and user templates live in platform-appropriate directories
//! under `dev.pipeline-builder`:
//! - **Linux**: `~/.config/dev.pipeline-builder/config.toml`,
//!   `~/.local/share/dev.pipeline-builder/templates/`
//! - **macOS**: `~/Library/Application Support/dev.pipeline-builder/`
//! - **Windows**: `%APPDATA%\dev.pipeline-builder\`
//!
//! # Example
//!
//! ```ignore
//! use pipeline_builder::config::AppConfig;
//!
//! let mut config = AppConfig::load_or_default();
//! config.editor.warn_unknown_controls = false;
//! config.save()?;
//! ```

use crate::error::{BuilderError, Result};
use crate::pipeline::IdRemapStrategy;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application identifier for config and data directories
pub const APP_ID: &str = "dev.pipeline-builder";

/// Config filename
pub const CONFIG_FILE: &str = "config.toml";

/// User template directory name
pub const TEMPLATES_DIR: &str = "templates";

/// Default tracing filter directives
pub const DEFAULT_LOG_FILTER: &str = "info,pipeline_builder=debug";

// ==================== Directories ====================

/// Get the application config directory path
pub fn app_config_dir() -> Option<PathBuf> {
    dirs_next::config_dir().map(|p| p.join(APP_ID))
}

/// Get the application data directory path
pub fn app_data_dir() -> Option<PathBuf> {
    dirs_next::data_dir().map(|p| p.join(APP_ID))
}

/// Get the path to the default config file
pub fn default_config_path() -> Option<PathBuf> {
    app_config_dir().map(|p| p.join(CONFIG_FILE))
}

/// Get the default user template directory
pub fn default_templates_dir() -> Option<PathBuf> {
    app_data_dir().map(|p| p.join(TEMPLATES_DIR))
}

// ==================== Editor ====================

/// Graph editing behaviour
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// How colliding template ids are renamed
    pub remap_strategy: IdRemapStrategy,

    /// Log a warning for controls outside a node kind's schema
    pub warn_unknown_controls: bool,

    /// Directory scanned for user templates (platform default if unset)
    pub templates_dir: Option<PathBuf>,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            remap_strategy: IdRemapStrategy::Offset,
            warn_unknown_controls: true,
            templates_dir: None,
        }
    }
}

impl EditorConfig {
    /// The configured template directory, or the platform default
    pub fn templates_dir(&self) -> Option<PathBuf> {
        self.templates_dir.clone().or_else(default_templates_dir)
    }
}

// ==================== Logging ====================

/// Logging output settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directives, used when `RUST_LOG` is not set
    pub filter: String,

    /// Directory for daily rolling log files (console only if unset)
    pub log_dir: Option<PathBuf>,

    /// Colourize console output
    pub ansi: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: DEFAULT_LOG_FILTER.to_string(),
            log_dir: None,
            ansi: true,
        }
    }
}

// ==================== App Config ====================

/// Complete application configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub editor: EditorConfig,
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from the default location.
    ///
    /// A missing file yields defaults.
    pub fn load() -> Result<Self> {
        let path = default_config_path().ok_or_else(|| {
            BuilderError::Config("Could not determine config directory".to_string())
        })?;

        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load_from(&path)
    }

    /// Load configuration from a file, TOML or JSON by extension
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            BuilderError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;

        let config = if is_json(path) {
            serde_json::from_str(&content).map_err(|e| {
                BuilderError::Config(format!("Failed to parse {}: {}", path.display(), e))
            })?
        } else {
            toml::from_str(&content).map_err(|e| {
                BuilderError::Config(format!("Failed to parse {}: {}", path.display(), e))
            })?
        };

        tracing::debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Load configuration, returning defaults on any error
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_else(|e| {
            tracing::warn!("Failed to load config, using defaults: {}", e);
            Self::default()
        })
    }

    /// Load from the default location, falling back to defaults.
    ///
    /// The load error is handed back rather than logged, so a caller that
    /// sets up logging from the returned config can still report it.
    pub fn load_with_fallback() -> (Self, Option<BuilderError>) {
        match Self::load() {
            Ok(config) => (config, None),
            Err(e) => (Self::default(), Some(e)),
        }
    }

    /// Load from `path` if given, else from the default location; defaults
    /// on any error
    pub fn load_from_or_default(path: Option<&Path>) -> Self {
        match path {
            Some(path) => Self::load_from(path).unwrap_or_else(|e| {
                tracing::warn!("Failed to load config, using defaults: {}", e);
                Self::default()
            }),
            None => Self::load_or_default(),
        }
    }

    /// Save configuration to the default location
    pub fn save(&self) -> Result<()> {
        let path = default_config_path().ok_or_else(|| {
            BuilderError::Config("Could not determine config directory".to_string())
        })?;
        self.save_to(path)
    }

    /// Save configuration to a file, TOML or JSON by extension
    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir).map_err(|e| {
                BuilderError::Config(format!("Failed to create config directory: {}", e))
            })?;
        }

        let content = if is_json(path) {
            serde_json::to_string_pretty(self)
                .map_err(|e| BuilderError::Config(format!("Failed to serialize config: {}", e)))?
        } else {
            toml::to_string_pretty(self)
                .map_err(|e| BuilderError::Config(format!("Failed to serialize config: {}", e)))?
        };

        std::fs::write(path, content)
            .map_err(|e| BuilderError::Config(format!("Failed to write config: {}", e)))
    }
}

fn is_json(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.editor.remap_strategy, IdRemapStrategy::Offset);
        assert!(config.editor.warn_unknown_controls);
        assert_eq!(config.logging.filter, DEFAULT_LOG_FILTER);
        assert!(config.logging.log_dir.is_none());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            [editor]
            remap_strategy = "random"
            "#,
        )
        .unwrap();
        assert_eq!(config.editor.remap_strategy, IdRemapStrategy::Random);
        assert!(config.editor.warn_unknown_controls);
        assert_eq!(config.logging, LoggingConfig::default());
    }

    #[test]
    fn test_prefix_strategy_in_toml() {
        let config: AppConfig = toml::from_str(
            r#"
            [editor]
            remap_strategy = { prefix = "copy-" }
            "#,
        )
        .unwrap();
        assert_eq!(
            config.editor.remap_strategy,
            IdRemapStrategy::Prefix("copy-".to_string())
        );
    }

    #[test]
    fn test_save_and_load_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = AppConfig::default();
        config.editor.warn_unknown_controls = false;
        config.logging.log_dir = Some(dir.path().join("logs"));
        config.save_to(&path).unwrap();

        assert_eq!(AppConfig::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_save_and_load_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = AppConfig::default();
        config.editor.remap_strategy = IdRemapStrategy::Prefix("x-".to_string());
        config.save_to(&path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.trim_start().starts_with('{'));
        assert_eq!(AppConfig::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_invalid_file_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "editor = 5").unwrap();

        assert!(matches!(AppConfig::load_from(&path), Err(BuilderError::Config(_))));
        assert_eq!(AppConfig::load_from_or_default(Some(&path)), AppConfig::default());
    }

    #[test]
    fn test_explicit_templates_dir() {
        let editor = EditorConfig {
            templates_dir: Some(PathBuf::from("/tmp/templates")),
            ..EditorConfig::default()
        };
        assert_eq!(editor.templates_dir(), Some(PathBuf::from("/tmp/templates")));
    }
}
