//! Configuration file discovery, loading and writing

use super::lint_config::LintConfig;
use crate::error::LintseedError;
use crate::result::Result;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// Config file names in lookup priority order
pub const CONFIG_FILE_NAMES: &[&str] = &[
    ".lintseedrc.json",
    ".lintseedrc.toml",
    ".lintseedrc.yaml",
    ".lintseedrc.yml",
];

/// On-disk configuration formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Json,
    Yaml,
    Toml,
}

impl ConfigFormat {
    /// Guess the format from a file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Some(ConfigFormat::Json),
            Some("yaml") | Some("yml") => Some(ConfigFormat::Yaml),
            Some("toml") => Some(ConfigFormat::Toml),
            _ => None,
        }
    }

    /// Default config file name for this format
    pub fn file_name(self) -> &'static str {
        match self {
            ConfigFormat::Json => ".lintseedrc.json",
            ConfigFormat::Yaml => ".lintseedrc.yaml",
            ConfigFormat::Toml => ".lintseedrc.toml",
        }
    }

    /// Parse configuration text in this format
    pub fn parse(self, content: &str) -> Result<LintConfig> {
        self.deserialize(content).map_err(|message| {
            LintseedError::config_error(format!("Invalid {self} config: {message}"))
        })
    }

    fn deserialize(self, content: &str) -> std::result::Result<LintConfig, String> {
        match self {
            ConfigFormat::Json => serde_json::from_str(content).map_err(|e| e.to_string()),
            ConfigFormat::Yaml => serde_yaml::from_str(content).map_err(|e| e.to_string()),
            ConfigFormat::Toml => toml::from_str(content).map_err(|e| e.to_string()),
        }
    }

    /// Render a configuration in this format
    pub fn render(self, config: &LintConfig) -> Result<String> {
        let rendered = match self {
            ConfigFormat::Json => serde_json::to_string_pretty(config)
                .map(|mut text| {
                    text.push('\n');
                    text
                })
                .map_err(|e| e.to_string()),
            ConfigFormat::Yaml => serde_yaml::to_string(config).map_err(|e| e.to_string()),
            ConfigFormat::Toml => toml::to_string_pretty(config).map_err(|e| e.to_string()),
        };
        rendered.map_err(|message| {
            LintseedError::config_error(format!("Failed to serialize {self} config: {message}"))
        })
    }
}

impl fmt::Display for ConfigFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ConfigFormat::Json => "JSON",
            ConfigFormat::Yaml => "YAML",
            ConfigFormat::Toml => "TOML",
        })
    }
}

/// Configuration loader for discovering, loading and writing config files
pub struct ConfigLoader;

impl ConfigLoader {
    /// Auto-discover config file by traversing upward from start_path
    ///
    /// Searches each directory for the names in [`CONFIG_FILE_NAMES`] (in
    /// that order) until a config is found or the filesystem root is reached.
    pub fn auto_discover(start_path: &Path) -> Result<Option<PathBuf>> {
        let mut current = start_path
            .canonicalize()
            .map_err(|e| LintseedError::config_error(format!("Invalid path: {e}")))?;

        loop {
            for filename in CONFIG_FILE_NAMES {
                let config_path = current.join(filename);
                if config_path.is_file() {
                    tracing::debug!("Found config: {}", config_path.display());
                    return Ok(Some(config_path));
                }
            }

            match current.parent() {
                Some(parent) => current = parent.to_path_buf(),
                None => break,
            }
        }

        Ok(None)
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: &Path) -> Result<LintConfig> {
        let format = ConfigFormat::from_path(path).ok_or_else(|| {
            LintseedError::config_error(format!(
                "Unsupported config file '{}' (expected .json, .yaml, .yml or .toml)",
                path.display()
            ))
        })?;
        let content = fs::read_to_string(path).map_err(|e| LintseedError::io_error(path, e))?;
        format.deserialize(&content).map_err(|e| {
            LintseedError::config_error(format!(
                "Failed to load {} config from '{}': {}",
                format,
                path.display(),
                e
            ))
        })
    }

    /// Load config from path or auto-discover, falling back to defaults
    pub fn load(custom_path: Option<&Path>, start_dir: Option<&Path>) -> Result<LintConfig> {
        if let Some(path) = custom_path {
            if !path.exists() {
                return Err(LintseedError::config_error(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
            return Self::load_from_file(path);
        }

        let search_dir = start_dir.unwrap_or_else(|| Path::new("."));
        match Self::auto_discover(search_dir)? {
            Some(path) => Self::load_from_file(&path),
            None => {
                tracing::debug!("No config file found, using defaults");
                Ok(LintConfig::default())
            }
        }
    }

    /// Write a configuration to `path` in the given format
    pub fn write(path: &Path, config: &LintConfig, format: ConfigFormat) -> Result<()> {
        let rendered = format.render(config)?;
        fs::write(path, rendered).map_err(|e| LintseedError::io_error(path, e))?;
        tracing::info!("Wrote {} config to {}", format, path.display());
        Ok(())
    }
}
